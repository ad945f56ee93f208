//! Export a name pair to PNG.

use heartify_common::config::AppConfig;
use heartify_common::error::HeartifyResult;
use heartify_display_model::NamePair;
use heartify_render_engine::{DirectorySink, DownloadSink, OffscreenDocument};

pub async fn run(
    config: AppConfig,
    first: String,
    second: String,
    data_url: bool,
) -> HeartifyResult<()> {
    let names = NamePair::new(&first, &second)?;
    let exporter = super::build_exporter(&config)?;

    println!("Rendering: {names}");
    println!("  Scale: {}x", exporter.options().scale);

    let mut document = OffscreenDocument::new();
    let artifact = exporter.export(&names, &mut document).await?;

    if data_url {
        println!("{}", artifact.to_data_url());
        return Ok(());
    }

    let mut sink = DirectorySink::new(&config.output_dir);
    let receipt = sink.deliver(artifact)?;
    match receipt.path {
        Some(path) => println!("Image written: {} ({} bytes)", path.display(), receipt.bytes),
        None => println!("Image delivered: {}", receipt.file_name),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartify_common::error::HeartifyError;

    #[tokio::test]
    async fn test_blank_name_is_a_validation_error() {
        let err = run(AppConfig::default(), "Romeo".into(), "   ".into(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, HeartifyError::Validation { .. }), "{err}");
    }
}
