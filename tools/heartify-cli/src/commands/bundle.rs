//! Package the static project archive.

use heartify_common::config::AppConfig;
use heartify_common::error::HeartifyResult;
use heartify_render_engine::{build_project_archive, DirectorySink, DownloadSink};

pub fn run(config: AppConfig, first: String, second: String) -> HeartifyResult<()> {
    let artifact = build_project_archive(&first, &second)?;
    let mut sink = DirectorySink::new(&config.output_dir);
    let receipt = sink.deliver(artifact)?;

    if let Some(path) = receipt.path {
        println!("Project written: {} ({} bytes)", path.display(), receipt.bytes);
    }
    Ok(())
}
