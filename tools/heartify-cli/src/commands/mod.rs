pub mod bundle;
pub mod check;
pub mod render;
pub mod session;

use std::path::{Path, PathBuf};

use heartify_common::config::AppConfig;
use heartify_common::error::HeartifyResult;
use heartify_render_engine::{
    FontSelection, FontStore, GlyphRasterizer, ImageExporter, RasterOptions,
};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub scale: Option<u32>,
    pub font: Option<PathBuf>,
    pub bold_font: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(scale) = self.scale {
            config.export.scale_factor = scale;
        }
        if self.font.is_some() {
            config.export.font_path = self.font;
        }
        if self.bold_font.is_some() {
            config.export.bold_font_path = self.bold_font;
        }
        config
    }
}

/// An explicit config file must exist and parse; the default location
/// falls back to defaults.
pub fn load_config(explicit: Option<&Path>) -> HeartifyResult<AppConfig> {
    match explicit {
        Some(path) => AppConfig::read_from(path),
        None => Ok(AppConfig::load()),
    }
}

/// Discover fonts and build the PNG exporter for `config`.
pub fn build_exporter(config: &AppConfig) -> HeartifyResult<ImageExporter<GlyphRasterizer>> {
    config.validate()?;

    let selection = FontSelection::from(&config.export);
    let fonts = FontStore::discover(&selection)?;
    tracing::debug!(?fonts, "Fonts loaded");

    let options = RasterOptions::with_scale(config.export.scale_factor);
    Ok(ImageExporter::with_options(GlyphRasterizer::new(fonts), options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartify_common::error::HeartifyError;

    #[test]
    fn test_overrides_take_precedence() {
        let config = Overrides {
            output: Some(PathBuf::from("/tmp/out")),
            scale: Some(2),
            font: Some(PathBuf::from("/fonts/a.ttf")),
            bold_font: None,
        }
        .apply(AppConfig::default());

        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.export.scale_factor, 2);
        assert_eq!(config.export.font_path, Some(PathBuf::from("/fonts/a.ttf")));
        assert_eq!(config.export.bold_font_path, None);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let missing = std::env::temp_dir().join("heartify_cli_missing/config.json");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(matches!(err, HeartifyError::FileNotFound { .. }));
    }

    #[test]
    fn test_exporter_rejects_bad_scale_before_loading_fonts() {
        let mut config = AppConfig::default();
        config.export.scale_factor = 0;
        assert!(matches!(build_exporter(&config), Err(HeartifyError::Config { .. })));
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut base = AppConfig::default();
        base.export.bold_font_path = Some(PathBuf::from("/fonts/b.ttf"));

        let config = Overrides::default().apply(base);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.export.bold_font_path, Some(PathBuf::from("/fonts/b.ttf")));
    }
}
