//! Image export and artifact delivery.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::error::{ExportError, ExportResult};
use crate::raster::{RasterOptions, Rasterizer};
use crate::surface::{DocumentHost, OffscreenContainer, RenderableSurface};

pub const PNG_MIME: &str = "image/png";
pub const ZIP_MIME: &str = "application/zip";

/// A finished export, ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested download name.
    pub file_name: String,

    /// MIME type of `bytes`.
    pub mime_type: &'static str,

    /// Encoded file contents.
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn png(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: PNG_MIME,
            bytes,
        }
    }

    pub fn zip(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: ZIP_MIME,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:` URL embedding the artifact as base64.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Download name for a name pair: `<first>-<second>.png`, verbatim.
pub fn image_file_name(first: &str, second: &str) -> String {
    format!("{first}-{second}.png")
}

/// Encode an RGB bitmap as PNG.
pub fn encode_png(image: &RgbImage) -> ExportResult<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(Cursor::new(&mut bytes)).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}

/// Synthesizes PNG artifacts from renderable surfaces.
pub struct ImageExporter<R: Rasterizer> {
    rasterizer: Arc<R>,
    options: RasterOptions,
}

impl<R: Rasterizer + 'static> ImageExporter<R> {
    pub fn new(rasterizer: R) -> Self {
        Self::with_options(rasterizer, RasterOptions::default())
    }

    pub fn with_options(rasterizer: R, options: RasterOptions) -> Self {
        Self {
            rasterizer: Arc::new(rasterizer),
            options,
        }
    }

    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Build the off-screen tree, rasterize it, and encode a PNG.
    ///
    /// The tree stays attached to `host` only while rasterizing; it is
    /// detached on every exit path.
    pub async fn export<H>(
        &self,
        surface: &dyn RenderableSurface,
        host: &mut H,
    ) -> ExportResult<ExportArtifact>
    where
        H: DocumentHost + ?Sized,
    {
        let names = surface.names();
        let file_name = image_file_name(names.first(), names.second());
        tracing::info!(file = %file_name, scale = self.options.scale, "Starting image export");

        let layout = surface.export_layout(self.rasterizer.metrics());
        let image = {
            let container = OffscreenContainer::attach(host, layout);
            let layout = container
                .layout()
                .cloned()
                .ok_or_else(|| ExportError::rasterize("off-screen container vanished"))?;

            let rasterizer = Arc::clone(&self.rasterizer);
            let options = self.options;
            tokio::task::spawn_blocking(move || rasterizer.rasterize(&layout, &options))
                .await
                .map_err(|e| ExportError::rasterize(format!("raster task failed: {e}")))??
        };

        let bytes = encode_png(&image)?;
        tracing::info!(
            file = %file_name,
            width = image.width(),
            height = image.height(),
            bytes = bytes.len(),
            "Image exported"
        );
        Ok(ExportArtifact::png(file_name, bytes))
    }
}

/// Receipt for a delivered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub file_name: String,
    pub bytes: usize,
    /// Where the file landed, when delivered to disk.
    pub path: Option<PathBuf>,
}

/// Final hop of an export: hands the artifact to the user.
pub trait DownloadSink {
    fn deliver(&mut self, artifact: ExportArtifact) -> ExportResult<DeliveryReceipt>;
}

/// Keeps delivered artifacts in memory.
impl DownloadSink for Vec<ExportArtifact> {
    fn deliver(&mut self, artifact: ExportArtifact) -> ExportResult<DeliveryReceipt> {
        let receipt = DeliveryReceipt {
            file_name: artifact.file_name.clone(),
            bytes: artifact.len(),
            path: None,
        };
        self.push(artifact);
        Ok(receipt)
    }
}

/// Writes artifacts into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the artifact will be written to.
    pub fn target_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(fs_safe_name(file_name))
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, artifact: ExportArtifact) -> ExportResult<DeliveryReceipt> {
        let path = self.target_path(&artifact.file_name);
        if fs_safe_name(&artifact.file_name) != artifact.file_name {
            tracing::debug!(
                requested = %artifact.file_name,
                written = %path.display(),
                "Replaced path separators in download name"
            );
        }

        let write = || -> std::io::Result<()> {
            std::fs::create_dir_all(&self.dir)?;
            std::fs::write(&path, &artifact.bytes)
        };
        write().map_err(|source| ExportError::Delivery {
            file_name: artifact.file_name.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), bytes = artifact.len(), "Download written");
        Ok(DeliveryReceipt {
            file_name: artifact.file_name,
            bytes: artifact.bytes.len(),
            path: Some(path),
        })
    }
}

/// Replace characters that would escape the target directory.
fn fs_safe_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();
    match safe.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => safe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{EstimatedMetrics, ExportLayout, TextMetrics};
    use heartify_display_model::NamePair;

    static METRICS: EstimatedMetrics = EstimatedMetrics { advance_em: 0.6 };

    /// Paints only the background.
    struct FlatRasterizer;

    impl Rasterizer for FlatRasterizer {
        fn metrics(&self) -> &dyn TextMetrics {
            &METRICS
        }

        fn rasterize(
            &self,
            layout: &ExportLayout,
            options: &RasterOptions,
        ) -> ExportResult<RgbImage> {
            let (w, h) = layout.pixel_size(options.scale).unwrap();
            Ok(RgbImage::from_pixel(w, h, options.background))
        }
    }

    #[test]
    fn test_file_name_is_verbatim() {
        assert_eq!(image_file_name("Romeo", "Juliet"), "Romeo-Juliet.png");
        assert_eq!(image_file_name("Zoë", "O'Brien & Co"), "Zoë-O'Brien & Co.png");
        assert_eq!(image_file_name("A/B", "C"), "A/B-C.png");
    }

    #[test]
    fn test_fs_safe_name() {
        assert_eq!(fs_safe_name("A/B-C.png"), "A_B-C.png");
        assert_eq!(fs_safe_name("..\\x.png"), ".._x.png");
        assert_eq!(fs_safe_name(".."), "_");
        assert_eq!(fs_safe_name("Romeo-Juliet.png"), "Romeo-Juliet.png");
    }

    #[test]
    fn test_data_url() {
        let artifact = ExportArtifact::png("a.png", vec![1, 2, 3]);
        assert_eq!(artifact.to_data_url(), "data:image/png;base64,AQID");
    }

    #[test]
    fn test_encode_png_decodes_back_to_rgb() {
        let image = RgbImage::from_pixel(3, 2, image::Rgb([0x12, 0x12, 0x12]));
        let bytes = encode_png(&image).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!(decoded.to_rgb8(), image);
    }

    #[tokio::test]
    async fn test_export_names_and_sizes_png() {
        let exporter = ImageExporter::with_options(FlatRasterizer, RasterOptions::with_scale(1));
        let mut doc = crate::surface::OffscreenDocument::new();
        let names = NamePair::new("Romeo", "Juliet").unwrap();

        let artifact = exporter.export(&names, &mut doc).await.unwrap();
        assert_eq!(artifact.file_name, "Romeo-Juliet.png");
        assert_eq!(artifact.mime_type, PNG_MIME);
        assert_eq!(doc.attached_count(), 0);

        let decoded = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1000, 267));
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = std::env::temp_dir().join("heartify_test_directory_sink");
        let _ = std::fs::remove_dir_all(&dir);

        let mut sink = DirectorySink::new(&dir);
        let receipt = sink
            .deliver(ExportArtifact::png("Romeo-Juliet.png", vec![9, 9, 9]))
            .unwrap();

        let path = receipt.path.unwrap();
        assert_eq!(path, dir.join("Romeo-Juliet.png"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![9, 9, 9]);
        assert_eq!(receipt.file_name, "Romeo-Juliet.png");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_directory_sink_keeps_separators_inside_dir() {
        let dir = std::env::temp_dir().join("heartify_test_directory_sink_sep");
        let _ = std::fs::remove_dir_all(&dir);

        let mut sink = DirectorySink::new(&dir);
        let receipt = sink
            .deliver(ExportArtifact::png("AC/DC-Queen.png", vec![1]))
            .unwrap();

        assert_eq!(receipt.file_name, "AC/DC-Queen.png");
        assert_eq!(receipt.path.unwrap(), dir.join("AC_DC-Queen.png"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
