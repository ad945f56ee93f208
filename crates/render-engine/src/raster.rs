//! Rasterization of an [`ExportLayout`] into an opaque RGB bitmap.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::{FontVec, PxScale};
use heartify_common::config::{ExportDefaults, DEFAULT_SCALE_FACTOR};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::error::{ExportError, ExportResult};
use crate::heart::paint_heart;
use crate::layout::{ExportLayout, FontWeight, Glow, NodeKind, TextMetrics, BACKGROUND};

pub use heartify_common::config::MAX_SCALE_FACTOR;

/// Environment variable overriding the regular font.
pub const FONT_ENV: &str = "HEARTIFY_FONT";
/// Environment variable overriding the bold font.
pub const BOLD_FONT_ENV: &str = "HEARTIFY_BOLD_FONT";

const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Rasterization parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Device pixels per CSS pixel.
    pub scale: u32,
    /// Opaque fill behind everything.
    pub background: Rgb<u8>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE_FACTOR,
            background: BACKGROUND,
        }
    }
}

impl RasterOptions {
    pub fn with_scale(scale: u32) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    fn validate(&self) -> ExportResult<()> {
        if self.scale == 0 || self.scale > MAX_SCALE_FACTOR {
            return Err(ExportError::rasterize(format!(
                "scale factor {} outside 1..={MAX_SCALE_FACTOR}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Turns an export layout into a bitmap.
pub trait Rasterizer: Send + Sync {
    /// Text measurement consistent with what [`Rasterizer::rasterize`] draws.
    fn metrics(&self) -> &dyn TextMetrics;

    /// Render the layout at `options.scale` on an opaque background.
    fn rasterize(&self, layout: &ExportLayout, options: &RasterOptions) -> ExportResult<RgbImage>;
}

/// Where fonts are looked up, in priority order.
#[derive(Debug, Clone, Default)]
pub struct FontSelection {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
}

impl From<&ExportDefaults> for FontSelection {
    fn from(defaults: &ExportDefaults) -> Self {
        Self {
            regular: defaults.font_path.clone(),
            bold: defaults.bold_font_path.clone(),
        }
    }
}

impl FontSelection {
    /// Resolve to concrete paths: explicit selection, then environment,
    /// then well-known system locations.
    pub fn resolve(&self) -> (Option<PathBuf>, Option<PathBuf>) {
        let regular = resolve_one(self.regular.as_deref(), FONT_ENV, REGULAR_CANDIDATES);
        let bold = resolve_one(self.bold.as_deref(), BOLD_FONT_ENV, BOLD_CANDIDATES);
        (regular, bold)
    }
}

fn resolve_one(explicit: Option<&Path>, env: &str, candidates: &[&str]) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(env).map(PathBuf::from) {
        return Some(path);
    }
    candidates
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_file())
}

/// Regular and (optional) bold font faces.
#[derive(Clone)]
pub struct FontStore {
    regular: Arc<FontVec>,
    bold: Option<Arc<FontVec>>,
}

impl std::fmt::Debug for FontStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontStore")
            .field("has_bold", &self.bold.is_some())
            .finish()
    }
}

impl FontStore {
    /// Build from raw font file contents.
    pub fn from_bytes(regular: Vec<u8>, bold: Option<Vec<u8>>) -> ExportResult<Self> {
        let regular = parse_font(regular, Path::new("<memory>"))?;
        let bold = bold
            .map(|data| parse_font(data, Path::new("<memory>")))
            .transpose()?;
        Ok(Self {
            regular: Arc::new(regular),
            bold: bold.map(Arc::new),
        })
    }

    /// Load font files from disk.
    pub fn load(regular: &Path, bold: Option<&Path>) -> ExportResult<Self> {
        let regular = parse_font(std::fs::read(regular)?, regular)?;
        let bold = match bold {
            Some(path) => match std::fs::read(path) {
                Ok(data) => Some(parse_font(data, path)?),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Bold font unreadable, using regular face"
                    );
                    None
                }
            },
            None => None,
        };
        Ok(Self {
            regular: Arc::new(regular),
            bold: bold.map(Arc::new),
        })
    }

    /// Find and load fonts following [`FontSelection::resolve`].
    pub fn discover(selection: &FontSelection) -> ExportResult<Self> {
        let (regular, bold) = selection.resolve();

        // A lone bold face serves as the regular face too.
        let regular = match (regular, &bold) {
            (Some(path), _) => path,
            (None, Some(bold)) => bold.clone(),
            (None, None) => {
                let mut searched: Vec<String> = Vec::new();
                searched.push(format!("${FONT_ENV}"));
                searched.extend(REGULAR_CANDIDATES.iter().map(|s| s.to_string()));
                return Err(ExportError::FontUnavailable {
                    searched: searched.join(", "),
                });
            }
        };

        tracing::debug!(
            regular = %regular.display(),
            bold = ?bold.as_ref().map(|p| p.display().to_string()),
            "Loading fonts"
        );
        Self::load(&regular, bold.as_deref())
    }

    /// The face used for the given weight.
    pub fn face(&self, weight: FontWeight) -> &FontVec {
        match (weight, &self.bold) {
            (FontWeight::Bold, Some(bold)) => bold.as_ref(),
            _ => self.regular.as_ref(),
        }
    }

    pub fn has_bold(&self) -> bool {
        self.bold.is_some()
    }
}

fn parse_font(data: Vec<u8>, path: &Path) -> ExportResult<FontVec> {
    FontVec::try_from_vec(data).map_err(|e| ExportError::InvalidFont {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl TextMetrics for FontStore {
    fn text_width(&self, text: &str, font_size: f32, weight: FontWeight) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let (w, _) = text_size(PxScale::from(font_size), self.face(weight), text);
        w as f32
    }
}

/// Draws text with `ab_glyph` fonts through `imageproc`, and the heart
/// procedurally.
#[derive(Debug, Clone)]
pub struct GlyphRasterizer {
    fonts: FontStore,
}

impl GlyphRasterizer {
    pub fn new(fonts: FontStore) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontStore {
        &self.fonts
    }
}

impl Rasterizer for GlyphRasterizer {
    fn metrics(&self) -> &dyn TextMetrics {
        &self.fonts
    }

    fn rasterize(&self, layout: &ExportLayout, options: &RasterOptions) -> ExportResult<RgbImage> {
        options.validate()?;

        let (width, height) = layout
            .pixel_size(options.scale)
            .ok_or_else(|| ExportError::rasterize("bitmap size overflows"))?;
        let factor = options.scale as f32;
        let mut canvas = RgbImage::from_pixel(width, height, options.background);

        for node in layout.nodes() {
            let bounds = node.bounds.scaled(factor);
            match &node.kind {
                NodeKind::Text { content, style } => {
                    let size = style.font_size * factor;
                    // Center the em box vertically inside the line box.
                    let top = bounds.y + (bounds.height - size) / 2.0;
                    draw_text_mut(
                        &mut canvas,
                        style.color,
                        bounds.x.round() as i32,
                        top.round() as i32,
                        PxScale::from(size),
                        self.fonts.face(style.weight),
                        content,
                    );
                }
                NodeKind::Heart { color, glow } => {
                    let glow = glow.map(|g| Glow {
                        radius: g.radius * factor,
                        ..g
                    });
                    paint_heart(
                        &mut canvas,
                        bounds.x.round() as i64,
                        bounds.y.round() as i64,
                        bounds.width.round() as u32,
                        *color,
                        glow,
                    );
                }
            }
        }

        tracing::debug!(width, height, scale = options.scale, "Rasterized export layout");
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{EstimatedMetrics, NodeRole, HEART_COLOR, NAME_COLOR};
    use heartify_display_model::NamePair;

    fn system_fonts() -> Option<FontStore> {
        FontStore::discover(&FontSelection::default()).ok()
    }

    #[test]
    fn test_options_default_to_four_times_on_dark_background() {
        let options = RasterOptions::default();
        assert_eq!(options.scale, 4);
        assert_eq!(options.background, Rgb([0x12, 0x12, 0x12]));
    }

    #[test]
    fn test_rejects_out_of_range_scale() {
        assert!(RasterOptions::with_scale(0).validate().is_err());
        assert!(RasterOptions::with_scale(9).validate().is_err());
        assert!(RasterOptions::with_scale(1).validate().is_ok());
    }

    #[test]
    fn test_explicit_selection_wins() {
        let selection = FontSelection {
            regular: Some(PathBuf::from("/fonts/custom.ttf")),
            bold: Some(PathBuf::from("/fonts/custom-bold.ttf")),
        };
        let (regular, bold) = selection.resolve();
        assert_eq!(regular, Some(PathBuf::from("/fonts/custom.ttf")));
        assert_eq!(bold, Some(PathBuf::from("/fonts/custom-bold.ttf")));
    }

    #[test]
    fn test_missing_explicit_font_is_an_error() {
        let selection = FontSelection {
            regular: Some(PathBuf::from("/definitely/not/here.ttf")),
            bold: None,
        };
        assert!(FontStore::discover(&selection).is_err());
    }

    #[test]
    fn test_garbage_font_bytes_are_rejected() {
        let err = FontStore::from_bytes(b"not a font".to_vec(), None).unwrap_err();
        assert!(matches!(err, ExportError::InvalidFont { .. }));
    }

    #[test]
    fn test_rasterizes_with_system_fonts() {
        let Some(fonts) = system_fonts() else {
            eprintln!("skipping: no system font found");
            return;
        };
        let rasterizer = GlyphRasterizer::new(fonts);
        let names = NamePair::new("Romeo", "Juliet").unwrap();
        let layout = ExportLayout::compose(&names, rasterizer.metrics());

        let image = rasterizer
            .rasterize(&layout, &RasterOptions::with_scale(2))
            .unwrap();
        assert_eq!(image.dimensions(), (2000, 534));

        // Corners keep the background.
        assert_eq!(*image.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*image.get_pixel(1999, 533), BACKGROUND);

        // The heart center is solid red.
        let heart = layout.node(NodeRole::Heart).unwrap().bounds.scaled(2.0);
        let cx = (heart.x + heart.width / 2.0) as u32;
        let cy = (heart.y + heart.height * 0.6) as u32;
        assert_eq!(*image.get_pixel(cx, cy), HEART_COLOR);

        // Some white ink from the names.
        assert!(image
            .pixels()
            .any(|p| p.0.iter().zip(NAME_COLOR.0).all(|(a, b)| *a >= b - 5)));
    }

    #[test]
    fn test_font_metrics_grow_with_text() {
        let Some(fonts) = system_fonts() else {
            return;
        };
        let short = fonts.text_width("Al", 60.0, FontWeight::Bold);
        let long = fonts.text_width("Alexandra", 60.0, FontWeight::Bold);
        assert!(long > short);
        assert_eq!(fonts.text_width("", 60.0, FontWeight::Bold), 0.0);
    }

    #[test]
    fn test_estimated_layout_matches_raster_size() {
        static METRICS: EstimatedMetrics = EstimatedMetrics { advance_em: 0.6 };

        struct Blank;
        impl Rasterizer for Blank {
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

        let names = NamePair::new("A", "B").unwrap();
        let layout = ExportLayout::compose(&names, Blank.metrics());
        let image = Blank.rasterize(&layout, &RasterOptions::default()).unwrap();
        assert_eq!(image.dimensions(), (4000, 1068));
    }
}
