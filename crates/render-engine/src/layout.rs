//! Fixed-geometry export layout.
//!
//! The on-screen result view is responsive, so its proportions depend on
//! the window. Exports are built from this layout instead: a flat list of
//! styled nodes positioned in CSS pixels inside a container of constant
//! width. The same names always produce the same geometry.
//!
//! ```text
//! ┌──────────────────────────── 1000 px ────────────────────────────┐
//! │                           padding 60                            │
//! │        [First]   40   [♥ 60×60]   40   [Second]   (72 px row)   │
//! │                             gap 48                              │
//! │                    © Made for each other (27 px)                │
//! │                           padding 60                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use heartify_display_model::{NamePair, CAPTION};
use image::Rgb;

/// Container width in CSS pixels.
pub const CONTAINER_WIDTH: u32 = 1000;
/// Padding on every side of the container.
pub const PADDING: f32 = 60.0;
/// Name font size.
pub const NAME_FONT_SIZE: f32 = 60.0;
/// Height of the name row's line box.
pub const NAME_LINE_HEIGHT: f32 = 72.0;
/// Side length of the heart glyph.
pub const HEART_SIZE: f32 = 60.0;
/// Horizontal gap between the row items.
pub const ITEM_GAP: f32 = 40.0;
/// Vertical gap between the name row and the caption.
pub const CAPTION_GAP: f32 = 48.0;
/// Caption font size.
pub const CAPTION_FONT_SIZE: f32 = 18.0;
/// Height of the caption line box.
pub const CAPTION_LINE_HEIGHT: f32 = 27.0;

/// Opaque export background (`#121212`).
pub const BACKGROUND: Rgb<u8> = Rgb([0x12, 0x12, 0x12]);
pub const NAME_COLOR: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
/// Heart fill and stroke (`#dc2626`).
pub const HEART_COLOR: Rgb<u8> = Rgb([0xdc, 0x26, 0x26]);
/// Muted caption gray (`#9ca3af`).
pub const CAPTION_COLOR: Rgb<u8> = Rgb([0x9c, 0xa3, 0xaf]);
/// Opacity of the heart's glow.
pub const GLOW_ALPHA: f32 = 0.7;
/// Blur radius of the heart's glow in CSS pixels.
pub const GLOW_RADIUS: f32 = 10.0;

/// Font weight of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Measures rendered text width in CSS pixels.
pub trait TextMetrics {
    fn text_width(&self, text: &str, font_size: f32, weight: FontWeight) -> f32;
}

/// Font-free width estimate: every character advances a fixed fraction of
/// the font size. Bold text is slightly wider.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedMetrics {
    pub advance_em: f32,
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self { advance_em: 0.6 }
    }
}

impl TextMetrics for EstimatedMetrics {
    fn text_width(&self, text: &str, font_size: f32, weight: FontWeight) -> f32 {
        let boost = match weight {
            FontWeight::Regular => 1.0,
            FontWeight::Bold => 1.05,
        };
        text.chars().count() as f32 * font_size * self.advance_em * boost
    }
}

/// Axis-aligned box in CSS pixels. `x` may be negative when a row overflows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Multiply every coordinate by `factor`.
    pub fn scaled(&self, factor: f32) -> Rect {
        Rect {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Soft halo painted under a glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Rgb<u8>,
    pub alpha: f32,
    pub radius: f32,
}

/// Styling for a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub weight: FontWeight,
    pub color: Rgb<u8>,
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A single line of text. `bounds` is the line box.
    Text { content: String, style: TextStyle },
    /// The heart glyph filling `bounds`.
    Heart { color: Rgb<u8>, glow: Option<Glow> },
}

/// Semantic role of a node, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    FirstName,
    Heart,
    SecondName,
    Caption,
}

/// One positioned node of the export tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub role: NodeRole,
    pub bounds: Rect,
    pub kind: NodeKind,
}

/// The complete off-screen tree for one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportLayout {
    width: u32,
    height: u32,
    nodes: Vec<LayoutNode>,
}

impl ExportLayout {
    /// Lay out `first · heart · second` with the caption underneath.
    pub fn compose(names: &NamePair, metrics: &dyn TextMetrics) -> Self {
        let width = CONTAINER_WIDTH as f32;
        let content_width = width - 2.0 * PADDING;

        let name_style = TextStyle {
            font_size: NAME_FONT_SIZE,
            weight: FontWeight::Bold,
            color: NAME_COLOR,
        };
        let caption_style = TextStyle {
            font_size: CAPTION_FONT_SIZE,
            weight: FontWeight::Regular,
            color: CAPTION_COLOR,
        };

        let first_width = metrics.text_width(names.first(), NAME_FONT_SIZE, FontWeight::Bold);
        let second_width = metrics.text_width(names.second(), NAME_FONT_SIZE, FontWeight::Bold);
        let row_width = first_width + ITEM_GAP + HEART_SIZE + ITEM_GAP + second_width;

        // Centered even when wider than the content box; overflow is clipped.
        let row_x = PADDING + (content_width - row_width) / 2.0;
        let row_y = PADDING;

        let first = LayoutNode {
            role: NodeRole::FirstName,
            bounds: Rect {
                x: row_x,
                y: row_y,
                width: first_width,
                height: NAME_LINE_HEIGHT,
            },
            kind: NodeKind::Text {
                content: names.first().to_string(),
                style: name_style,
            },
        };

        let heart = LayoutNode {
            role: NodeRole::Heart,
            bounds: Rect {
                x: first.bounds.right() + ITEM_GAP,
                y: row_y + (NAME_LINE_HEIGHT - HEART_SIZE) / 2.0,
                width: HEART_SIZE,
                height: HEART_SIZE,
            },
            kind: NodeKind::Heart {
                color: HEART_COLOR,
                glow: Some(Glow {
                    color: HEART_COLOR,
                    alpha: GLOW_ALPHA,
                    radius: GLOW_RADIUS,
                }),
            },
        };

        let second = LayoutNode {
            role: NodeRole::SecondName,
            bounds: Rect {
                x: heart.bounds.right() + ITEM_GAP,
                y: row_y,
                width: second_width,
                height: NAME_LINE_HEIGHT,
            },
            kind: NodeKind::Text {
                content: names.second().to_string(),
                style: name_style,
            },
        };

        let caption_width = metrics.text_width(CAPTION, CAPTION_FONT_SIZE, FontWeight::Regular);
        let caption = LayoutNode {
            role: NodeRole::Caption,
            bounds: Rect {
                x: PADDING + (content_width - caption_width) / 2.0,
                y: row_y + NAME_LINE_HEIGHT + CAPTION_GAP,
                width: caption_width,
                height: CAPTION_LINE_HEIGHT,
            },
            kind: NodeKind::Text {
                content: CAPTION.to_string(),
                style: caption_style,
            },
        };

        let height = (caption.bounds.bottom() + PADDING).ceil() as u32;

        Self {
            width: CONTAINER_WIDTH,
            height,
            nodes: vec![first, heart, second, caption],
        }
    }

    /// Width in CSS pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in CSS pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bitmap dimensions at the given upscale factor, `None` on overflow.
    pub fn pixel_size(&self, scale: u32) -> Option<(u32, u32)> {
        Some((self.width.checked_mul(scale)?, self.height.checked_mul(scale)?))
    }

    /// Nodes in paint order.
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn node(&self, role: NodeRole) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.role == role)
    }
}
