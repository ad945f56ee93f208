//! Heartify Render Engine
//!
//! Off-screen export pipeline that turns a validated name pair into a
//! downloadable file, independent of how the result view is laid out on
//! screen.
//!
//! # Pipeline Architecture
//!
//! ```text
//! NamePair ──┐
//!            ├── ExportLayout::compose (fixed 1000 px geometry)
//! metrics ───┘         │
//!                      ├── attach to OffscreenDocument (scoped guard)
//!                      │         │
//!                      │         ├── Rasterizer (4×, #121212)
//!                      │         │
//!                      ├── detach ◀┘
//!                      ▼
//!                  PNG encode ──▶ <first>-<second>.png ──▶ DownloadSink
//!
//! names ──▶ ProjectBundle ──▶ heartify-project.zip ──────▶ DownloadSink
//! ```

pub mod bundle;
pub mod error;
pub mod export;
pub mod heart;
pub mod layout;
pub mod raster;
pub mod session;
pub mod surface;

pub use bundle::*;
pub use error::*;
pub use export::*;
pub use layout::*;
pub use raster::*;
pub use session::*;
pub use surface::*;
