//! Heartify Display Model
//!
//! Defines the state behind the name display:
//! - **Names:** Raw form input and the validated, trimmed name pair
//! - **Controller:** The two-state machine switching between the input
//!   view and the result view, plus the live header clock
//! - **Notices:** Transient success/error messages for the user
//!
//! Nothing here knows about rendering. The export pipeline consumes a
//! validated [`NamePair`] through the render engine's surface trait.

pub mod controller;
pub mod names;
pub mod notice;

pub use controller::*;
pub use names::*;
pub use notice::*;
