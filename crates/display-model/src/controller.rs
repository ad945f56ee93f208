//! Input/result view controller.
//!
//! A two-state machine:
//!
//! ```text
//!            submit (both names non-blank)
//!   Editing ─────────────────────────────▶ Showing(NamePair)
//!      ▲                                        │
//!      └──────────────── reset ─────────────────┘
//! ```
//!
//! Exactly one view is presented at a time. The raw form input survives a
//! reset, so "Create New" reopens the form with the previous names filled in.

use heartify_common::clock::{Clock, ClockString};

use crate::names::{NameDisplayInput, NamePair, ValidationError};

/// Title shown in the header next to the clock.
pub const HEADER_TITLE: &str = "SF FERRY DEPARTURES";

/// Caption rendered under the names in the result view and in exports.
pub const CAPTION: &str = "© Made for each other";

/// Which view is currently presented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    /// The name form is shown.
    #[default]
    Editing,
    /// The result view is shown with the validated names.
    Showing(NamePair),
}

/// A borrowed snapshot of the presented view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    Input(&'a NameDisplayInput),
    Result(&'a NamePair),
}

/// Owns the form state and switches between views.
#[derive(Debug, Clone, Default)]
pub struct DisplayController {
    input: NameDisplayInput,
    state: ViewState,
    clock: ClockString,
}

impl DisplayController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a live edit of the first name field.
    pub fn edit_first_name(&mut self, value: impl Into<String>) {
        self.input.first_name = value.into();
    }

    /// Record a live edit of the second name field.
    pub fn edit_second_name(&mut self, value: impl Into<String>) {
        self.input.second_name = value.into();
    }

    /// Store both names and try to switch to the result view.
    ///
    /// On failure the state is left untouched.
    pub fn submit(
        &mut self,
        first_name: impl Into<String>,
        second_name: impl Into<String>,
    ) -> Result<NamePair, ValidationError> {
        self.input = NameDisplayInput::new(first_name, second_name);
        self.submit_current()
    }

    /// Validate the currently stored input and switch to the result view.
    pub fn submit_current(&mut self) -> Result<NamePair, ValidationError> {
        let pair = self.input.validate().map_err(|e| {
            tracing::debug!(error = %e, "Rejected name submission");
            e
        })?;

        tracing::debug!(first = pair.first(), second = pair.second(), "Showing names");
        self.state = ViewState::Showing(pair.clone());
        Ok(pair)
    }

    /// Return to the input view. The typed names are kept.
    pub fn reset(&mut self) {
        if matches!(self.state, ViewState::Showing(_)) {
            tracing::debug!("Returning to input view");
        }
        self.state = ViewState::Editing;
    }

    /// Recompute the header clock from the given source.
    pub fn tick(&mut self, clock: &dyn Clock) -> &ClockString {
        self.clock = ClockString::read(clock);
        &self.clock
    }

    /// Publish a reading produced elsewhere (e.g. by a clock ticker).
    pub fn set_clock(&mut self, reading: ClockString) {
        self.clock = reading;
    }

    pub fn clock(&self) -> &ClockString {
        &self.clock
    }

    pub fn input(&self) -> &NameDisplayInput {
        &self.input
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_showing(&self) -> bool {
        matches!(self.state, ViewState::Showing(_))
    }

    /// The names in the result view, if it is presented.
    pub fn shown(&self) -> Option<&NamePair> {
        match &self.state {
            ViewState::Showing(pair) => Some(pair),
            ViewState::Editing => None,
        }
    }

    /// The view currently presented.
    pub fn view(&self) -> View<'_> {
        match &self.state {
            ViewState::Editing => View::Input(&self.input),
            ViewState::Showing(pair) => View::Result(pair),
        }
    }
}
