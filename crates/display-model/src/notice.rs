//! Transient user notices.
//!
//! Every recoverable failure in Heartify ends up here: validation problems
//! and export errors are turned into a [`Notice`] and handed to a
//! [`Notifier`], after which the user may simply try again.

use serde::Serialize;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short title/description pair shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    /// Either name left blank on submit.
    pub fn missing_information() -> Self {
        Self::error("Missing information", "Please enter both names")
    }

    pub fn image_downloaded() -> Self {
        Self::success("Success!", "Your image has been downloaded")
    }

    pub fn image_failed() -> Self {
        Self::error("Error", "Failed to generate image. Please try again.")
    }

    pub fn project_downloaded() -> Self {
        Self::success("Success!", "Your project has been downloaded")
    }

    pub fn project_failed() -> Self {
        Self::error("Error", "Failed to generate project. Please try again.")
    }
}

/// Receives notices for display.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Collects notices in order; handy for tests and batch callers.
impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Forwards notices to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => {
                tracing::info!(title = %notice.title, "{}", notice.description)
            }
            NoticeKind::Error => {
                tracing::warn!(title = %notice.title, "{}", notice.description)
            }
        }
    }
}
