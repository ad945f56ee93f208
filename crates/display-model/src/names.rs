//! Name input and validation.

use std::fmt;

use heartify_common::error::HeartifyError;
use serde::{Deserialize, Serialize};

/// Which of the two name fields a message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameField {
    First,
    Second,
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameField::First => f.write_str("first name"),
            NameField::Second => f.write_str("second name"),
        }
    }
}

/// Raised when the form is submitted with a blank name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing {0}")]
    MissingField(NameField),
}

impl From<ValidationError> for HeartifyError {
    fn from(err: ValidationError) -> Self {
        HeartifyError::validation(err.to_string())
    }
}

/// Live, unvalidated form input.
///
/// Edits are stored verbatim, surrounding whitespace included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameDisplayInput {
    pub first_name: String,
    pub second_name: String,
}

impl NameDisplayInput {
    pub fn new(first_name: impl Into<String>, second_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            second_name: second_name.into(),
        }
    }

    /// Validate into a [`NamePair`]. The first blank field is reported.
    pub fn validate(&self) -> Result<NamePair, ValidationError> {
        NamePair::new(&self.first_name, &self.second_name)
    }

    /// Whether both fields are blank.
    pub fn is_empty(&self) -> bool {
        self.first_name.trim().is_empty() && self.second_name.trim().is_empty()
    }
}

/// Two trimmed, non-empty names. Only constructible through validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NamePair {
    first: String,
    second: String,
}

impl NamePair {
    /// Trim both names and reject blanks.
    pub fn new(first: &str, second: &str) -> Result<Self, ValidationError> {
        let first = first.trim();
        let second = second.trim();

        if first.is_empty() {
            return Err(ValidationError::MissingField(NameField::First));
        }
        if second.is_empty() {
            return Err(ValidationError::MissingField(NameField::Second));
        }

        Ok(Self {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for NamePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ♥ {}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_trims_names() {
        let pair = NamePair::new("  Romeo ", "\tJuliet\n").unwrap();
        assert_eq!(pair.first(), "Romeo");
        assert_eq!(pair.second(), "Juliet");
    }

    #[test]
    fn test_reports_first_missing_field() {
        assert_eq!(
            NamePair::new("", "Juliet"),
            Err(ValidationError::MissingField(NameField::First))
        );
        assert_eq!(
            NamePair::new("Romeo", "   "),
            Err(ValidationError::MissingField(NameField::Second))
        );
        assert_eq!(
            NamePair::new(" ", " "),
            Err(ValidationError::MissingField(NameField::First))
        );
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        let pair = NamePair::new("Mary Jane", " Peter  Parker ").unwrap();
        assert_eq!(pair.first(), "Mary Jane");
        assert_eq!(pair.second(), "Peter  Parker");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: HeartifyError = ValidationError::MissingField(NameField::Second).into();
        assert_eq!(err.to_string(), "Validation error: Missing second name");
    }

    #[test]
    fn test_input_is_empty() {
        assert!(NameDisplayInput::default().is_empty());
        assert!(NameDisplayInput::new("  ", "\n").is_empty());
        assert!(!NameDisplayInput::new("A", "").is_empty());
    }

    proptest! {
        #[test]
        fn prop_whitespace_only_never_validates(
            ws in "[ \t\n\r]{0,6}",
            name in "[A-Za-z]{1,12}",
        ) {
            prop_assert!(NamePair::new(&ws, &name).is_err());
            prop_assert!(NamePair::new(&name, &ws).is_err());
        }

        #[test]
        fn prop_valid_names_are_trimmed(
            pad in "[ \t]{0,4}",
            first in "[A-Za-z][A-Za-z '&-]{0,10}[A-Za-z]",
            second in "[A-Za-z][A-Za-z '&-]{0,10}[A-Za-z]",
        ) {
            let raw_first = format!("{pad}{first}{pad}");
            let raw_second = format!("{pad}{second}");
            let pair = NamePair::new(&raw_first, &raw_second).unwrap();
            prop_assert_eq!(pair.first(), first.as_str());
            prop_assert_eq!(pair.second(), second.as_str());
        }
    }
}
