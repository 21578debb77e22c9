//! Error types for meeting records and timezone resolution.
//!
//! None of these errors abort a matching pass. A record that fails to parse
//! is excluded from the result, and an unknown timezone degrades to the
//! observer's local clock.

use thiserror::Error;

/// Which time field of a record failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

impl TimeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl std::fmt::Display for TimeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a meeting record cannot take part in matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// `start` or `end` is not a valid `HH:MM[:SS]` value.
    #[error("malformed {field} time: {value:?}")]
    MalformedTimeField { field: TimeField, value: String },

    /// The weekday is absent or outside `0..=6`.
    #[error("missing or invalid weekday: {value:?}")]
    MissingWeekday { value: Option<i64> },
}

impl RecordError {
    /// Creates a malformed time field error.
    pub fn malformed(field: TimeField, value: impl Into<String>) -> Self {
        Self::MalformedTimeField {
            field,
            value: value.into(),
        }
    }

    /// Creates a missing weekday error.
    pub fn missing_weekday(value: Option<i64>) -> Self {
        Self::MissingWeekday { value }
    }
}

/// The configured civil timezone could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("timezone unavailable: {name}")]
pub struct TimezoneUnavailable {
    pub name: String,
}

/// Errors from parsing a time-of-day string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day: {0:?}")]
pub struct ParseTimeError(pub String);
