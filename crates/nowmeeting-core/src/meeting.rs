//! Meeting record types.
//!
//! [`MeetingRecord`] mirrors one entry of `meetings.json` exactly as it was
//! supplied. Validation happens lazily through [`MeetingRecord::slot`], so a
//! snapshot with a few broken entries still loads and the broken entries are
//! simply left out of matching.
//!
//! Deserialization is lenient per field: a value of the wrong JSON type reads
//! as blank or absent instead of failing the record, and the record is then
//! rejected by `slot()` like any other malformed entry.

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{RecordError, TimeField};
use crate::time::{TimeOfDay, weekday_from_index};
use crate::window::{Slot, SlotWindow};

/// One scheduled weekly meeting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeetingRecord {
    /// Display title, possibly with a localized prefix such as "Reunião ".
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Civil weekday, 0 = Sunday … 6 = Saturday.
    #[serde(default, deserialize_with = "lenient_weekday")]
    pub weekday: Option<i64>,
    /// Inclusive start, `HH:MM` or `HH:MM:SS`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub start: String,
    /// Exclusive end, same encoding. Less than `start` when the meeting
    /// runs past midnight.
    #[serde(default, deserialize_with = "lenient_string")]
    pub end: String,
    /// Join URL.
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<String>,
    /// Platform or format label.
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub platform: Option<String>,
}

impl MeetingRecord {
    /// Creates a record with the required fields.
    pub fn new(
        name: impl Into<String>,
        weekday: i64,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            weekday: Some(weekday),
            start: start.into(),
            end: end.into(),
            link: None,
            platform: None,
        }
    }

    /// Builder method to set the join link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Builder method to set the platform label.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Returns the parsed weekday.
    pub fn parsed_weekday(&self) -> Result<Weekday, RecordError> {
        self.weekday
            .and_then(weekday_from_index)
            .ok_or_else(|| RecordError::missing_weekday(self.weekday))
    }

    /// Returns the parsed start time.
    ///
    /// `24:00` is rejected: a meeting cannot start at the end of the day.
    pub fn start_time(&self) -> Result<TimeOfDay, RecordError> {
        parse_field(TimeField::Start, &self.start)
    }

    /// Returns the parsed end time.
    ///
    /// `24:00` is accepted and marks the end of the day.
    pub fn end_time(&self) -> Result<TimeOfDay, RecordError> {
        parse_field(TimeField::End, &self.end)
    }

    /// Parses the weekday and time window of this record.
    pub fn slot(&self) -> Result<Slot, RecordError> {
        let weekday = self.parsed_weekday()?;
        let window = SlotWindow::new(self.start_time()?, self.end_time()?);
        Ok(Slot::new(weekday, window))
    }

    /// Returns the join link if it is present and not blank.
    pub fn join_link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

fn parse_field(field: TimeField, value: &str) -> Result<TimeOfDay, RecordError> {
    match value.parse() {
        Ok(TimeOfDay::END_OF_DAY) if field == TimeField::Start => {
            Err(RecordError::malformed(field, value))
        }
        Ok(time) => Ok(time),
        Err(_) => Err(RecordError::malformed(field, value)),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        _ => String::new(),
    })
}

fn lenient_option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Only JSON integers count; `2.0` is accepted, `"2"` and `2.5` are not.
fn lenient_weekday<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let Value::Number(number) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|value| value.fract() == 0.0 && value.abs() <= 1e15)
            .map(|value| value as i64)
    }))
}
