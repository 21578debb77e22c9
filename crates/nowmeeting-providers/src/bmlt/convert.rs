//! Conversion of BMLT search results into meeting records.

use std::sync::LazyLock;

use nowmeeting_core::{MeetingRecord, TimeOfDay};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Format codes that mark a meeting as virtual, online or hybrid.
static VIRTUAL_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(VM|ONL|HY)\b").expect("Invalid virtual format regex"));

/// `HH:MM:SS` duration prefix; seconds are ignored.
static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})").expect("Invalid duration regex"));

/// Duration used when a row has none or it cannot be read.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// A BMLT field that servers send either as a JSON string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseInt {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseInt {
    /// The integer value, if there is one. Floats count only when integral.
    pub fn value(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Float(value) => integral(*value),
            Self::Text(text) => {
                let text = text.trim();
                text.parse()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(integral))
            }
        }
    }
}

fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() <= 1e15).then_some(value as i64)
}

/// The subset of a `GetSearchResults` row that nowmeeting reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BmltRow {
    pub meeting_name: Option<String>,
    /// 1 = Sunday … 7 = Saturday.
    pub weekday_tinyint: Option<LooseInt>,
    /// `HH:MM:SS`.
    pub start_time: Option<String>,
    /// `HH:MM:SS`.
    pub duration_time: Option<String>,
    /// Comma separated format codes.
    pub formats: Option<String>,
    #[serde(alias = "virtual_meeting_link")]
    pub conference_url: Option<String>,
}

/// Parses a `GetSearchResults` body row by row.
///
/// Only a body that is not a JSON array is an error. Rows that cannot be read
/// are dropped with a debug log so one odd row does not cost the payload.
pub fn parse_rows(body: &str) -> Result<Vec<BmltRow>, serde_json::Error> {
    let values: Vec<Value> = serde_json::from_str(body)?;
    let rows = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(row) => Some(row),
            Err(err) => {
                debug!(index, error = %err, "skipping unreadable BMLT row");
                None
            }
        })
        .collect();
    Ok(rows)
}

/// Returns true when the format list carries a virtual format code.
pub fn is_virtual(formats: &str) -> bool {
    VIRTUAL_FORMAT.is_match(formats)
}

/// Duration in whole minutes, defaulting to 60 for blank or unreadable
/// values.
pub fn duration_minutes(duration: Option<&str>) -> u32 {
    duration
        .and_then(|value| DURATION.captures(value.trim()))
        .and_then(|caps| {
            let hours: u32 = caps[1].parse().ok()?;
            let minutes: u32 = caps[2].parse().ok()?;
            Some(hours * 60 + minutes)
        })
        .unwrap_or(DEFAULT_DURATION_MINUTES)
}

/// The time `minutes` after `start`, wrapping past midnight.
pub fn end_after(start: TimeOfDay, minutes: u32) -> TimeOfDay {
    let seconds = (start.seconds() + minutes * 60) % SECONDS_PER_DAY;
    TimeOfDay::from_seconds(seconds).unwrap_or(TimeOfDay::MIDNIGHT)
}

/// Converts one row, or returns `None` when the row is in-person only or
/// lacks a usable weekday or start time.
pub fn to_record(row: &BmltRow) -> Option<MeetingRecord> {
    let formats = row.formats.as_deref().unwrap_or_default().trim();
    if !is_virtual(formats) {
        return None;
    }

    let name = row
        .meeting_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Unnamed");

    let Some(weekday) = row
        .weekday_tinyint
        .as_ref()
        .and_then(LooseInt::value)
        .filter(|day| (1..=7).contains(day))
    else {
        debug!(meeting = name, weekday = ?row.weekday_tinyint, "skipping BMLT row without a weekday");
        return None;
    };

    let Some(start) = row
        .start_time
        .as_deref()
        .and_then(|value| value.parse::<TimeOfDay>().ok())
        .and_then(|time| TimeOfDay::from_hms(time.hour() % 24, time.minute(), 0))
    else {
        debug!(meeting = name, start = ?row.start_time, "skipping BMLT row without a start time");
        return None;
    };

    let minutes = duration_minutes(row.duration_time.as_deref());
    let end = end_after(start, minutes);
    if end == start {
        debug!(
            meeting = name,
            duration = ?row.duration_time,
            "duration is a whole number of days, the meeting will never match"
        );
    }
    let mut record = MeetingRecord::new(name, weekday - 1, start.to_string(), end.to_string())
        .with_platform(formats);
    if let Some(link) = row
        .conference_url
        .as_deref()
        .map(str::trim)
        .filter(|link| !link.is_empty())
    {
        record = record.with_link(link);
    }
    Some(record)
}

/// Converts a whole search result, keeping the server's order.
pub fn to_records(rows: &[BmltRow]) -> Vec<MeetingRecord> {
    rows.iter().filter_map(to_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(formats: &str, weekday: &str, start: &str, duration: &str) -> BmltRow {
        BmltRow {
            meeting_name: Some("Reunião Esperança".to_string()),
            weekday_tinyint: Some(LooseInt::Text(weekday.to_string())),
            start_time: Some(start.to_string()),
            duration_time: Some(duration.to_string()),
            formats: Some(formats.to_string()),
            conference_url: Some("https://zoom.us/j/123".to_string()),
        }
    }

    mod formats {
        use super::*;

        #[test]
        fn virtual_codes_match_whole_words() {
            assert!(is_virtual("VM"));
            assert!(is_virtual("O,VM,So"));
            assert!(is_virtual("onl"));
            assert!(is_virtual("HY,Ag"));
            assert!(!is_virtual("O,So"));
            assert!(!is_virtual("VMX"));
            assert!(!is_virtual("HYBRID"));
            assert!(!is_virtual(""));
        }
    }

    mod durations {
        use super::*;

        #[test]
        fn parses_hours_and_minutes() {
            assert_eq!(duration_minutes(Some("01:30:00")), 90);
            assert_eq!(duration_minutes(Some("2:00:00")), 120);
            assert_eq!(duration_minutes(Some("00:45:59")), 45);
        }

        #[test]
        fn blank_or_bad_defaults_to_an_hour() {
            assert_eq!(duration_minutes(None), 60);
            assert_eq!(duration_minutes(Some("")), 60);
            assert_eq!(duration_minutes(Some("90")), 60);
            assert_eq!(duration_minutes(Some("01:30")), 60);
        }

        #[test]
        fn end_wraps_past_midnight() {
            let start = TimeOfDay::from_hms(23, 30, 0).unwrap();
            assert_eq!(end_after(start, 90).to_string(), "01:00:00");
            assert_eq!(end_after(start, 30).to_string(), "00:00:00");

            let evening = TimeOfDay::from_hms(19, 30, 0).unwrap();
            assert_eq!(end_after(evening, 60).to_string(), "20:30:00");
        }
    }

    mod rows {
        use super::*;

        #[test]
        fn converts_virtual_row() {
            let record = to_record(&row("VM,O", "3", "19:30:00", "01:30:00")).unwrap();
            assert_eq!(record.name, "Reunião Esperança");
            assert_eq!(record.weekday, Some(2));
            assert_eq!(record.start, "19:30:00");
            assert_eq!(record.end, "21:00:00");
            assert_eq!(record.platform.as_deref(), Some("VM,O"));
            assert_eq!(record.link.as_deref(), Some("https://zoom.us/j/123"));
        }

        #[test]
        fn skips_in_person_rows() {
            assert!(to_record(&row("O,So", "3", "19:30:00", "01:30:00")).is_none());
            assert!(to_record(&BmltRow::default()).is_none());
        }

        #[test]
        fn converts_weekday_range() {
            assert_eq!(to_record(&row("VM", "1", "10:00:00", "")).unwrap().weekday, Some(0));
            assert_eq!(to_record(&row("VM", "7", "10:00:00", "")).unwrap().weekday, Some(6));
            assert!(to_record(&row("VM", "0", "10:00:00", "")).is_none());
            assert!(to_record(&row("VM", "8", "10:00:00", "")).is_none());
            assert!(to_record(&row("VM", "domingo", "10:00:00", "")).is_none());
        }

        #[test]
        fn drops_start_seconds() {
            let record = to_record(&row("HY", "2", "07:15:42", "")).unwrap();
            assert_eq!(record.start, "07:15:00");
            assert_eq!(record.end, "08:15:00");
        }

        #[test]
        fn skips_rows_without_start() {
            assert!(to_record(&row("VM", "2", "", "01:00:00")).is_none());
            assert!(to_record(&row("VM", "2", "7pm", "01:00:00")).is_none());
        }

        #[test]
        fn late_meeting_wraps() {
            let record = to_record(&row("ONL", "6", "23:00:00", "02:00:00")).unwrap();
            assert_eq!(record.end, "01:00:00");
            assert!(record.slot().unwrap().window.is_wrapping());
        }

        #[test]
        fn blank_name_and_link() {
            let mut input = row("VM", "2", "12:00:00", "");
            input.meeting_name = Some("  ".to_string());
            input.conference_url = Some(String::new());
            let record = to_record(&input).unwrap();
            assert_eq!(record.name, "Unnamed");
            assert!(record.link.is_none());
        }
    }

    mod payload {
        use super::*;

        #[test]
        fn deserializes_server_rows() {
            let body = r#"[
                {"meeting_name": "Reunião Manhã", "weekday_tinyint": "2", "start_time": "07:00:00",
                 "duration_time": "01:00:00", "formats": "VM", "conference_url": "https://meet.google.com/abc",
                 "id_bigint": "42"},
                {"meeting_name": "Presencial", "weekday_tinyint": 4, "start_time": "20:00:00",
                 "duration_time": "01:30:00", "formats": "O"},
                {"meeting_name": "Noite", "weekday_tinyint": 7, "start_time": "22:00:00",
                 "formats": "HY", "virtual_meeting_link": "https://zoom.us/j/7"}
            ]"#;

            let rows: Vec<BmltRow> = serde_json::from_str(body).unwrap();
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[1].weekday_tinyint, Some(LooseInt::Int(4)));

            let records = to_records(&rows);
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].name, "Reunião Manhã");
            assert_eq!(records[0].weekday, Some(1));
            assert_eq!(records[1].weekday, Some(6));
            assert_eq!(records[1].end, "23:00:00");
            assert_eq!(records[1].link.as_deref(), Some("https://zoom.us/j/7"));
        }

        #[test]
        fn float_weekday_is_read() {
            let rows: Vec<BmltRow> =
                serde_json::from_str(r#"[{"weekday_tinyint": 2.0}, {"weekday_tinyint": "3.0"}]"#)
                    .unwrap();
            assert_eq!(rows[0].weekday_tinyint, Some(LooseInt::Float(2.0)));
            assert_eq!(rows[0].weekday_tinyint.as_ref().and_then(LooseInt::value), Some(2));
            assert_eq!(rows[1].weekday_tinyint.as_ref().and_then(LooseInt::value), Some(3));
            assert_eq!(LooseInt::Float(2.5).value(), None);
        }

        #[test]
        fn bad_row_does_not_cost_the_payload() {
            let body = r#"[
                {"meeting_name": "Boa", "weekday_tinyint": 2.0, "start_time": "19:00:00", "formats": "VM"},
                {"meeting_name": "Lista", "weekday_tinyint": [2], "start_time": "19:00:00", "formats": "VM"},
                {"meeting_name": 7, "weekday_tinyint": "4", "start_time": "20:00:00", "formats": "VM"},
                "not a row"
            ]"#;
            let rows = parse_rows(body).unwrap();
            assert_eq!(rows.len(), 1);

            let records = to_records(&rows);
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].name, "Boa");
            assert_eq!(records[0].weekday, Some(1));
        }

        #[test]
        fn non_array_body_is_an_error() {
            assert!(parse_rows(r#"{"error": "nope"}"#).is_err());
            assert!(parse_rows("<html>").is_err());
        }
    }

    mod whole_day {
        use super::*;

        #[test]
        fn day_long_duration_is_degenerate() {
            let record = to_record(&row("VM", "2", "19:00:00", "24:00:00")).unwrap();
            assert_eq!(record.start, record.end);
            assert!(matches!(
                record.slot().unwrap().window,
                nowmeeting_core::SlotWindow::Degenerate(_)
            ));
        }
    }
}
