//! Output formatting for current meetings.
//!
//! This module renders an ordered meeting list in three formats:
//! - **TTY**: Human-readable terminal output with optional OSC8 hyperlinks
//! - **JSON**: Machine-readable output
//! - **HTML**: A fragment for embedding in a web page
//!
//! Formatting is presentation only. The localized title prefix is stripped
//! here and nowhere else.
//!
//! # Example
//!
//! ```rust
//! use chrono::Weekday;
//! use nowmeeting_core::format::{FormatOptions, OutputFormatter};
//! use nowmeeting_core::{MeetingRecord, QueryInstant};
//!
//! let formatter = OutputFormatter::new(FormatOptions::default());
//! let meetings = vec![MeetingRecord::new("Reunião Luz", 2, "21:30", "23:00")];
//! let text = formatter.format_tty(&meetings, &QueryInstant::at(Weekday::Tue, 1320.0));
//! assert!(text.contains("Luz"));
//! ```


use std::borrow::Cow;

use chrono::Weekday;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::meeting::MeetingRecord;
use crate::time::QueryInstant;

/// The output format for meeting display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Tty,
    /// Machine-readable JSON output.
    Json,
    /// HTML fragment.
    Html,
}

/// Configuration options for output formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Prefix removed from the start of meeting names (case-insensitive).
    pub title_prefix: String,
    /// Text shown when no meeting is running.
    pub no_meeting_text: String,
    /// Text shown when the meeting data could not be loaded.
    pub error_text: String,
    /// Whether to include hyperlinks (OSC8) in TTY output.
    pub hyperlinks: bool,
    /// Whether to print the civil clock headline.
    pub show_clock: bool,
    /// Maximum length for meeting titles (truncated with ellipsis).
    pub max_title_length: Option<usize>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            title_prefix: "Reunião".to_string(),
            no_meeting_text: "Nenhuma reunião agora.".to_string(),
            error_text: "Erro ao carregar dados.".to_string(),
            hyperlinks: true,
            show_clock: true,
            max_title_length: None,
        }
    }
}

/// JSON output format for machine consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// The instant the pass was evaluated at.
    pub now: JsonNow,
    /// Number of meetings returned.
    pub count: usize,
    /// Meetings in display order.
    pub meetings: Vec<JsonMeeting>,
}

/// The evaluation instant in JSON format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonNow {
    /// Weekday, 0 = Sunday.
    pub weekday: u8,
    /// Localized weekday name.
    pub weekday_name: String,
    /// Civil time of day, `HH:MM:SS`.
    pub time: String,
}

/// A single meeting in JSON format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonMeeting {
    /// Title with the prefix removed.
    pub title: String,
    /// Name exactly as supplied.
    pub name: String,
    /// Start as supplied.
    pub start: String,
    /// End as supplied.
    pub end: String,
    /// Formatted time range for display.
    pub time_display: String,
    /// Whether the meeting runs past midnight.
    pub wraps_midnight: bool,
    /// Join URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Platform label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// Output formatter for current meetings.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    options: FormatOptions,
    prefix: Option<Regex>,
}

impl OutputFormatter {
    /// Creates a new OutputFormatter with the given options.
    pub fn new(options: FormatOptions) -> Self {
        let prefix = prefix_regex(&options.title_prefix);
        Self { options, prefix }
    }

    /// Creates a new OutputFormatter with default options.
    pub fn with_defaults() -> Self {
        Self::new(FormatOptions::default())
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Renders meetings in the requested format.
    pub fn format(
        &self,
        format: OutputFormat,
        meetings: &[MeetingRecord],
        instant: &QueryInstant,
    ) -> String {
        match format {
            OutputFormat::Tty => self.format_tty(meetings, instant),
            OutputFormat::Json => serde_json_string(&self.format_json(meetings, instant)),
            OutputFormat::Html => self.format_html(meetings, instant),
        }
    }

    /// Renders the "failed to load" state in the requested format.
    pub fn format_load_error(&self, format: OutputFormat) -> String {
        let text = &self.options.error_text;
        match format {
            OutputFormat::Tty => text.clone(),
            OutputFormat::Json => serde_json_string(&serde_json::json!({ "error": text })),
            OutputFormat::Html => format!("<p class=\"error\">{}</p>", html_escape(text)),
        }
    }

    /// Formats meetings for terminal output.
    pub fn format_tty(&self, meetings: &[MeetingRecord], instant: &QueryInstant) -> String {
        let mut blocks = Vec::new();
        if self.options.show_clock {
            blocks.push(clock_headline(instant));
        }

        if meetings.is_empty() {
            blocks.push(self.options.no_meeting_text.clone());
        }

        for meeting in meetings {
            let title = self.title(meeting);
            let link = web_link(meeting);
            let mut block = match link {
                Some(ref url) if self.options.hyperlinks => make_hyperlink(url.as_str(), &title),
                _ => title.into_owned(),
            };
            block.push_str("\n  ");
            block.push_str(&time_range(meeting));
            if let Some(url) = link.filter(|_| !self.options.hyperlinks) {
                block.push_str("\n  ");
                block.push_str(url.as_str());
            }
            blocks.push(block);
        }

        blocks.join("\n\n")
    }

    /// Formats meetings as JSON output.
    pub fn format_json(&self, meetings: &[MeetingRecord], instant: &QueryInstant) -> JsonOutput {
        let json_meetings: Vec<JsonMeeting> =
            meetings.iter().map(|m| self.to_json_meeting(m)).collect();

        JsonOutput {
            now: JsonNow {
                weekday: instant.weekday_index(),
                weekday_name: weekday_name_pt(instant.weekday).to_string(),
                time: instant.time.to_string(),
            },
            count: json_meetings.len(),
            meetings: json_meetings,
        }
    }

    /// Formats meetings as an HTML fragment.
    pub fn format_html(&self, meetings: &[MeetingRecord], instant: &QueryInstant) -> String {
        let mut out = Vec::new();
        if self.options.show_clock {
            out.push(format!(
                "<p class=\"current-time\">{}</p>",
                html_escape(&clock_headline(instant))
            ));
        }

        if meetings.is_empty() {
            out.push(format!(
                "<p class=\"empty\">{}</p>",
                html_escape(&self.options.no_meeting_text)
            ));
        }

        for meeting in meetings {
            let title = html_escape(&self.title(meeting));
            let heading = match web_link(meeting) {
                Some(url) => format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                    html_escape(url.as_str()),
                    title
                ),
                None => title,
            };
            out.push(format!(
                "<div class=\"meeting\"><h2>{}</h2><p>{}</p></div>",
                heading,
                html_escape(&time_range(meeting))
            ));
        }

        out.join("\n")
    }

    /// Returns the display title: prefix removed, trimmed, then truncated.
    pub fn title<'a>(&self, meeting: &'a MeetingRecord) -> Cow<'a, str> {
        let title = display_title(&meeting.name, self.prefix.as_ref());
        match self.options.max_title_length {
            Some(max) if title.chars().count() > max => {
                Cow::Owned(ellipsis(&title, max).into_owned())
            }
            _ => title,
        }
    }

    fn to_json_meeting(&self, meeting: &MeetingRecord) -> JsonMeeting {
        let wraps_midnight = meeting
            .slot()
            .map(|slot| slot.window.is_wrapping())
            .unwrap_or(false);

        JsonMeeting {
            title: self.title(meeting).into_owned(),
            name: meeting.name.clone(),
            start: meeting.start.clone(),
            end: meeting.end.clone(),
            time_display: time_range(meeting),
            wraps_midnight,
            link: meeting.join_link().map(String::from),
            platform: meeting.platform.clone(),
        }
    }
}

fn prefix_regex(prefix: &str) -> Option<Regex> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return None;
    }
    Regex::new(&format!(r"(?i)^\s*{}\s+", regex::escape(prefix))).ok()
}

fn serde_json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// Removes the localized prefix from a meeting name and trims it.
///
/// A name that is nothing but the prefix is kept as-is.
pub fn display_title<'a>(name: &'a str, prefix: Option<&Regex>) -> Cow<'a, str> {
    let stripped = match prefix {
        Some(re) => re.replace(name, ""),
        None => Cow::Borrowed(name),
    };
    match stripped {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
        Cow::Owned(s) if s.trim().is_empty() => Cow::Borrowed(name.trim()),
        Cow::Owned(s) => Cow::Owned(s.trim().to_string()),
    }
}

/// Formats the time range of a meeting, `Das 21:30 às 23:00`.
pub fn time_range(meeting: &MeetingRecord) -> String {
    format!("Das {} às {}", meeting.start, meeting.end)
}

/// Formats the clock headline, `Hoje é Terça-feira, 22:00:00`.
pub fn clock_headline(instant: &QueryInstant) -> String {
    format!(
        "Hoje é {}, {}",
        weekday_name_pt(instant.weekday),
        instant.time
    )
}

/// Portuguese weekday name.
pub fn weekday_name_pt(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Domingo",
        Weekday::Mon => "Segunda-feira",
        Weekday::Tue => "Terça-feira",
        Weekday::Wed => "Quarta-feira",
        Weekday::Thu => "Quinta-feira",
        Weekday::Fri => "Sexta-feira",
        Weekday::Sat => "Sábado",
    }
}

/// Returns the meeting link if it is an http(s) URL.
fn web_link(meeting: &MeetingRecord) -> Option<Url> {
    meeting
        .join_link()
        .and_then(|link| Url::parse(link).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// Truncates a string with ellipsis if it exceeds the given length.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }

    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }

    let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
    Cow::Owned(format!("{}...", truncated))
}

/// Creates an OSC8 hyperlink for terminal output.
pub fn make_hyperlink(url: &str, label: &str) -> String {
    // OSC8 hyperlink format: \e]8;;URL\e\\LABEL\e]8;;\e\\
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, label)
}

/// Escapes text for HTML display.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
