//! Core types: time slots, matching, ordering, formatting

pub mod board;
pub mod error;
pub mod format;
pub mod meeting;
pub mod order;
pub mod time;
pub mod tracing;
pub mod window;

pub use board::{Excluded, MeetingBoard, meetings_now, meetings_now_with_rng};
pub use error::{ParseTimeError, RecordError, TimeField, TimezoneUnavailable};
pub use format::{
    FormatOptions, JsonMeeting, JsonNow, JsonOutput, OutputFormat, OutputFormatter, clock_headline,
    display_title, ellipsis, html_escape, make_hyperlink, time_range, weekday_name_pt,
};
pub use meeting::MeetingRecord;
pub use order::{SortKey, order, order_with_rng};
pub use time::{
    CivilZone, Clock, DEFAULT_TIMEZONE, FixedClock, QueryInstant, SystemClock, TimeOfDay, normalize,
    weekday_from_index, weekday_index,
};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use window::{Slot, SlotWindow, matches};
