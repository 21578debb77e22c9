//! Weekly slot windows and the "happening now" predicate.
//!
//! A slot is a weekday plus a time-of-day window. Windows whose end is
//! earlier than their start run past midnight; they are still anchored to
//! the weekday they start on.

use chrono::Weekday;
use tracing::debug;

use crate::meeting::MeetingRecord;
use crate::time::{QueryInstant, TimeOfDay};

/// A time-of-day window within a week day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotWindow {
    /// `start < end`: the closed-open interval `[start, end)`.
    Bounded { start: TimeOfDay, end: TimeOfDay },
    /// `start > end`: runs from `start` past midnight until `end`.
    Wrapping { start: TimeOfDay, end: TimeOfDay },
    /// `start == end`: zero length, contains nothing.
    Degenerate(TimeOfDay),
}

impl SlotWindow {
    /// Classifies a start/end pair.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        match start.cmp(&end) {
            std::cmp::Ordering::Less => Self::Bounded { start, end },
            std::cmp::Ordering::Greater => Self::Wrapping { start, end },
            std::cmp::Ordering::Equal => Self::Degenerate(start),
        }
    }

    pub fn start(&self) -> TimeOfDay {
        match *self {
            Self::Bounded { start, .. } | Self::Wrapping { start, .. } => start,
            Self::Degenerate(at) => at,
        }
    }

    pub fn end(&self) -> TimeOfDay {
        match *self {
            Self::Bounded { end, .. } | Self::Wrapping { end, .. } => end,
            Self::Degenerate(at) => at,
        }
    }

    /// Returns true if the window runs past midnight.
    pub fn is_wrapping(&self) -> bool {
        matches!(self, Self::Wrapping { .. })
    }

    /// Checks whether a time of day falls inside this window.
    pub fn contains(&self, now: TimeOfDay) -> bool {
        match *self {
            Self::Bounded { start, end } => start <= now && now < end,
            Self::Wrapping { start, end } => now >= start || now < end,
            Self::Degenerate(_) => false,
        }
    }

    /// Length of the window in minutes.
    pub fn duration_minutes(&self) -> f64 {
        match *self {
            Self::Bounded { start, end } => end.minutes() - start.minutes(),
            Self::Wrapping { start, end } => {
                (TimeOfDay::END_OF_DAY.minutes() - start.minutes()) + end.minutes()
            }
            Self::Degenerate(_) => 0.0,
        }
    }
}

/// A parsed weekly slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// The weekday the meeting starts on.
    pub weekday: Weekday,
    pub window: SlotWindow,
}

impl Slot {
    pub fn new(weekday: Weekday, window: SlotWindow) -> Self {
        Self { weekday, window }
    }

    /// Checks whether the slot is running at the given instant.
    ///
    /// Only queries tagged with the start weekday can match, including the
    /// part of a wrapping window that lies after midnight.
    pub fn contains(&self, instant: &QueryInstant) -> bool {
        self.weekday == instant.weekday && self.window.contains(instant.time)
    }
}

/// Decides whether a meeting record is happening at the given instant.
///
/// Records with a malformed time or weekday never match.
pub fn matches(record: &MeetingRecord, instant: &QueryInstant) -> bool {
    match record.slot() {
        Ok(slot) => slot.contains(instant),
        Err(err) => {
            debug!(name = %record.name, error = %err, "record excluded from matching");
            false
        }
    }
}
