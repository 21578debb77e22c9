//! Display ordering for matched meetings.
//!
//! Meetings are sorted by start time descending, then end time descending.
//! Meetings that share both start and end have no meaningful order between
//! them, so each run of such ties is shuffled on every call.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::meeting::MeetingRecord;
use crate::time::TimeOfDay;

/// Sort key of a record: parsed `(start, end)`.
///
/// A field that fails to parse is `None` and therefore sorts after every
/// parsed value in descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
}

impl SortKey {
    pub fn of(record: &MeetingRecord) -> Self {
        Self {
            start: record.start_time().ok(),
            end: record.end_time().ok(),
        }
    }
}

/// Orders meetings for display using the thread-local RNG for ties.
pub fn order(records: Vec<MeetingRecord>) -> Vec<MeetingRecord> {
    order_with_rng(records, &mut rand::rng())
}

/// Orders meetings for display, shuffling ties with the given RNG.
pub fn order_with_rng<R>(records: Vec<MeetingRecord>, rng: &mut R) -> Vec<MeetingRecord>
where
    R: Rng + ?Sized,
{
    let mut keyed: Vec<(SortKey, MeetingRecord)> = records
        .into_iter()
        .map(|record| (SortKey::of(&record), record))
        .collect();

    // Stable, so ties keep input order until shuffled below.
    keyed.sort_by(|a, b| b.0.cmp(&a.0));

    for run in keyed.chunk_by_mut(|a, b| a.0 == b.0) {
        if run.len() > 1 {
            run.shuffle(rng);
        }
    }

    keyed.into_iter().map(|(_, record)| record).collect()
}
