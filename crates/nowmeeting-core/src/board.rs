//! The "meetings happening now" pass.
//!
//! A pass normalizes the clock reading, filters the whole snapshot with
//! [`matches`](crate::window::matches) and orders the survivors. Nothing is
//! cached between passes.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, instrument};

use crate::error::RecordError;
use crate::meeting::MeetingRecord;
use crate::order::order_with_rng;
use crate::time::{CivilZone, Clock, QueryInstant, SystemClock, normalize};
use crate::window::matches;

/// Returns the meetings happening at `instant`, in display order.
pub fn meetings_now(records: &[MeetingRecord], instant: &QueryInstant) -> Vec<MeetingRecord> {
    meetings_now_with_rng(records, instant, &mut rand::rng())
}

/// Like [`meetings_now`], shuffling ties with the given RNG.
pub fn meetings_now_with_rng<R>(
    records: &[MeetingRecord],
    instant: &QueryInstant,
    rng: &mut R,
) -> Vec<MeetingRecord>
where
    R: Rng + ?Sized,
{
    let matched: Vec<MeetingRecord> = records
        .iter()
        .filter(|record| matches(record, instant))
        .cloned()
        .collect();
    debug!(
        total = records.len(),
        matched = matched.len(),
        weekday = instant.weekday_index(),
        time = %instant.time,
        "matching pass"
    );
    order_with_rng(matched, rng)
}

/// A record left out of matching, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excluded<'a> {
    pub record: &'a MeetingRecord,
    pub reason: RecordError,
}

/// A read-only meeting snapshot bound to a civil zone and a clock.
#[derive(Clone)]
pub struct MeetingBoard {
    records: Vec<MeetingRecord>,
    zone: CivilZone,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for MeetingBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeetingBoard")
            .field("records", &self.records.len())
            .field("zone", &self.zone)
            .finish_non_exhaustive()
    }
}

impl MeetingBoard {
    /// Creates a board reading the system clock.
    pub fn new(records: Vec<MeetingRecord>, zone: CivilZone) -> Self {
        Self {
            records,
            zone,
            clock: Arc::new(SystemClock),
        }
    }

    /// Builder method to inject a clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn records(&self) -> &[MeetingRecord] {
        &self.records
    }

    pub fn zone(&self) -> &CivilZone {
        &self.zone
    }

    /// Reads the clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Reads the clock and normalizes it into the civil zone.
    pub fn instant(&self) -> QueryInstant {
        normalize(self.clock.now(), &self.zone)
    }

    /// Runs a full pass at the clock's current instant.
    #[instrument(level = "debug", skip(self), fields(zone = self.zone.name()))]
    pub fn current(&self) -> Vec<MeetingRecord> {
        self.at(&self.instant())
    }

    /// Runs a full pass at the given instant.
    pub fn at(&self, instant: &QueryInstant) -> Vec<MeetingRecord> {
        meetings_now(&self.records, instant)
    }

    /// Lists every record that can never match, with the parse error.
    pub fn excluded(&self) -> Vec<Excluded<'_>> {
        self.records
            .iter()
            .filter_map(|record| {
                record
                    .slot()
                    .err()
                    .map(|reason| Excluded { record, reason })
            })
            .collect()
    }
}
