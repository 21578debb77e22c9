//! Time types for weekly meeting slots.
//!
//! This module provides [`TimeOfDay`] for the `HH:MM[:SS]` values stored in
//! meeting records, [`QueryInstant`] for the normalized "now", and the
//! [`CivilZone`] / [`Clock`] pair that produces it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, NaiveDateTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::{ParseTimeError, TimezoneUnavailable};

/// The civil timezone used when nothing else is configured.
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// A time of day with second precision.
///
/// Stored as seconds since midnight. `24:00` (and `24:00:00`) is accepted as
/// an end-of-day bound, so the range is `0..=86400`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// Midnight at the start of the day.
    pub const MIDNIGHT: Self = Self(0);
    /// Midnight at the end of the day (`24:00`).
    pub const END_OF_DAY: Self = Self(SECONDS_PER_DAY);

    /// Creates a time from hours, minutes and seconds.
    ///
    /// Returns `None` for out-of-range components. `24:00:00` is allowed.
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        if hours == 24 && minutes == 0 && seconds == 0 {
            return Some(Self::END_OF_DAY);
        }
        if hours > 23 || minutes > 59 || seconds > 59 {
            return None;
        }
        Some(Self(hours * 3600 + minutes * 60 + seconds))
    }

    /// Creates a time from seconds since midnight.
    pub fn from_seconds(seconds: u32) -> Option<Self> {
        (seconds <= SECONDS_PER_DAY).then_some(Self(seconds))
    }

    /// Seconds since midnight.
    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Minutes since midnight, with seconds kept as a fraction.
    pub fn minutes(&self) -> f64 {
        f64::from(self.0) / 60.0
    }

    pub fn hour(&self) -> u32 {
        self.0 / 3600
    }

    pub fn minute(&self) -> u32 {
        (self.0 / 60) % 60
    }

    pub fn second(&self) -> u32 {
        self.0 % 60
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeError(s.to_string());
        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(err());
        }

        let hours = parse_component(parts[0], 1..=2).ok_or_else(err)?;
        let minutes = parse_component(parts[1], 2..=2).ok_or_else(err)?;
        let seconds = match parts.get(2) {
            Some(part) => parse_component(part, 2..=2).ok_or_else(err)?,
            None => 0,
        };

        Self::from_hms(hours, minutes, seconds).ok_or_else(err)
    }
}

fn parse_component(part: &str, digits: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !digits.contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// Converts a stored weekday index (0 = Sunday … 6 = Saturday) to a [`Weekday`].
pub fn weekday_from_index(index: i64) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Converts a [`Weekday`] to the stored index convention (0 = Sunday).
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// The current moment as seen by the matcher: a weekday and a time of day,
/// both already expressed in the civil timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryInstant {
    pub weekday: Weekday,
    pub time: TimeOfDay,
}

impl QueryInstant {
    pub fn new(weekday: Weekday, time: TimeOfDay) -> Self {
        Self { weekday, time }
    }

    /// Creates an instant from a minute-of-day value.
    ///
    /// Fractions are kept down to the second; values outside a day are
    /// clamped into `[00:00:00, 23:59:59]`.
    pub fn at(weekday: Weekday, minute_of_day: f64) -> Self {
        let seconds = (minute_of_day * 60.0)
            .floor()
            .clamp(0.0, f64::from(SECONDS_PER_DAY - 1)) as u32;
        Self::new(weekday, TimeOfDay(seconds))
    }

    /// Builds an instant from a civil wall-clock reading.
    ///
    /// Sub-second precision is dropped.
    pub fn from_naive(local: NaiveDateTime) -> Self {
        let seconds = local.num_seconds_from_midnight().min(SECONDS_PER_DAY - 1);
        Self::new(local.weekday(), TimeOfDay(seconds))
    }

    /// Minutes since midnight as a real number.
    pub fn minute_of_day(&self) -> f64 {
        self.time.minutes()
    }

    /// Weekday using the stored index convention (0 = Sunday).
    pub fn weekday_index(&self) -> u8 {
        weekday_index(self.weekday)
    }
}

/// The timezone in which weekdays and times of day are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CivilZone {
    /// A fixed IANA zone.
    Named(Tz),
    /// The observer's own local clock, used when the zone cannot be resolved.
    ObserverLocal,
}

impl Default for CivilZone {
    fn default() -> Self {
        Self::Named(chrono_tz::America::Sao_Paulo)
    }
}

impl CivilZone {
    /// Parses an IANA timezone name.
    pub fn try_named(name: &str) -> Result<Self, TimezoneUnavailable> {
        name.trim()
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| TimezoneUnavailable {
                name: name.to_string(),
            })
    }

    /// Resolves a timezone name, degrading to the observer's local time.
    pub fn resolve(name: &str) -> Self {
        match Self::try_named(name) {
            Ok(zone) => zone,
            Err(err) => {
                warn!(error = %err, "falling back to observer local time");
                Self::ObserverLocal
            }
        }
    }

    /// Returns the zone name for display.
    pub fn name(&self) -> &str {
        match self {
            Self::Named(tz) => tz.name(),
            Self::ObserverLocal => "local",
        }
    }

    /// Returns the civil wall-clock reading of `now` in this zone.
    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Named(tz) => now.with_timezone(tz).naive_local(),
            Self::ObserverLocal => now.with_timezone(&Local).naive_local(),
        }
    }
}

/// Source of the current instant.
///
/// Matching and ordering never read the wall clock themselves; the caller
/// injects a clock so tests can pin "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Converts an observed instant into the civil zone's weekday and time of day.
pub fn normalize(now: DateTime<Utc>, zone: &CivilZone) -> QueryInstant {
    QueryInstant::from_naive(zone.local_time(now))
}
