//! Watch mode: re-render at every refresh boundary of the civil clock.
//!
//! Boundaries are the multiples of `every_minutes` counted from local
//! midnight, so the default of 30 refreshes at HH:00 and HH:30. The snapshot
//! is reloaded on each pass so a concurrent `nowmeeting fetch` shows up on
//! the next boundary.

use std::io::{IsTerminal, Write};
use std::time::Duration;

use chrono::{NaiveDateTime, Timelike, Utc};
use nowmeeting_core::OutputFormatter;
use nowmeeting_providers::MeetingSource;
use tracing::{info, warn};

use crate::commands::show::{View, render};
use crate::error::ClientResult;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Time from `local` to the next refresh boundary strictly after it.
///
/// A reading exactly on a boundary waits a full period. Local midnight is
/// always a boundary, so a period that does not divide the day is cut short
/// at the end of it.
pub fn next_refresh_delay(local: NaiveDateTime, every_minutes: u32) -> Duration {
    let period = u64::from(every_minutes.max(1)) * 60;
    let elapsed = u64::from(local.num_seconds_from_midnight());
    let next = ((elapsed / period + 1) * period).min(SECONDS_PER_DAY);
    let nanos = local.nanosecond().min(999_999_999);

    Duration::from_secs(next - elapsed) - Duration::from_nanos(u64::from(nanos))
}

/// Renders forever, sleeping until each boundary, until Ctrl-C.
pub async fn run(
    source: &dyn MeetingSource,
    view: &View,
    formatter: &OutputFormatter,
    every_minutes: u32,
) -> ClientResult<()> {
    let clear = std::io::stdout().is_terminal();
    loop {
        let (text, meetings) = render(source, view, formatter).await;
        if let Err(err) = meetings {
            warn!(error = %err, "failed to load meetings");
        }
        print_frame(&text, clear)?;

        let delay = next_refresh_delay(view.zone.local_time(Utc::now()), every_minutes);
        info!(delay_secs = delay.as_secs(), "waiting for next refresh");

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("stopping watch mode");
                return Ok(());
            }
        }
    }
}

fn print_frame(text: &str, clear: bool) -> ClientResult<()> {
    let mut stdout = std::io::stdout().lock();
    if clear {
        write!(stdout, "\x1b[2J\x1b[H")?;
    }
    writeln!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}
