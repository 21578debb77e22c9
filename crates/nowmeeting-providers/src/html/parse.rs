//! Table row extraction.

use std::sync::LazyLock;

use nowmeeting_core::{MeetingRecord, TimeOfDay};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tbody tr").expect("Invalid row selector"));

static CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("Invalid cell selector"));

/// Markup left behind as text, e.g. escaped tags inside a cell.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid tag regex"));

const MIN_CELLS: usize = 4;

/// Maps a Portuguese weekday name to 0 = Sunday … 6 = Saturday.
pub fn weekday_from_name(name: &str) -> Option<i64> {
    let day = match name.trim().to_lowercase().as_str() {
        "domingo" => 0,
        "segunda-feira" | "segunda" => 1,
        "terça-feira" | "terça" => 2,
        "quarta-feira" | "quarta" => 3,
        "quinta-feira" | "quinta" => 4,
        "sexta-feira" | "sexta" => 5,
        "sábado" => 6,
        _ => return None,
    };
    Some(day)
}

/// Extracts every usable meeting row of a listing page, in page order.
pub fn parse_page(html: &str) -> Vec<MeetingRecord> {
    let document = Html::parse_document(html);
    document
        .select(&ROWS)
        .filter_map(|row| {
            let cells: Vec<ElementRef<'_>> = row.select(&CELLS).collect();
            to_record(&cells)
        })
        .collect()
}

fn to_record(cells: &[ElementRef<'_>]) -> Option<MeetingRecord> {
    if cells.len() < MIN_CELLS {
        return None;
    }

    let day = cell_text(&cells[0]);
    let Some(weekday) = weekday_from_name(&day) else {
        debug!(weekday = %day, "skipping row with an unknown weekday");
        return None;
    };

    let name = name_text(&cells[3]);

    let (Some(start), Some(end)) = (clock(&cells[1]), clock(&cells[2])) else {
        debug!(meeting = %name, "skipping row with unreadable times");
        return None;
    };
    let start = TimeOfDay::from_hms(start.hour() % 24, start.minute(), 0)?;

    let mut record = MeetingRecord::new(name, weekday, start.to_string(), end.to_string());
    if let Some(platform) = cells.get(4).map(cell_text).filter(|p| !p.is_empty()) {
        record = record.with_platform(platform);
    }
    Some(record)
}

/// `HH:MM` from the first five characters of a cell, blank meaning midnight.
fn clock(cell: &ElementRef<'_>) -> Option<TimeOfDay> {
    let text: String = cell_text(cell).chars().take(5).collect();
    if text.is_empty() {
        return Some(TimeOfDay::MIDNIGHT);
    }
    text.parse().ok()
}

/// Text nodes joined with single spaces, blank meaning "Unnamed".
fn name_text(cell: &ElementRef<'_>) -> String {
    let joined = cell
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let name = untag(&joined).trim().to_string();
    if name.is_empty() {
        "Unnamed".to_string()
    } else {
        name
    }
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    untag(&cell.text().collect::<String>()).trim().to_string()
}

fn untag(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}
