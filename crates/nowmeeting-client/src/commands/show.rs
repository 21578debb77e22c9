//! One pass of "what is happening now".

use chrono::{DateTime, Utc};
use nowmeeting_core::{
    CivilZone, FixedClock, MeetingBoard, MeetingRecord, OutputFormat, OutputFormatter, QueryInstant,
};
use nowmeeting_providers::MeetingSource;
use tracing::debug;

use crate::error::ClientResult;

/// How a pass is evaluated and rendered.
#[derive(Debug, Clone)]
pub struct View {
    pub format: OutputFormat,
    pub zone: CivilZone,
    /// Evaluate at this instant instead of the system clock.
    pub at: Option<DateTime<Utc>>,
}

impl View {
    /// Builds the board for one pass over `records`.
    pub fn board(&self, records: Vec<MeetingRecord>) -> MeetingBoard {
        let board = MeetingBoard::new(records, self.zone);
        match self.at {
            Some(instant) => board.with_clock(FixedClock(instant)),
            None => board,
        }
    }
}

/// Loads the records and returns the instant with the meetings running at it.
pub async fn current(
    source: &dyn MeetingSource,
    view: &View,
) -> ClientResult<(QueryInstant, Vec<MeetingRecord>)> {
    let records = source.fetch().await?;
    let board = view.board(records);
    let instant = board.instant();
    let meetings = board.at(&instant);
    debug!(
        source = source.name(),
        total = board.records().len(),
        current = meetings.len(),
        "evaluated meeting board"
    );
    Ok((instant, meetings))
}

/// Renders one pass, or the load-error text when the snapshot is unusable.
///
/// The rendered text is always returned; the meetings are `Err` when loading
/// failed.
pub async fn render(
    source: &dyn MeetingSource,
    view: &View,
    formatter: &OutputFormatter,
) -> (String, ClientResult<Vec<MeetingRecord>>) {
    match current(source, view).await {
        Ok((instant, meetings)) => {
            let text = formatter.format(view.format, &meetings, &instant);
            (text, Ok(meetings))
        }
        Err(err) => (formatter.format_load_error(view.format), Err(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nowmeeting_core::FormatOptions;
    use nowmeeting_providers::{FileSource, write_meetings};

    fn tuesday_evening() -> View {
        View {
            format: OutputFormat::Tty,
            zone: CivilZone::default(),
            at: Some(Utc.with_ymd_and_hms(2025, 2, 5, 1, 0, 0).unwrap()),
        }
    }

    fn formatter() -> OutputFormatter {
        OutputFormatter::new(FormatOptions {
            hyperlinks: false,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn renders_current_meetings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meetings.json");
        write_meetings(
            &path,
            &[
                MeetingRecord::new("Reunião Esperança", 2, "21:00", "23:00"),
                MeetingRecord::new("Reunião Manhã", 2, "07:00", "08:00"),
            ],
        )
        .unwrap();

        let (text, meetings) = render(&FileSource::new(&path), &tuesday_evening(), &formatter()).await;
        let meetings = meetings.unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].name, "Reunião Esperança");
        assert!(text.starts_with("Hoje é Terça-feira, 22:00:00"));
        assert!(text.contains("Esperança\n  Das 21:00 às 23:00"));
    }

    #[tokio::test]
    async fn missing_snapshot_renders_error_text() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.json"));

        let (text, meetings) = render(&source, &tuesday_evening(), &formatter()).await;
        assert_eq!(text, "Erro ao carregar dados.");
        assert!(meetings.is_err());
    }

    #[tokio::test]
    async fn empty_snapshot_renders_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meetings.json");
        std::fs::write(&path, "[]").unwrap();

        let (text, meetings) = render(&FileSource::new(&path), &tuesday_evening(), &formatter()).await;
        assert!(meetings.unwrap().is_empty());
        assert!(text.ends_with("Nenhuma reunião agora."));
    }
}
