//! JSON snapshot files (`meetings.json`).
//!
//! The snapshot is a top-level JSON array of meeting objects. Unknown keys are
//! ignored, and missing or mistyped keys fall back to blank values, so one odd
//! entry does not cost the whole file. Array elements that are not objects
//! are skipped with a warning. A file that is not a JSON array is a load
//! error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nowmeeting_core::MeetingRecord;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::source::{BoxFuture, MeetingSource};

const PROVIDER: &str = "file";

/// Reads meetings from a snapshot on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MeetingSource for FileSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn fetch(&self) -> BoxFuture<'_, ProviderResult<Vec<MeetingRecord>>> {
        Box::pin(async move {
            let content = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| read_error(&self.path, e))?;
            parse_meetings(&content, &self.path)
        })
    }
}

/// Loads a snapshot synchronously.
///
/// # Errors
///
/// Returns `NotFound` when the file is missing and `InvalidResponse` when it
/// does not hold a JSON array of meetings.
pub fn load_meetings(path: &Path) -> ProviderResult<Vec<MeetingRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
    parse_meetings(&content, path)
}

/// Writes a snapshot as pretty-printed UTF-8 JSON.
///
/// Non-ASCII characters are written as-is. Parent directories are created
/// when missing.
pub fn write_meetings(path: &Path, meetings: &[MeetingRecord]) -> ProviderResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ProviderError::io(format!("failed to create {}", parent.display()))
                .with_provider(PROVIDER)
                .with_source(e)
        })?;
    }

    let mut json = serde_json::to_string_pretty(meetings).map_err(|e| {
        ProviderError::invalid_response("failed to serialize meetings")
            .with_provider(PROVIDER)
            .with_source(e)
    })?;
    json.push('\n');

    std::fs::write(path, json).map_err(|e| {
        ProviderError::io(format!("failed to write {}", path.display()))
            .with_provider(PROVIDER)
            .with_source(e)
    })?;

    info!(path = %path.display(), count = meetings.len(), "wrote meetings snapshot");
    Ok(())
}

fn parse_meetings(content: &str, path: &Path) -> ProviderResult<Vec<MeetingRecord>> {
    let entries: Vec<Value> = serde_json::from_str(content).map_err(|e| {
        ProviderError::invalid_response(format!("{} is not a meeting list", path.display()))
            .with_provider(PROVIDER)
            .with_source(e)
    })?;

    let mut meetings = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            warn!(path = %path.display(), index, "skipping snapshot entry that is not an object");
            continue;
        }
        match serde_json::from_value::<MeetingRecord>(entry) {
            Ok(meeting) => meetings.push(meeting),
            Err(err) => {
                warn!(path = %path.display(), index, error = %err, "skipping unreadable snapshot entry");
            }
        }
    }
    debug!(path = %path.display(), count = meetings.len(), "loaded meetings snapshot");
    Ok(meetings)
}

fn read_error(path: &Path, err: std::io::Error) -> ProviderError {
    let error = if err.kind() == ErrorKind::NotFound {
        ProviderError::not_found(format!("{} does not exist", path.display()))
    } else {
        ProviderError::io(format!("failed to read {}", path.display()))
    };
    error.with_provider(PROVIDER).with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    mod loading {
        use super::*;

        #[test]
        fn loads_array_of_records() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_file(
                &dir,
                "meetings.json",
                r#"[
                    {"name": "Reunião Esperança", "weekday": 2, "start": "19:00", "end": "21:00",
                     "link": "https://zoom.us/j/1", "platform": "VM"},
                    {"name": "Reunião Madrugada", "weekday": 5, "start": "23:00:00", "end": "01:00:00",
                     "extra": "ignored"}
                ]"#,
            );

            let meetings = load_meetings(&path).unwrap();
            assert_eq!(meetings.len(), 2);
            assert_eq!(meetings[0].link.as_deref(), Some("https://zoom.us/j/1"));
            assert_eq!(meetings[1].end, "01:00:00");
            assert!(meetings[1].platform.is_none());
        }

        #[test]
        fn missing_fields_still_load() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_file(&dir, "meetings.json", r#"[{"name": "Sem horário"}]"#);

            let meetings = load_meetings(&path).unwrap();
            assert_eq!(meetings.len(), 1);
            assert!(meetings[0].weekday.is_none());
            assert!(meetings[0].slot().is_err());
        }

        #[test]
        fn mistyped_entry_does_not_cost_the_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_file(
                &dir,
                "meetings.json",
                r#"[
                    {"name": "Reunião Boa", "weekday": 2, "start": "19:00", "end": "21:00"},
                    {"name": "Texto", "weekday": "2", "start": "19:00", "end": "21:00"},
                    {"name": "Nulo", "weekday": 2, "start": null, "end": "21:00"},
                    42,
                    null
                ]"#,
            );

            let meetings = load_meetings(&path).unwrap();
            assert_eq!(meetings.len(), 3);
            assert!(meetings[0].slot().is_ok());
            assert_eq!(meetings[1].weekday, None);
            assert!(meetings[1].slot().is_err());
            assert_eq!(meetings[2].start, "");
            assert!(meetings[2].slot().is_err());
        }

        #[test]
        fn empty_array_is_not_an_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_file(&dir, "meetings.json", "[]");
            assert!(load_meetings(&path).unwrap().is_empty());
        }

        #[test]
        fn missing_file_is_not_found() {
            let dir = tempfile::tempdir().unwrap();
            let err = load_meetings(&dir.path().join("absent.json")).unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::NotFound);
            assert_eq!(err.provider(), Some("file"));
        }

        #[test]
        fn non_array_is_invalid() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_file(&dir, "meetings.json", r#"{"meetings": []}"#);
            let err = load_meetings(&path).unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);

            let path = write_file(&dir, "broken.json", "[{");
            assert_eq!(
                load_meetings(&path).unwrap_err().code(),
                ProviderErrorCode::InvalidResponse
            );
        }
    }

    mod writing {
        use super::*;

        #[test]
        fn keeps_non_ascii_and_pretty_prints() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("meetings.json");
            let meetings = vec![
                MeetingRecord::new("Reunião Manhã", 1, "07:00:00", "08:00:00").with_platform("VM"),
            ];

            write_meetings(&path, &meetings).unwrap();

            let content = std::fs::read_to_string(&path).unwrap();
            assert!(content.contains("Reunião Manhã"));
            assert!(content.starts_with("[\n  {"));
            assert!(!content.contains("\"link\""));
            assert_eq!(load_meetings(&path).unwrap(), meetings);
        }
    }

    mod source {
        use super::*;

        #[tokio::test]
        async fn fetch_reads_the_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_file(
                &dir,
                "meetings.json",
                r#"[{"name": "Reunião Quarta", "weekday": 3, "start": "12:00", "end": "13:00"}]"#,
            );

            let source = FileSource::new(&path);
            assert_eq!(source.name(), "file");
            assert_eq!(source.path(), path.as_path());

            let meetings = source.fetch().await.unwrap();
            assert_eq!(meetings[0].name, "Reunião Quarta");
        }

        #[tokio::test]
        async fn fetch_reports_missing_file() {
            let dir = tempfile::tempdir().unwrap();
            let source = FileSource::new(dir.path().join("nope.json"));
            let err = source.fetch().await.unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::NotFound);
        }
    }
}
