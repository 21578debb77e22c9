//! Configuration commands.

use std::path::Path;

use nowmeeting_core::MeetingBoard;
use nowmeeting_providers::load_meetings;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", ClientConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration and report snapshot records that can never
/// match.
pub fn validate(config: &ClientConfig, data_path: &Path) -> ClientResult<()> {
    config.validate().map_err(ClientError::Config)?;
    println!("Configuration is valid.");

    if !data_path.exists() {
        println!("No meetings snapshot at {}.", data_path.display());
        return Ok(());
    }

    let board = MeetingBoard::new(load_meetings(data_path)?, config.zone());
    let report = snapshot_report(&board);
    for line in &report {
        println!("{}", line);
    }
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> ClientResult<()> {
    let config_path = ClientConfig::default_path();
    println!("config: {}", config_path.display());
    Ok(())
}

fn snapshot_report(board: &MeetingBoard) -> Vec<String> {
    let excluded = board.excluded();
    let mut lines = vec![format!(
        "Snapshot has {} meetings, {} never match.",
        board.records().len(),
        excluded.len()
    )];
    lines.extend(excluded.iter().map(|entry| {
        format!("  {:?}: {}", entry.record.name, entry.reason)
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use nowmeeting_core::{CivilZone, MeetingRecord};

    #[test]
    fn report_lists_unusable_records() {
        let board = MeetingBoard::new(
            vec![
                MeetingRecord::new("Reunião Esperança", 2, "19:00", "21:00"),
                MeetingRecord::new("Reunião Quebrada", 3, "25:70", "26:00"),
            ],
            CivilZone::default(),
        );

        let report = snapshot_report(&board);
        assert_eq!(report[0], "Snapshot has 2 meetings, 1 never match.");
        assert_eq!(report.len(), 2);
        assert!(report[1].contains("Reunião Quebrada"));
        assert!(report[1].contains("25:70"));
    }

    #[test]
    fn validate_without_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate(&ClientConfig::default(), &dir.path().join("absent.json"));
        assert!(result.is_ok());
    }

    #[test]
    fn validate_rejects_bad_config() {
        let config = ClientConfig {
            timezone: "Nowhere/Land".to_string(),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let err = validate(&config, &dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn validate_rejects_broken_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meetings.json");
        std::fs::write(&path, "not json").unwrap();
        let err = validate(&ClientConfig::default(), &path).unwrap_err();
        assert!(matches!(err, ClientError::Provider(_)));
    }
}
