use chrono::Utc;
use log::warn;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::incident::IncidentRecord;
use crate::utils::error::AppResult;

/// Append-only flat-file sink for incidents, mirrored to the console log.
///
/// The file is opened and closed per write; there is no batching,
/// rotation, or retry.
pub struct IncidentLog {
    path: PathBuf,
}

impl IncidentLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one incident line: `[<timestamp>] <severity> - <kind>: <details>`.
    ///
    /// The timestamp is the write time, not the incident time.
    pub fn append(&self, incident: &IncidentRecord) -> AppResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(
            file,
            "[{}] {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S"),
            incident.log_detail()
        )?;

        warn!("INCIDENT DETECTED: {}", incident.log_detail());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::incident::{IncidentKind, Severity};
    use uuid::Uuid;

    #[test]
    fn appended_lines_match_the_log_format() {
        let dir = tempfile::tempdir().unwrap();
        let sink = IncidentLog::new(dir.path().join("incidents.log"));

        let incident = IncidentRecord {
            id: Uuid::new_v4(),
            kind: IncidentKind::SuspiciousPort,
            severity: Severity::High,
            details: "Suspicious port detected: 22".to_string(),
            source: None,
            destination: None,
            timestamp: Utc::now(),
        };

        sink.append(&incident).unwrap();
        sink.append(&incident).unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert!(line.starts_with('['));
            assert!(line.contains("] HIGH - SUSPICIOUS_PORT: Suspicious port detected: 22"));
        }
    }
}
