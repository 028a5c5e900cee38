use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the REST API server
    pub port: u16,

    /// Path of the append-only incident log file
    pub incident_log: PathBuf,

    /// Directory that run-once artifacts (report, charts) are written to
    pub output_dir: PathBuf,

    /// Seconds between automatic pipeline cycles
    pub interval_secs: u64,

    /// Fixed generator seed, for reproducible batches
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8050,
            incident_log: PathBuf::from("security_incidents.log"),
            output_dir: PathBuf::from("."),
            interval_secs: 5,
            seed: None,
        }
    }
}
