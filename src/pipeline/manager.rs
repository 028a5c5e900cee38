use chrono::{DateTime, Utc};
use log::{debug, info};
use tokio::sync::broadcast;

use crate::models::config::AppConfig;
use crate::models::incident::IncidentRecord;
use crate::models::packet::PacketRecord;
use crate::models::stats::BatchStatistics;
use crate::pipeline::aggregator;
use crate::pipeline::detector::IncidentDetector;
use crate::pipeline::generator::TrafficGenerator;
use crate::pipeline::sink::IncidentLog;
use crate::utils::error::AppResult;

/// Capacity of the stats broadcast channel; one message per cycle, so
/// slow WebSocket clients only ever lag a few cycles behind.
const STATS_CHANNEL_CAPACITY: usize = 16;

/// Drives the generate → summarize → detect pipeline and retains the
/// latest cycle's output for the API to read.
///
/// Nothing crosses cycle boundaries except the append-only incident log
/// file; every cycle is a pure function of its freshly generated batch.
pub struct PipelineManager {
    config: AppConfig,
    generator: TrafficGenerator,
    detector: IncidentDetector,
    incident_log: IncidentLog,

    /// Batch from the most recent cycle
    batch: Vec<PacketRecord>,

    /// Statistics from the most recent cycle (None before the first
    /// cycle or if the batch was empty)
    stats: Option<BatchStatistics>,

    /// Incidents from the most recent cycle
    incidents: Vec<IncidentRecord>,

    /// Number of cycles run so far
    cycle_count: u64,

    /// When the most recent cycle ran
    last_cycle_at: Option<DateTime<Utc>>,

    /// Broadcast channel publishing stats after each cycle
    stats_tx: broadcast::Sender<BatchStatistics>,
}

impl PipelineManager {
    /// Create a new pipeline manager
    pub fn new(config: AppConfig) -> Self {
        let generator = match config.seed {
            Some(seed) => {
                info!("Using fixed generator seed {}", seed);
                TrafficGenerator::from_seed(seed)
            }
            None => TrafficGenerator::new(),
        };

        let incident_log = IncidentLog::new(&config.incident_log);
        info!("Incident log: {}", incident_log.path().display());

        let (stats_tx, _) = broadcast::channel(STATS_CHANNEL_CAPACITY);

        Self {
            config,
            generator,
            detector: IncidentDetector::new(),
            incident_log,
            batch: Vec::new(),
            stats: None,
            incidents: Vec::new(),
            cycle_count: 0,
            last_cycle_at: None,
            stats_tx,
        }
    }

    /// Run one pipeline cycle: generate a batch, summarize it, evaluate
    /// the detection rules, and log every incident.
    pub fn run_cycle(&mut self) -> AppResult<()> {
        let batch = self.generator.generate_batch();
        let stats = aggregator::summarize(&batch);
        let incidents = self.detector.detect(&batch);

        debug!(
            "Cycle {}: {} packets, {} bytes, {} incidents",
            self.cycle_count + 1,
            batch.len(),
            stats.as_ref().map(|s| s.total_bytes()).unwrap_or(0),
            incidents.len()
        );

        for incident in &incidents {
            self.incident_log.append(incident)?;
        }

        if let Some(stats) = &stats {
            // Send fails only when no WebSocket client is subscribed.
            let _ = self.stats_tx.send(stats.clone());
        }

        self.batch = batch;
        self.stats = stats;
        self.incidents = incidents;
        self.cycle_count += 1;
        self.last_cycle_at = Some(Utc::now());

        Ok(())
    }

    /// Subscribe to statistics published after each cycle
    pub fn subscribe_to_stats(&self) -> broadcast::Receiver<BatchStatistics> {
        self.stats_tx.subscribe()
    }

    /// Paginated view of the latest batch
    pub fn get_batch(&self, offset: usize, limit: usize) -> Vec<PacketRecord> {
        self.batch.iter().skip(offset).take(limit).cloned().collect()
    }

    /// Size of the latest batch
    pub fn get_packet_count(&self) -> usize {
        self.batch.len()
    }

    /// Statistics from the latest cycle, if any
    pub fn get_stats(&self) -> Option<BatchStatistics> {
        self.stats.clone()
    }

    /// Incidents from the latest cycle
    pub fn get_incidents(&self) -> Vec<IncidentRecord> {
        self.incidents.clone()
    }

    /// Number of cycles run so far
    pub fn get_cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// When the latest cycle ran
    pub fn get_last_cycle_at(&self) -> Option<DateTime<Utc>> {
        self.last_cycle_at
    }

    /// Application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (PipelineManager, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            incident_log: dir.path().join("incidents.log"),
            output_dir: dir.path().to_path_buf(),
            seed: Some(99),
            ..AppConfig::default()
        };
        (PipelineManager::new(config), dir)
    }

    #[test]
    fn run_cycle_populates_latest_state() {
        let (mut manager, _dir) = manager();
        assert_eq!(manager.get_packet_count(), 0);
        assert!(manager.get_stats().is_none());

        manager.run_cycle().unwrap();

        let count = manager.get_packet_count();
        assert!((50..=100).contains(&count));
        assert_eq!(manager.get_cycle_count(), 1);
        assert!(manager.get_last_cycle_at().is_some());

        let stats = manager.get_stats().unwrap();
        assert_eq!(stats.total_packets, count);
    }

    #[test]
    fn cycles_replace_rather_than_accumulate() {
        let (mut manager, _dir) = manager();
        manager.run_cycle().unwrap();
        manager.run_cycle().unwrap();

        assert_eq!(manager.get_cycle_count(), 2);
        assert!(manager.get_packet_count() <= 100);
    }

    #[test]
    fn pagination_bounds_the_batch_view() {
        let (mut manager, _dir) = manager();
        manager.run_cycle().unwrap();

        let page = manager.get_batch(0, 10);
        assert_eq!(page.len(), 10);

        let beyond = manager.get_batch(1000, 10);
        assert!(beyond.is_empty());
    }
}
