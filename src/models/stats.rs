use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Descriptive statistics over one batch of packet records.
///
/// Derived read-only data: recomputed every pipeline cycle, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BatchStatistics {
    /// Total number of packets in the batch
    pub total_packets: usize,

    /// Number of distinct source addresses
    pub unique_sources: usize,

    /// Number of distinct destination addresses
    pub unique_destinations: usize,

    /// Packets per protocol
    pub protocols: HashMap<String, usize>,

    /// Arithmetic mean packet length in bytes
    pub avg_packet_size: f64,

    /// Largest packet length in bytes
    pub max_packet_size: usize,

    /// Total bytes per source address
    pub traffic_by_source: HashMap<String, usize>,
}

impl BatchStatistics {
    /// Sum of all per-source byte totals.
    ///
    /// Equals the sum of every packet length in the batch.
    pub fn total_bytes(&self) -> usize {
        self.traffic_by_source.values().sum()
    }
}
