use chrono::{DateTime, Duration, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::net::Ipv4Addr;

use crate::models::packet::{PacketRecord, Protocol};

/// Smallest batch the generator produces.
pub const MIN_BATCH_SIZE: usize = 50;
/// Largest batch the generator produces.
pub const MAX_BATCH_SIZE: usize = 100;

/// Smallest packet length in bytes.
pub const MIN_PACKET_LEN: usize = 64;
/// Largest packet length in bytes.
pub const MAX_PACKET_LEN: usize = 1500;

/// Ports records are drawn from: HTTP, HTTPS, DNS, SSH, FTP.
pub const WELL_KNOWN_PORTS: [u16; 5] = [80, 443, 53, 22, 21];

/// How far into the past a record may be backdated, in seconds.
const MAX_TIMESTAMP_OFFSET_SECS: i64 = 60;

/// Produces batches of synthetic packet records.
///
/// Generic over the random source so tests can inject a seeded RNG and
/// assert exact outputs; production uses an entropy-seeded [`StdRng`].
pub struct TrafficGenerator<R: Rng = StdRng> {
    rng: R,
}

impl TrafficGenerator<StdRng> {
    /// Generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generator with a fixed seed: identical seeds yield identical batches.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for TrafficGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> TrafficGenerator<R> {
    /// Generator backed by an arbitrary random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate one batch of 50-100 records, sorted ascending by timestamp.
    ///
    /// Timestamps are backdated up to 60 seconds from `now` and truncated
    /// to whole seconds. Addresses come from two fixed private /24s,
    /// ports from [`WELL_KNOWN_PORTS`], protocols from [`Protocol::ALL`].
    pub fn generate_batch(&mut self) -> Vec<PacketRecord> {
        let now = Utc::now();
        let batch_size = self.rng.gen_range(MIN_BATCH_SIZE..=MAX_BATCH_SIZE);

        let mut batch: Vec<PacketRecord> = (0..batch_size)
            .map(|_| self.generate_record(now))
            .collect();

        batch.sort_by_key(|record| record.timestamp);
        batch
    }

    fn generate_record(&mut self, now: DateTime<Utc>) -> PacketRecord {
        let offset = Duration::seconds(self.rng.gen_range(0..=MAX_TIMESTAMP_OFFSET_SECS));
        let timestamp = (now - offset).with_nanosecond(0).unwrap_or(now - offset);

        let protocol = Protocol::ALL[self.rng.gen_range(0..Protocol::ALL.len())];
        let source_port = WELL_KNOWN_PORTS[self.rng.gen_range(0..WELL_KNOWN_PORTS.len())];
        let destination_port = WELL_KNOWN_PORTS[self.rng.gen_range(0..WELL_KNOWN_PORTS.len())];

        PacketRecord {
            timestamp,
            source: Ipv4Addr::new(192, 168, 1, self.rng.gen_range(2..=254)),
            destination: Ipv4Addr::new(10, 0, 0, self.rng.gen_range(2..=254)),
            protocol,
            length: self.rng.gen_range(MIN_PACKET_LEN..=MAX_PACKET_LEN),
            source_port,
            destination_port,
        }
    }
}
