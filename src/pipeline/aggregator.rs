use std::collections::{HashMap, HashSet};

use crate::models::packet::PacketRecord;
use crate::models::stats::BatchStatistics;

/// Compute descriptive statistics over a batch.
///
/// Returns `None` for an empty batch: there is no meaningful average
/// for zero packets, and callers surface the absence of data explicitly
/// rather than rendering fabricated zeros.
pub fn summarize(batch: &[PacketRecord]) -> Option<BatchStatistics> {
    if batch.is_empty() {
        return None;
    }

    let mut sources = HashSet::new();
    let mut destinations = HashSet::new();
    let mut protocols: HashMap<String, usize> = HashMap::new();
    let mut traffic_by_source: HashMap<String, usize> = HashMap::new();
    let mut total_bytes = 0usize;
    let mut max_packet_size = 0usize;

    for record in batch {
        sources.insert(record.source);
        destinations.insert(record.destination);

        *protocols.entry(record.protocol.to_string()).or_insert(0) += 1;
        *traffic_by_source
            .entry(record.source.to_string())
            .or_insert(0) += record.length;

        total_bytes += record.length;
        max_packet_size = max_packet_size.max(record.length);
    }

    Some(BatchStatistics {
        total_packets: batch.len(),
        unique_sources: sources.len(),
        unique_destinations: destinations.len(),
        protocols,
        avg_packet_size: total_bytes as f64 / batch.len() as f64,
        max_packet_size,
        traffic_by_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::packet::Protocol;
    use chrono::Utc;
    use std::net::Ipv4Addr;

    fn record(source: u8, protocol: Protocol, length: usize) -> PacketRecord {
        PacketRecord {
            timestamp: Utc::now(),
            source: Ipv4Addr::new(192, 168, 1, source),
            destination: Ipv4Addr::new(10, 0, 0, 9),
            protocol,
            length,
            source_port: 80,
            destination_port: 443,
        }
    }

    #[test]
    fn empty_batch_yields_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn totals_and_averages_match_the_batch() {
        let batch = vec![
            record(2, Protocol::Tcp, 100),
            record(2, Protocol::Tcp, 300),
            record(3, Protocol::Udp, 200),
        ];

        let stats = summarize(&batch).unwrap();

        assert_eq!(stats.total_packets, 3);
        assert_eq!(stats.unique_sources, 2);
        assert_eq!(stats.unique_destinations, 1);
        assert_eq!(stats.avg_packet_size, 200.0);
        assert_eq!(stats.max_packet_size, 300);
        assert_eq!(stats.protocols["TCP"], 2);
        assert_eq!(stats.protocols["UDP"], 1);
        assert_eq!(stats.traffic_by_source["192.168.1.2"], 400);
        assert_eq!(stats.traffic_by_source["192.168.1.3"], 200);
    }

    #[test]
    fn per_source_bytes_sum_to_total_length() {
        let batch = vec![
            record(4, Protocol::Http, 64),
            record(5, Protocol::Https, 1500),
            record(4, Protocol::Icmp, 700),
        ];

        let stats = summarize(&batch).unwrap();
        let total_length: usize = batch.iter().map(|r| r.length).sum();

        assert_eq!(stats.total_bytes(), total_length);
    }

    #[test]
    fn summarize_is_idempotent() {
        let batch = vec![
            record(6, Protocol::Tcp, 512),
            record(7, Protocol::Https, 1024),
        ];

        assert_eq!(summarize(&batch), summarize(&batch));
    }
}
