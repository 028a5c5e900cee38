use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::incident::{IncidentKind, IncidentRecord, Severity};
use crate::models::packet::PacketRecord;

/// Detection thresholds, fixed at construction.
#[derive(Debug, Clone)]
pub struct Thresholds {
    /// Packets longer than this many bytes are flagged
    pub large_packet_bytes: usize,

    /// Second-buckets with more packets than this are flagged
    pub burst_packets_per_second: usize,

    /// Ports considered suspicious in either direction (SSH, Telnet, RDP)
    pub suspicious_ports: Vec<u16>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            large_packet_bytes: 9000,
            burst_packets_per_second: 1000,
            suspicious_ports: vec![22, 23, 3389],
        }
    }
}

/// Scans a batch against three independent threshold rules.
///
/// Each call is a pure function of its input batch; no counters or
/// other state survive between cycles.
pub struct IncidentDetector {
    thresholds: Thresholds,
}

impl IncidentDetector {
    pub fn new() -> Self {
        Self {
            thresholds: Thresholds::default(),
        }
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Run all three rules over the batch and collect their findings.
    pub fn detect(&self, batch: &[PacketRecord]) -> Vec<IncidentRecord> {
        if batch.is_empty() {
            return Vec::new();
        }

        let mut incidents = Vec::new();
        self.detect_large_packets(batch, &mut incidents);
        self.detect_suspicious_ports(batch, &mut incidents);
        self.detect_traffic_bursts(batch, &mut incidents);
        incidents
    }

    /// One MEDIUM incident per record exceeding the length threshold.
    fn detect_large_packets(&self, batch: &[PacketRecord], incidents: &mut Vec<IncidentRecord>) {
        for record in batch {
            if record.length > self.thresholds.large_packet_bytes {
                incidents.push(IncidentRecord {
                    id: Uuid::new_v4(),
                    kind: IncidentKind::LargePacket,
                    severity: Severity::Medium,
                    details: format!("Large packet detected: {} bytes", record.length),
                    source: Some(record.source),
                    destination: Some(record.destination),
                    timestamp: record.timestamp,
                });
            }
        }
    }

    /// One HIGH incident per matching direction. A record suspicious on
    /// both its source and destination port yields two incidents; no
    /// deduplication.
    fn detect_suspicious_ports(&self, batch: &[PacketRecord], incidents: &mut Vec<IncidentRecord>) {
        for record in batch {
            for port in [record.source_port, record.destination_port] {
                if self.thresholds.suspicious_ports.contains(&port) {
                    incidents.push(IncidentRecord {
                        id: Uuid::new_v4(),
                        kind: IncidentKind::SuspiciousPort,
                        severity: Severity::High,
                        details: format!("Suspicious port detected: {}", port),
                        source: Some(record.source),
                        destination: Some(record.destination),
                        timestamp: record.timestamp,
                    });
                }
            }
        }
    }

    /// One LOW incident per second-bucket whose packet count exceeds the
    /// burst threshold.
    ///
    /// Buckets are keyed by the full timestamp (already second
    /// resolution), so packets from different minutes that share a
    /// seconds-of-minute value never land in the same bucket. The
    /// incident carries the bucket's own timestamp.
    fn detect_traffic_bursts(&self, batch: &[PacketRecord], incidents: &mut Vec<IncidentRecord>) {
        let mut buckets: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();
        for record in batch {
            *buckets.entry(record.timestamp).or_insert(0) += 1;
        }

        for (second, count) in buckets {
            if count > self.thresholds.burst_packets_per_second {
                incidents.push(IncidentRecord {
                    id: Uuid::new_v4(),
                    kind: IncidentKind::TrafficBurst,
                    severity: Severity::Low,
                    details: format!("Traffic burst detected: {} packets/second", count),
                    source: None,
                    destination: None,
                    timestamp: second,
                });
            }
        }
    }
}

impl Default for IncidentDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::packet::Protocol;
    use chrono::TimeZone;
    use std::net::Ipv4Addr;

    fn record(length: usize, source_port: u16, destination_port: u16) -> PacketRecord {
        PacketRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 15).unwrap(),
            source: Ipv4Addr::new(192, 168, 1, 50),
            destination: Ipv4Addr::new(10, 0, 0, 50),
            protocol: Protocol::Tcp,
            length,
            source_port,
            destination_port,
        }
    }

    #[test]
    fn oversized_packet_raises_one_medium_incident() {
        let detector = IncidentDetector::new();
        let batch = vec![record(9500, 80, 443), record(1500, 80, 443)];

        let incidents = detector.detect(&batch);

        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].kind, IncidentKind::LargePacket);
        assert_eq!(incidents[0].severity, Severity::Medium);
        assert!(incidents[0].details.contains("9500 bytes"));
        assert_eq!(incidents[0].source, Some(Ipv4Addr::new(192, 168, 1, 50)));
        assert_eq!(incidents[0].timestamp, batch[0].timestamp);
    }

    #[test]
    fn suspicious_destination_port_raises_one_high_incident() {
        let detector = IncidentDetector::new();
        let batch = vec![record(500, 80, 22)];

        let incidents = detector.detect(&batch);

        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].kind, IncidentKind::SuspiciousPort);
        assert_eq!(incidents[0].severity, Severity::High);
        assert!(incidents[0].details.contains("22"));
    }

    #[test]
    fn suspicious_ports_on_both_ends_are_not_deduplicated() {
        let detector = IncidentDetector::new();
        let batch = vec![record(500, 23, 3389)];

        let incidents = detector.detect(&batch);

        assert_eq!(incidents.len(), 2);
        assert!(incidents
            .iter()
            .all(|i| i.kind == IncidentKind::SuspiciousPort));
        assert!(incidents[0].details.contains("23"));
        assert!(incidents[1].details.contains("3389"));
    }

    #[test]
    fn burst_bucket_over_threshold_raises_one_low_incident() {
        let detector = IncidentDetector::new();
        let second = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 7).unwrap();
        let batch: Vec<PacketRecord> = (0..1001)
            .map(|_| PacketRecord {
                timestamp: second,
                ..record(500, 80, 443)
            })
            .collect();

        let incidents = detector.detect(&batch);

        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].kind, IncidentKind::TrafficBurst);
        assert_eq!(incidents[0].severity, Severity::Low);
        assert!(incidents[0].details.contains("1001 packets/second"));
        // The incident points at the burst's own second, not at when the
        // evaluation ran.
        assert_eq!(incidents[0].timestamp, second);
    }

    #[test]
    fn seconds_of_minute_collisions_across_minutes_do_not_merge() {
        // 600 packets at 12:30:07 and 600 at 12:31:07: same seconds-of-minute,
        // different minutes. Neither bucket crosses the threshold.
        let detector = IncidentDetector::new();
        let first = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 7).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 3, 1, 12, 31, 7).unwrap();

        let mut batch = Vec::new();
        for _ in 0..600 {
            batch.push(PacketRecord {
                timestamp: first,
                ..record(500, 80, 443)
            });
            batch.push(PacketRecord {
                timestamp: second,
                ..record(500, 80, 443)
            });
        }

        assert!(detector.detect(&batch).is_empty());
    }

    #[test]
    fn empty_batch_yields_no_incidents() {
        assert!(IncidentDetector::new().detect(&[]).is_empty());
    }
}
