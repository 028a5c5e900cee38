use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use uuid::Uuid;

/// What kind of suspicious pattern a rule flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentKind {
    LargePacket,
    SuspiciousPort,
    TrafficBurst,
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IncidentKind::LargePacket => "LARGE_PACKET",
            IncidentKind::SuspiciousPort => "SUSPICIOUS_PORT",
            IncidentKind::TrafficBurst => "TRAFFIC_BURST",
        };
        f.write_str(s)
    }
}

/// Ordinal severity attached to an incident.
///
/// Not used for prioritization anywhere; it only colors the dashboard
/// and the log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        };
        f.write_str(s)
    }
}

/// A rule-evaluator finding for one batch.
///
/// Derived solely from the batch that produced it; the detector keeps
/// no cross-cycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Unique identifier for this incident
    pub id: Uuid,

    /// Rule that fired
    pub kind: IncidentKind,

    /// Severity classification
    pub severity: Severity,

    /// Human-readable detail string
    pub details: String,

    /// Source address of the offending packet, when the rule has one
    pub source: Option<Ipv4Addr>,

    /// Destination address of the offending packet, when the rule has one
    pub destination: Option<Ipv4Addr>,

    /// When the flagged traffic occurred
    pub timestamp: DateTime<Utc>,
}

impl IncidentRecord {
    /// The flat-file log line for this incident, minus the write-time
    /// timestamp prefix added by the sink.
    pub fn log_detail(&self) -> String {
        format!("{} - {}: {}", self.severity, self.kind, self.details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_matches_wire_format() {
        assert_eq!(IncidentKind::LargePacket.to_string(), "LARGE_PACKET");
        let json = serde_json::to_string(&IncidentKind::SuspiciousPort).unwrap();
        assert_eq!(json, "\"SUSPICIOUS_PORT\"");
    }

    #[test]
    fn severity_orders_low_to_high() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert_eq!(Severity::High.to_string(), "HIGH");
    }

    #[test]
    fn log_detail_format() {
        let incident = IncidentRecord {
            id: Uuid::new_v4(),
            kind: IncidentKind::LargePacket,
            severity: Severity::Medium,
            details: "Large packet detected: 9500 bytes".to_string(),
            source: None,
            destination: None,
            timestamp: Utc::now(),
        };

        assert_eq!(
            incident.log_detail(),
            "MEDIUM - LARGE_PACKET: Large packet detected: 9500 bytes"
        );
    }
}
