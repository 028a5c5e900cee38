use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Protocols the synthetic generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    Http,
    Https,
}

impl Protocol {
    /// The full set of protocols a record can carry.
    pub const ALL: [Protocol; 5] = [
        Protocol::Tcp,
        Protocol::Udp,
        Protocol::Icmp,
        Protocol::Http,
        Protocol::Https,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Icmp => "ICMP",
            Protocol::Http => "HTTP",
            Protocol::Https => "HTTPS",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single synthetic packet record.
///
/// Records are immutable once generated and live for exactly one
/// pipeline cycle; nothing persists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketRecord {
    /// When the packet was "observed" (second resolution)
    pub timestamp: DateTime<Utc>,

    /// Source IP address
    pub source: Ipv4Addr,

    /// Destination IP address
    pub destination: Ipv4Addr,

    /// Protocol tag
    pub protocol: Protocol,

    /// Length of the packet in bytes
    pub length: usize,

    /// Source port
    pub source_port: u16,

    /// Destination port
    pub destination_port: u16,
}
