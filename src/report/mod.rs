pub mod charts;

use chrono::Utc;
use log::info;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::incident::IncidentRecord;
use crate::models::packet::PacketRecord;
use crate::models::stats::BatchStatistics;
use crate::utils::error::AppResult;

/// File names of the run-once artifacts.
pub const REPORT_FILE: &str = "network_analysis_report.txt";
pub const TRAFFIC_VOLUME_FILE: &str = "traffic_volume.png";
pub const PROTOCOL_DIST_FILE: &str = "protocol_distribution.html";
pub const TOP_SOURCES_FILE: &str = "top_sources.html";

/// Render the plain-text analysis report.
pub fn render_report(stats: Option<&BatchStatistics>, incidents: &[IncidentRecord]) -> String {
    let Some(stats) = stats else {
        return "No data to generate report".to_string();
    };

    let mut report = format!(
        "\nNetwork Traffic Analysis Report\n\
         Generated: {}\n\
         =====================================\n\n\
         Traffic Summary:\n\
         ---------------\n\
         Total Packets: {}\n\
         Unique Sources: {}\n\
         Unique Destinations: {}\n\
         Average Packet Size: {:.2} bytes\n\
         Maximum Packet Size: {} bytes\n\n\
         Protocol Distribution:\n\
         --------------------\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S"),
        stats.total_packets,
        stats.unique_sources,
        stats.unique_destinations,
        stats.avg_packet_size,
        stats.max_packet_size,
    );

    let mut protocols: Vec<(&String, &usize)> = stats.protocols.iter().collect();
    protocols.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (protocol, count) in protocols {
        let _ = writeln!(report, "{}: {} packets", protocol, count);
    }

    report.push_str("\nSecurity Incidents:\n------------------\n");
    if incidents.is_empty() {
        report.push_str("No security incidents detected.\n");
    } else {
        for incident in incidents {
            let _ = writeln!(report, "- {}", incident.log_detail());
        }
    }

    report
}

/// Write all four run-once artifacts into `output_dir` and return their
/// paths: the text report, the traffic volume PNG, and the two
/// interactive HTML charts.
pub fn generate_artifacts(
    batch: &[PacketRecord],
    stats: Option<&BatchStatistics>,
    incidents: &[IncidentRecord],
    output_dir: &Path,
) -> AppResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    let report_path = output_dir.join(REPORT_FILE);
    fs::write(&report_path, render_report(stats, incidents))?;
    written.push(report_path);

    let volume_path = output_dir.join(TRAFFIC_VOLUME_FILE);
    charts::render_traffic_volume_png(batch, &volume_path)?;
    written.push(volume_path);

    if let Some(stats) = stats {
        let protocol_path = output_dir.join(PROTOCOL_DIST_FILE);
        charts::write_protocol_distribution_html(stats, &protocol_path)?;
        written.push(protocol_path);
    }

    let sources_path = output_dir.join(TOP_SOURCES_FILE);
    charts::write_top_sources_html(batch, &sources_path)?;
    written.push(sources_path);

    for path in &written {
        info!("Wrote {}", path.display());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::incident::{IncidentKind, Severity};
    use crate::models::packet::Protocol;
    use chrono::{TimeZone, Utc};
    use std::net::Ipv4Addr;
    use uuid::Uuid;

    fn batch() -> Vec<PacketRecord> {
        vec![
            PacketRecord {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
                source: Ipv4Addr::new(192, 168, 1, 2),
                destination: Ipv4Addr::new(10, 0, 0, 2),
                protocol: Protocol::Http,
                length: 400,
                source_port: 80,
                destination_port: 443,
            },
            PacketRecord {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 30).unwrap(),
                source: Ipv4Addr::new(192, 168, 1, 3),
                destination: Ipv4Addr::new(10, 0, 0, 3),
                protocol: Protocol::Tcp,
                length: 600,
                source_port: 443,
                destination_port: 53,
            },
        ]
    }

    #[test]
    fn report_without_data_says_so() {
        assert_eq!(render_report(None, &[]), "No data to generate report");
    }

    #[test]
    fn report_lists_stats_and_incidents() {
        let batch = batch();
        let stats = crate::pipeline::aggregator::summarize(&batch).unwrap();
        let incidents = vec![IncidentRecord {
            id: Uuid::new_v4(),
            kind: IncidentKind::TrafficBurst,
            severity: Severity::Low,
            details: "Traffic burst detected: 1001 packets/second".to_string(),
            source: None,
            destination: None,
            timestamp: Utc::now(),
        }];

        let report = render_report(Some(&stats), &incidents);

        assert!(report.contains("Total Packets: 2"));
        assert!(report.contains("Average Packet Size: 500.00 bytes"));
        assert!(report.contains("HTTP: 1 packets"));
        assert!(report.contains("- LOW - TRAFFIC_BURST: Traffic burst detected"));
    }

    #[test]
    fn report_without_incidents_reports_none() {
        let batch = batch();
        let stats = crate::pipeline::aggregator::summarize(&batch).unwrap();

        let report = render_report(Some(&stats), &[]);
        assert!(report.contains("No security incidents detected."));
    }
}
