use plotters::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::models::packet::PacketRecord;
use crate::models::stats::BatchStatistics;
use crate::utils::error::{AppError, AppResult};

/// Pinned plotly.js build embedded by the interactive HTML charts.
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// Total bytes per minute-of-capture, keyed by whole minutes since the
/// earliest record.
pub fn volume_by_minute(batch: &[PacketRecord]) -> Vec<(i64, usize)> {
    let Some(start) = batch.iter().map(|r| r.timestamp).min() else {
        return Vec::new();
    };

    let mut buckets: BTreeMap<i64, usize> = BTreeMap::new();
    for record in batch {
        let minute = (record.timestamp - start).num_seconds() / 60;
        *buckets.entry(minute).or_insert(0) += record.length;
    }

    buckets.into_iter().collect()
}

/// Packet counts for the ten busiest source addresses, descending.
pub fn top_sources(batch: &[PacketRecord], limit: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in batch {
        *counts.entry(record.source.to_string()).or_insert(0) += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(limit);
    sorted
}

/// Render the traffic-volume-over-time chart as a PNG.
pub fn render_traffic_volume_png(batch: &[PacketRecord], path: &Path) -> AppResult<()> {
    let series = volume_by_minute(batch);
    let x_max = series.last().map(|(minute, _)| *minute).unwrap_or(0) + 1;
    let y_max = series.iter().map(|(_, bytes)| *bytes).max().unwrap_or(1);

    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| AppError::Chart(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Network Traffic Volume Over Time", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0i64..x_max, 0usize..y_max + y_max / 10 + 1)
        .map_err(|e| AppError::Chart(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Time (minutes)")
        .y_desc("Bytes")
        .draw()
        .map_err(|e| AppError::Chart(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(series, &BLUE))
        .map_err(|e| AppError::Chart(e.to_string()))?;

    root.present().map_err(|e| AppError::Chart(e.to_string()))?;
    Ok(())
}

/// Write the protocol distribution pie chart as a self-contained HTML
/// document.
pub fn write_protocol_distribution_html(stats: &BatchStatistics, path: &Path) -> AppResult<()> {
    let mut entries: Vec<(&String, &usize)> = stats.protocols.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let labels: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
    let values: Vec<usize> = entries.iter().map(|(_, count)| **count).collect();

    let html = plotly_document(
        "Protocol Distribution",
        &serde_json::json!([{
            "type": "pie",
            "labels": labels,
            "values": values,
            "hole": 0.3,
        }]),
    )?;

    fs::write(path, html)?;
    Ok(())
}

/// Write the top-10 source addresses bar chart as a self-contained HTML
/// document.
pub fn write_top_sources_html(batch: &[PacketRecord], path: &Path) -> AppResult<()> {
    let sources = top_sources(batch, 10);
    let labels: Vec<&str> = sources.iter().map(|(ip, _)| ip.as_str()).collect();
    let values: Vec<usize> = sources.iter().map(|(_, count)| *count).collect();

    let html = plotly_document(
        "Top 10 Source IPs",
        &serde_json::json!([{
            "type": "bar",
            "x": labels,
            "y": values,
        }]),
    )?;

    fs::write(path, html)?;
    Ok(())
}

fn plotly_document(title: &str, traces: &serde_json::Value) -> AppResult<String> {
    let layout = serde_json::json!({ "title": title });

    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<script src=\"{PLOTLY_CDN}\"></script>\n</head>\n\
         <body>\n<div id=\"chart\"></div>\n<script>\n\
         Plotly.newPlot(\"chart\", {traces}, {layout});\n\
         </script>\n</body>\n</html>\n",
        title = title,
        traces = serde_json::to_string(traces)?,
        layout = serde_json::to_string(&layout)?,
    ))
}
