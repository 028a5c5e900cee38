use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::packet::PacketRecord;
use crate::models::stats::BatchStatistics;
use crate::pipeline::manager::PipelineManager;

/// Query parameters for listing the latest batch
#[derive(Deserialize)]
pub struct TrafficQuery {
    /// Offset for pagination
    #[serde(default = "default_offset")]
    offset: usize,

    /// Limit for pagination
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_offset() -> usize {
    0
}
fn default_limit() -> usize {
    100
}

/// Response for listing the latest batch
#[derive(Serialize)]
struct TrafficResponse {
    packets: Vec<PacketRecord>,
    total: usize,
    offset: usize,
    limit: usize,
    cycle: u64,
}

/// Response for batch statistics
#[derive(Serialize)]
struct StatsResponse {
    stats: Option<BatchStatistics>,
    cycle: u64,
    last_cycle_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Get the latest generated batch
pub async fn get_traffic(
    manager: web::Data<Arc<RwLock<PipelineManager>>>,
    query: web::Query<TrafficQuery>,
) -> impl Responder {
    let manager = manager.read().await;

    let packets = manager.get_batch(query.offset, query.limit);
    let total = manager.get_packet_count();

    info!(
        "Retrieved {} packets (offset: {}, limit: {}, total: {})",
        packets.len(),
        query.offset,
        query.limit,
        total
    );

    HttpResponse::Ok().json(TrafficResponse {
        packets,
        total,
        offset: query.offset,
        limit: query.limit,
        cycle: manager.get_cycle_count(),
    })
}

/// Get statistics for the latest batch
///
/// `stats` is null until the first cycle has run.
pub async fn get_traffic_stats(
    manager: web::Data<Arc<RwLock<PipelineManager>>>,
) -> impl Responder {
    let manager = manager.read().await;

    HttpResponse::Ok().json(StatsResponse {
        stats: manager.get_stats(),
        cycle: manager.get_cycle_count(),
        last_cycle_at: manager.get_last_cycle_at(),
    })
}

/// Run one pipeline cycle immediately
pub async fn refresh(manager: web::Data<Arc<RwLock<PipelineManager>>>) -> impl Responder {
    let mut manager = manager.write().await;

    match manager.run_cycle() {
        Ok(()) => {
            info!(
                "Manual refresh: cycle {} produced {} packets, {} incidents",
                manager.get_cycle_count(),
                manager.get_packet_count(),
                manager.get_incidents().len()
            );
            HttpResponse::Ok().json(serde_json::json!({
                "status": "success",
                "cycle": manager.get_cycle_count(),
                "packets": manager.get_packet_count(),
                "incidents": manager.get_incidents().len(),
            }))
        }
        Err(e) => {
            error!("Failed to run pipeline cycle: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "status": "error",
                "message": format!("Failed to run pipeline cycle: {}", e)
            }))
        }
    }
}
