use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::incident::IncidentRecord;
use crate::pipeline::manager::PipelineManager;

/// Response for listing incidents from the latest cycle
#[derive(Serialize)]
struct IncidentsResponse {
    incidents: Vec<IncidentRecord>,
    total: usize,
    cycle: u64,
}

/// Get incidents detected in the latest cycle
pub async fn get_incidents(manager: web::Data<Arc<RwLock<PipelineManager>>>) -> impl Responder {
    let manager = manager.read().await;
    let incidents = manager.get_incidents();

    HttpResponse::Ok().json(IncidentsResponse {
        total: incidents.len(),
        incidents,
        cycle: manager.get_cycle_count(),
    })
}
