use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::pipeline::manager::PipelineManager;
use crate::report;

/// Generate the run-once artifacts (text report, traffic volume PNG,
/// protocol and top-source HTML charts) from the latest cycle.
pub async fn generate_report(manager: web::Data<Arc<RwLock<PipelineManager>>>) -> impl Responder {
    let mut manager = manager.write().await;

    // Make sure there is a batch to report on.
    if manager.get_cycle_count() == 0 {
        if let Err(e) = manager.run_cycle() {
            error!("Failed to run pipeline cycle for report: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "status": "error",
                "message": format!("Failed to run pipeline cycle: {}", e)
            }));
        }
    }

    let batch = manager.get_batch(0, usize::MAX);
    let stats = manager.get_stats();
    let incidents = manager.get_incidents();
    let output_dir = manager.config().output_dir.clone();

    match report::generate_artifacts(&batch, stats.as_ref(), &incidents, &output_dir) {
        Ok(written) => {
            info!("Report artifacts written to {}", output_dir.display());
            HttpResponse::Ok().json(serde_json::json!({
                "status": "success",
                "files": written,
            }))
        }
        Err(e) => {
            error!("Failed to generate report artifacts: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "status": "error",
                "message": format!("Failed to generate report artifacts: {}", e)
            }))
        }
    }
}
