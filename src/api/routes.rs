use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::api::handlers::{
    incidents::get_incidents,
    report::generate_report,
    traffic::{get_traffic, get_traffic_stats, refresh},
    upload::upload,
};
use crate::api::websocket::ws_index;

/// Root endpoint to provide information about the API
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "name": "NetForensics API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "A demo network forensics dashboard with REST API",
        "endpoints": [
            {
                "path": "/api/traffic",
                "method": "GET",
                "description": "Get the latest synthetic packet batch"
            },
            {
                "path": "/api/traffic/stats",
                "method": "GET",
                "description": "Get statistics for the latest batch"
            },
            {
                "path": "/api/incidents",
                "method": "GET",
                "description": "Get incidents detected in the latest cycle"
            },
            {
                "path": "/api/refresh",
                "method": "POST",
                "description": "Run one pipeline cycle now"
            },
            {
                "path": "/api/upload",
                "method": "POST",
                "description": "Upload capture files (classified by filename only)"
            },
            {
                "path": "/api/report",
                "method": "POST",
                "description": "Generate report and chart artifacts"
            },
            {
                "path": "/api/ws",
                "method": "GET",
                "description": "WebSocket endpoint for real-time updates"
            }
        ]
    }))
}

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Root endpoint
        .route("/", web::get().to(index))
        .service(
            web::scope("/api")
                // WebSocket route for real-time updates
                .route("/ws", web::get().to(ws_index))
                // Pipeline data
                .service(
                    web::scope("/traffic")
                        .route("", web::get().to(get_traffic))
                        .route("/stats", web::get().to(get_traffic_stats)),
                )
                .route("/incidents", web::get().to(get_incidents))
                .route("/refresh", web::post().to(refresh))
                // Upload and artifacts
                .route("/upload", web::post().to(upload))
                .route("/report", web::post().to(generate_report)),
        );
}
