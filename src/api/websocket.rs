use actix_web::{web, Error, HttpRequest, Responder};
use actix_ws::{self, Message};
use futures_util::StreamExt;
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::interval;

use crate::models::stats::BatchStatistics;
use crate::pipeline::manager::PipelineManager;

// How often heartbeat pings are sent
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// WebSocket message types that can be sent to clients
#[derive(Serialize)]
#[serde(tag = "type")]
enum WsOutMessage {
    #[serde(rename = "stats")]
    Stats { stats: BatchStatistics },

    #[serde(rename = "status")]
    Status {
        cycle: u64,
        packet_count: usize,
        incident_count: usize,
    },

    #[serde(rename = "ping")]
    Ping { timestamp: u64 },
}

/// Handle WebSocket connections.
///
/// Clients receive a stats message after every pipeline cycle, heartbeat
/// pings every 5 seconds, and can request "stats" or "status" on demand.
pub async fn ws_index(
    req: HttpRequest,
    body: web::Payload,
    manager: web::Data<Arc<RwLock<PipelineManager>>>,
) -> Result<impl Responder, Error> {
    let addr = req
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    info!("WebSocket connection from: {}", addr);

    let (response, session, mut msg_stream) = actix_ws::handle(&req, body)?;
    let manager = manager.into_inner();

    let session_for_handler = session.clone();
    let session_for_updates = session.clone();
    let session_for_heartbeat = session;

    actix_web::rt::spawn(async move {
        // Subscribe before anything else so no cycle is missed.
        let mut stats_rx = {
            let manager = manager.read().await;
            manager.subscribe_to_stats()
        };

        // Send an initial status snapshot.
        let mut session_clone = session_for_handler.clone();
        if let Err(e) = send_status(&mut session_clone, &manager).await {
            warn!("Failed to send initial status: {}", e);
            return;
        }

        let ws_msg_task = {
            let mut session = session_for_handler;
            let manager = manager.clone();

            async move {
                while let Some(Ok(msg)) = msg_stream.next().await {
                    match msg {
                        Message::Ping(bytes) => {
                            if session.pong(&bytes).await.is_err() {
                                break;
                            }
                        }
                        Message::Text(text) => {
                            debug!("Received text message: {}", text);
                            match text.trim() {
                                "status" => {
                                    if send_status(&mut session, &manager).await.is_err() {
                                        break;
                                    }
                                }
                                "stats" => {
                                    if send_stats(&mut session, &manager).await.is_err() {
                                        break;
                                    }
                                }
                                _ => {}
                            }
                        }
                        Message::Close(_) => {
                            info!("Client requested close");
                            break;
                        }
                        _ => {}
                    }
                }
            }
        };

        // Push fresh statistics to the client after each cycle.
        let stats_updates_task = {
            let mut session = session_for_updates;

            async move {
                while let Ok(stats) = stats_rx.recv().await {
                    let msg = WsOutMessage::Stats { stats };
                    if let Ok(json) = serde_json::to_string(&msg) {
                        if session.text(json).await.is_err() {
                            break;
                        }
                    }
                }
            }
        };

        let heartbeat_task = {
            let mut session = session_for_heartbeat;

            async move {
                let mut heartbeat = interval(HEARTBEAT_INTERVAL);
                loop {
                    heartbeat.tick().await;

                    let ping = WsOutMessage::Ping {
                        timestamp: chrono::Utc::now().timestamp() as u64,
                    };

                    if let Ok(json) = serde_json::to_string(&ping) {
                        if session.text(json).await.is_err() {
                            break;
                        }
                    }
                }
            }
        };

        tokio::select! {
            _ = ws_msg_task => {},
            _ = stats_updates_task => {},
            _ = heartbeat_task => {},
        }

        info!("WebSocket connection closed");
    });

    Ok(response)
}

/// Send current pipeline status to a WebSocket client
async fn send_status(
    session: &mut actix_ws::Session,
    manager: &Arc<RwLock<PipelineManager>>,
) -> Result<(), actix_ws::Closed> {
    let manager = manager.read().await;
    let msg = WsOutMessage::Status {
        cycle: manager.get_cycle_count(),
        packet_count: manager.get_packet_count(),
        incident_count: manager.get_incidents().len(),
    };

    if let Ok(json) = serde_json::to_string(&msg) {
        session.text(json).await?;
    }

    Ok(())
}

/// Send the latest statistics to a WebSocket client
async fn send_stats(
    session: &mut actix_ws::Session,
    manager: &Arc<RwLock<PipelineManager>>,
) -> Result<(), actix_ws::Closed> {
    let manager = manager.read().await;

    if let Some(stats) = manager.get_stats() {
        let msg = WsOutMessage::Stats { stats };
        if let Ok(json) = serde_json::to_string(&msg) {
            session.text(json).await?;
        }
    }

    Ok(())
}
