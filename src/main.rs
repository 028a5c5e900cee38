mod api;
mod models;
mod pipeline;
mod report;
mod utils;

use actix_web::{web, App, HttpServer};
use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::api::routes;
use crate::models::config::AppConfig;
use crate::pipeline::manager::PipelineManager;
use crate::utils::logging;

#[derive(Parser, Debug)]
#[clap(author, version, about = "A demo network forensics dashboard with REST API")]
struct Args {
    /// Port for the REST API server
    #[clap(short, long, default_value = "8050")]
    port: u16,

    /// Path of the append-only incident log file
    #[clap(long, default_value = "security_incidents.log")]
    incident_log: PathBuf,

    /// Directory that report artifacts are written to
    #[clap(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Seconds between automatic pipeline cycles
    #[clap(long, default_value = "5")]
    interval: u64,

    /// Fixed generator seed for reproducible batches
    #[clap(long)]
    seed: Option<u64>,

    /// Run the pipeline once, write report artifacts, and exit
    #[clap(long)]
    report: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[clap(long, default_value = "info")]
    log_level: String,
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger with specified level
    logging::init_logger(logging::get_log_level(&args.log_level));

    info!("Starting NetForensics v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig {
        port: args.port,
        incident_log: args.incident_log,
        output_dir: args.output_dir,
        interval_secs: args.interval,
        seed: args.seed,
    };

    if args.report {
        return run_once(config);
    }

    let manager = Arc::new(RwLock::new(PipelineManager::new(config.clone())));

    // Run the first cycle up front so the dashboard has data immediately.
    manager.write().await.run_cycle()?;

    // Background task: one pipeline cycle per polling interval.
    let cycle_manager = manager.clone();
    let interval_secs = config.interval_secs;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick fires immediately; the initial cycle already ran.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = cycle_manager.write().await.run_cycle() {
                error!("Pipeline cycle failed: {}", e);
            }
        }
    });

    let app_state = web::Data::new(manager);

    info!("Starting NetForensics API server on port {}", config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind(format!("127.0.0.1:{}", config.port))?
    .run()
    .await?;

    Ok(())
}

/// Run the pipeline once, write all report artifacts, print the report,
/// and exit.
fn run_once(config: AppConfig) -> Result<()> {
    let mut manager = PipelineManager::new(config.clone());
    manager.run_cycle()?;

    let batch = manager.get_batch(0, usize::MAX);
    let stats = manager.get_stats();
    let incidents = manager.get_incidents();

    let written =
        report::generate_artifacts(&batch, stats.as_ref(), &incidents, &config.output_dir)?;

    println!("{}", report::render_report(stats.as_ref(), &incidents));
    println!("Files generated:");
    for path in written {
        println!("- {}", path.display());
    }

    if !incidents.is_empty() {
        println!(
            "\nSecurity incidents detected! Check {} for details.",
            config.incident_log.display()
        );
    }

    Ok(())
}
