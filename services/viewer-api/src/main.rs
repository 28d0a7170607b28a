//! Viewer API Server
//!
//! Backend for the click-to-identify map viewer.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use viewer_api::config::{ViewerConfig, DEFAULT_WFS_URL, DEFAULT_WMS_URL};
use viewer_api::state::AppState;

/// Viewer API Server
#[derive(Parser, Debug)]
#[command(name = "viewer-api")]
#[command(about = "Click-to-identify backend for WMS/WFS map viewers")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8090", env = "LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// WMS endpoint for tiles and GetFeatureInfo
    #[arg(long, default_value = DEFAULT_WMS_URL, env = "WMS_URL")]
    wms_url: String,

    /// WFS endpoint for the GetFeature fallback
    #[arg(long, default_value = DEFAULT_WFS_URL, env = "WFS_URL")]
    wfs_url: String,

    /// Layer configuration file
    #[arg(long, default_value = "config/layers.yaml", env = "LAYERS_FILE")]
    layers_file: PathBuf,

    /// Timeout for each WMS/WFS request (default: none)
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "WORKER_THREADS")]
    worker_threads: Option<usize>,
}

impl Args {
    fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            wms_url: self.wms_url.clone(),
            wfs_url: self.wfs_url.clone(),
            layers_file: self.layers_file.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;
    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    let config = args.viewer_config();
    info!(
        wms_url = %config.wms_url,
        wfs_url = %config.wfs_url,
        layers_file = %config.layers_file.display(),
        "Starting viewer API server"
    );

    let state = AppState::new(config)?.with_metrics(prometheus_handle);
    info!(layers = state.catalog.len(), "Layer catalog ready");

    let app = viewer_api::build_router(Arc::new(state));

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
