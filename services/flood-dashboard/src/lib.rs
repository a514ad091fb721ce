//! Flood Dashboard - flood sensor and prediction dashboard service
//!
//! Polls the flood API for sensor series and risk predictions, renders
//! display slots and a chart from the latest snapshot, and serves them.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod io;
pub mod model;
pub mod render;
pub mod state;

pub use config::{load_config, Config};
pub use error::{DashboardError, FetchError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::engine::Engine;
use crate::fetcher::FloodApiClient;
use crate::io::ReqwestHttpClient;

/// Run the flood dashboard service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;

    let http: Arc<dyn io::HttpClient> =
        Arc::new(ReqwestHttpClient::new(config.api.request_timeout));
    let cancel = CancellationToken::new();

    let api = FloodApiClient::new(&config.api.base_url, http);
    let state = state::new_state_handle(
        config.scheduler.initial_source,
        config.scheduler.initial_chart,
        config.api.default_range,
        config.display.water_slots,
    );
    let engine = Arc::new(Engine::new(
        api,
        state,
        config.scheduler.refresh_interval,
        cancel.clone(),
    ));

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    if config.dashboard.enabled {
        let dashboard_port = config.dashboard.port;
        let addr = SocketAddr::from(([0, 0, 0, 0], dashboard_port));
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            DashboardError::Dashboard(format!(
                "Failed to bind dashboard to port {}: {}",
                dashboard_port, e
            ))
        })?;
        tracing::info!("Dashboard listening on http://{}", addr);

        let router = dashboard::build_router(Arc::clone(&engine));
        let cancel_for_dashboard = cancel.clone();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();

            tracing::debug!("Dashboard stopped");
        });
    }

    tracing::info!(
        "Polling {} every {:?}",
        config.api.base_url,
        config.scheduler.refresh_interval
    );

    // Run the refresh timer (blocks until cancelled)
    engine.run().await;
    tracing::info!("Flood dashboard stopped");

    Ok(())
}
