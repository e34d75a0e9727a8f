// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{collections::HashMap, net::SocketAddr, path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{routing::get, Router};
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use crate::application::clock::SystemClock;
use crate::application::orchestrator::DecisionOrchestrator;
use crate::application::session::FarmSession;
use crate::infrastructure::config::{load_app_config, load_farms_config};
use crate::infrastructure::file_cooldown_store::FileCooldownStore;
use crate::infrastructure::gemini_provider::GeminiProvider;
use crate::infrastructure::simulated_sensor::SimulatedSensorSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_decision, get_history, get_vitals, health_check, list_farms,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;
    let farms_config = load_farms_config()?;

    // Shared collaborators (infrastructure layer)
    let clock = Arc::new(SystemClock);
    let provider = Arc::new(GeminiProvider::new(&app_config.provider)?);
    let sensors = Arc::new(SimulatedSensorSource::new(clock.clone()));
    let orchestrator = DecisionOrchestrator::new(provider);

    let poll_period = Duration::from_secs(app_config.polling.poll_period_secs);
    let cooldown_period = chrono::Duration::seconds(app_config.polling.cooldown_secs);
    let cooldown_dir = Path::new(&app_config.storage.cooldown_dir);

    // One polling session per farm; all stop on the shutdown signal.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut sessions = HashMap::new();
    for farm_config in farms_config.farms {
        let farm = farm_config.into_farm();
        let cooldown = Arc::new(FileCooldownStore::for_farm(cooldown_dir, &farm.id));
        let session = Arc::new(FarmSession::new(
            farm.clone(),
            sensors.clone(),
            orchestrator.clone(),
            cooldown,
            clock.clone(),
            poll_period,
            cooldown_period,
            shutdown_rx.clone(),
        ));
        tokio::spawn(session.clone().run());
        sessions.insert(farm.id, session);
    }

    let state = Arc::new(AppState { sessions });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/farms", get(list_farms))
        .route("/farms/:id/vitals", get(get_vitals))
        .route("/farms/:id/decision", get(get_decision))
        .route("/farms/:id/history", get(get_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .context("Invalid server bind address")?;
    println!("Starting irrigation-advisor service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            // Tear down the polling sessions; any in-flight AI attempt
            // settles and its result is discarded.
            let _ = shutdown_tx.send(true);
        })
        .await?;

    Ok(())
}
