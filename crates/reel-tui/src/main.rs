mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod http;
mod theme;
mod widgets;

use std::sync::Arc;

use reel_core::config::{ApiCredentials, Config};
use reel_core::core::{BroadcastMessage, DiscoveryCore, DiscoveryEvent};
use reel_core::tmdb::TmdbClient;
use reel_core::trending::TrendingBackend;
use tokio::sync::{broadcast, mpsc};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = reel_core::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("reel.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("reel log: {}", log_path.display());
    tracing::info!("reel starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("config unreadable ({:#}), using defaults", e);
            Config::default()
        }
    };
    let credentials = ApiCredentials::from_env(&config);
    let missing_token = !credentials.has_tmdb_token();
    if missing_token {
        tracing::warn!(
            "{} is not set; catalog requests will be rejected",
            config.tmdb.token_env
        );
    }

    let api = Arc::new(TmdbClient::new(&config.tmdb, &credentials));
    let store = Arc::new(TrendingBackend::from_config(&config, &credentials));
    let trending_backend = store.name();
    tracing::info!("trending backend: {}", trending_backend);

    // ── Channels ─────────────────────────────────────────────────────────────
    let (broadcast_tx, broadcast_rx) = broadcast::channel::<BroadcastMessage>(1024);
    let (event_tx, event_rx) = mpsc::channel::<DiscoveryEvent>(1024);

    // ── Build DiscoveryCore ──────────────────────────────────────────────────
    let core = DiscoveryCore::new(&config, api, store, broadcast_tx, event_tx.clone());
    let state_manager = core.state_manager();

    // ── HTTP server ──────────────────────────────────────────────────────────
    let mut startup_warnings = Vec::new();
    let http_addr = if config.http.enabled {
        match http::start_server(
            &config.http.bind_address,
            config.http.port,
            Arc::clone(&state_manager),
            event_tx.clone(),
            config.tmdb.clone(),
        )
        .await
        {
            Ok((addr, _server)) => Some(addr.to_string()),
            Err(e) => {
                tracing::error!(
                    "failed to bind HTTP server to {}:{}: {}",
                    config.http.bind_address,
                    config.http.port,
                    e
                );
                startup_warnings.push(format!("HTTP API off: {}", e));
                None
            }
        }
    } else {
        None
    };

    // ── Spawn DiscoveryCore event loop ───────────────────────────────────────
    let core_task = tokio::spawn(async move {
        if let Err(e) = core.run(event_rx).await {
            tracing::error!("DiscoveryCore exited with error: {}", e);
        }
    });

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let mut app = app::App::new(
        config.tmdb.clone(),
        log_path,
        http_addr,
        trending_backend,
        event_tx.clone(),
        state_manager,
    );
    if missing_token {
        startup_warnings.push(format!("{} not set: searches will fail", config.tmdb.token_env));
    }
    for msg in startup_warnings {
        app.warn_on_start(msg);
    }
    let result = app.run(broadcast_rx).await;

    let _ = event_tx.send(DiscoveryEvent::Shutdown).await;
    let _ = core_task.await;
    tracing::info!("reel stopped");

    result
}
