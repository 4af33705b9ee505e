//! Local JSON API: read the discovery state, list trending terms, and submit
//! searches from outside the terminal.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use reel_core::config::TmdbConfig;
use reel_core::core::DiscoveryEvent;
use reel_core::state::{LoadState, StateManager};
use reel_core::trending::TrendingRecord;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct HttpState {
    pub state_manager: Arc<StateManager>,
    pub event_tx: mpsc::Sender<DiscoveryEvent>,
    pub tmdb: TmdbConfig,
}

#[derive(Serialize)]
struct ApiState {
    rev: u64,
    query: Option<String>,
    /// `loading`, `error` or `ready`.
    status: &'static str,
    error: Option<String>,
    movies: Vec<MovieInfo>,
}

#[derive(Serialize)]
struct MovieInfo {
    id: u64,
    title: String,
    year: String,
    rating: String,
    language: String,
    poster_url: Option<String>,
    page_url: String,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/trending", get(get_trending))
        .route("/api/search", get(search).post(search))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `bind_address:port` and serve the API on a background task. The bind
/// happens before returning, so a taken port is reported to the caller.
pub async fn start_server(
    bind_address: &str,
    port: u16,
    state_manager: Arc<StateManager>,
    event_tx: mpsc::Sender<DiscoveryEvent>,
    tmdb: TmdbConfig,
) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind((bind_address, port)).await?;
    let addr = listener.local_addr()?;
    info!("HTTP API server listening on http://{}", addr);

    let app = router(HttpState {
        state_manager,
        event_tx,
        tmdb,
    });
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    });
    Ok((addr, handle))
}

async fn get_state(State(state): State<HttpState>) -> Json<ApiState> {
    let snapshot = state.state_manager.get_state().await;
    let (status, error) = match &snapshot.load {
        LoadState::Loading => ("loading", None),
        LoadState::Error(msg) => ("error", Some(msg.clone())),
        LoadState::Ready(_) => ("ready", None),
    };
    let movies = snapshot
        .movies()
        .iter()
        .map(|m| MovieInfo {
            id: m.id,
            title: m.title.clone(),
            year: m.year_label(),
            rating: m.rating_label(),
            language: m.language_label(),
            poster_url: m.poster_url(&state.tmdb),
            page_url: m.page_url(),
        })
        .collect();

    Json(ApiState {
        rev: snapshot.rev,
        query: snapshot.committed_query,
        status,
        error,
        movies,
    })
}

async fn get_trending(State(state): State<HttpState>) -> Json<Vec<TrendingRecord>> {
    Json(state.state_manager.get_state().await.trending)
}

/// Commits `q` immediately; the result shows up in `/api/state`.
async fn search(
    State(state): State<HttpState>,
    Query(params): Query<SearchParams>,
) -> StatusCode {
    match state.event_tx.send(DiscoveryEvent::Submit(params.q)).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
