//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this but never mutate it; the App event-loop is the only
//! writer.

use std::path::PathBuf;

use reel_core::config::TmdbConfig;
use reel_core::state::DiscoveryState;

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    // ── Discovery ───────────────────────────────────────────────────────────
    /// Latest snapshot from the StateManager.
    pub discovery: DiscoveryState,
    /// Image paths for building poster URLs.
    pub tmdb: TmdbConfig,

    // ── UI mode ─────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
    /// Advanced on every UI tick; drives the loading spinner.
    pub spinner_frame: usize,

    // ── Session ─────────────────────────────────────────────────────────────
    /// Short messages from the core loop (newest last).
    pub logs: Vec<String>,
    /// Cached tail of reel.log (refreshed periodically while the panel is open).
    pub log_lines: Vec<String>,
    pub log_path: PathBuf,
    /// `host:port` of the HTTP API, when enabled.
    pub http_addr: Option<String>,
    pub trending_backend: &'static str,
}

impl AppState {
    pub fn new(
        tmdb: TmdbConfig,
        log_path: PathBuf,
        http_addr: Option<String>,
        trending_backend: &'static str,
    ) -> Self {
        Self {
            discovery: DiscoveryState::default(),
            tmdb,
            input_mode: InputMode::Search,
            spinner_frame: 0,
            logs: Vec::new(),
            log_lines: Vec::new(),
            log_path,
            http_addr,
            trending_backend,
        }
    }

    pub fn last_log(&self) -> Option<&str> {
        self.logs.last().map(String::as_str)
    }
}
