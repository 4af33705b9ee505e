use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::movie::Movie;
use crate::trending::TrendingRecord;

/// What the results area shows. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Error(String),
    Ready(Vec<Movie>),
}

impl Default for LoadState {
    fn default() -> Self {
        Self::Ready(Vec::new())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryState {
    /// Bumped on every mutation; readers skip redraws when unchanged.
    pub rev: u64,
    /// Last query handed to the catalog.
    pub committed_query: Option<String>,
    pub load: LoadState,
    pub trending: Vec<TrendingRecord>,
}

impl DiscoveryState {
    pub fn movies(&self) -> &[Movie] {
        match &self.load {
            LoadState::Ready(movies) => movies,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.load {
            LoadState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }
}

pub struct StateManager {
    state: Arc<RwLock<DiscoveryState>>,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(DiscoveryState {
                rev: 1,
                ..DiscoveryState::default()
            })),
        }
    }

    pub async fn get_state(&self) -> DiscoveryState {
        self.state.read().await.clone()
    }

    /// A fetch for `query` is in flight. Clears any previous error.
    pub async fn begin_search(&self, query: &str) {
        let mut state = self.state.write().await;
        state.committed_query = Some(query.to_string());
        state.load = LoadState::Loading;
        state.rev += 1;
    }

    pub async fn finish_search(&self, load: LoadState) {
        let mut state = self.state.write().await;
        state.load = load;
        state.rev += 1;
    }

    pub async fn set_trending(&self, trending: Vec<TrendingRecord>) {
        let mut state = self.state.write().await;
        state.trending = trending;
        state.rev += 1;
    }
}
