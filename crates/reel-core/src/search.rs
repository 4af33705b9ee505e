//! One fetch for one committed query, and the bookkeeping that decides
//! whether its result may still be shown.

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::movie::Movie;
use crate::tmdb::{Endpoint, MovieApi};

/// What a single fetch produced.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Usable results (possibly empty).
    Found(Vec<Movie>),
    /// The catalog answered but flagged the request as failed.
    Rejected(String),
    /// Network, status or decode failure.
    Failed(FetchError),
}

impl SearchOutcome {
    /// First result of a successful, non-empty search for `query`; this is
    /// the movie credited in the trending store.
    pub fn trending_candidate(&self, query: &str) -> Option<&Movie> {
        match self {
            Self::Found(movies) if !query.is_empty() => movies.first(),
            _ => None,
        }
    }
}

/// Issue the request `query` maps to and classify the response.
pub async fn resolve<A: MovieApi>(api: &A, query: &str) -> SearchOutcome {
    let endpoint = Endpoint::for_query(query);
    match api.fetch(endpoint).await {
        Ok(resp) if resp.is_logical_failure() => {
            let msg = resp.error_message();
            warn!("[search] {:?} rejected: {}", query, msg);
            SearchOutcome::Rejected(msg)
        }
        Ok(resp) => {
            debug!("[search] {:?} -> {} movies", query, resp.results.len());
            SearchOutcome::Found(resp.results)
        }
        Err(e) => SearchOutcome::Failed(e),
    }
}

/// Monotonic tags for in-flight fetches. Only the most recently issued tag
/// may publish its result; anything older finished too late.
///
/// Owned by the core loop, so a plain counter is enough.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: u64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new fetch. Every earlier tag becomes stale.
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        self.latest == seq
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}
