//! Search-popularity records: one per search term, counting how often the
//! term produced results.

mod appwrite;
mod file;
mod recorder;

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{ApiCredentials, Config, TrendingBackendKind};
use crate::error::TrendingStoreError;
use crate::movie::Movie;

pub use appwrite::AppwriteTrendingStore;
pub use file::FileTrendingStore;
pub use recorder::TrendingRecorder;

/// Field names follow the hosted document collection so the same JSON works
/// for both backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingRecord {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: u64,
    pub movie_id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_url: String,
    #[serde(rename = "$updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TrendingRecord {
    /// Catalog page of the movie this term is credited to.
    pub fn page_url(&self) -> String {
        crate::movie::page_url(self.movie_id)
    }
}

pub trait TrendingStore: Send + Sync + 'static {
    /// Exact, case-sensitive lookup of `term`: bump its count, or create it
    /// with count 1 crediting `movie`.
    fn record_search(
        &self,
        term: &str,
        movie: &Movie,
    ) -> impl Future<Output = Result<(), TrendingStoreError>> + Send;

    /// At most `limit` records, count descending.
    fn list_top(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<TrendingRecord>, TrendingStoreError>> + Send;
}

/// Store selected at start-up from `[trending] backend`.
pub enum TrendingBackend {
    File(FileTrendingStore),
    Appwrite(AppwriteTrendingStore),
}

impl TrendingBackend {
    /// Build the configured backend. An incomplete Appwrite section falls
    /// back to the local file so the rest of the app keeps working.
    pub fn from_config(config: &Config, credentials: &ApiCredentials) -> Self {
        let file = || {
            Self::File(FileTrendingStore::new(
                config.trending.store_file.clone(),
                config.tmdb.clone(),
            ))
        };
        match config.trending.backend {
            TrendingBackendKind::File => file(),
            TrendingBackendKind::Appwrite => {
                match AppwriteTrendingStore::new(
                    &config.trending.appwrite,
                    credentials,
                    config.tmdb.clone(),
                ) {
                    Ok(store) => Self::Appwrite(store),
                    Err(e) => {
                        warn!("[trending] appwrite backend unavailable ({}), using file store", e);
                        file()
                    }
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Appwrite(_) => "appwrite",
        }
    }
}

impl TrendingStore for TrendingBackend {
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<(), TrendingStoreError> {
        match self {
            Self::File(s) => s.record_search(term, movie).await,
            Self::Appwrite(s) => s.record_search(term, movie).await,
        }
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingRecord>, TrendingStoreError> {
        match self {
            Self::File(s) => s.list_top(limit).await,
            Self::Appwrite(s) => s.list_top(limit).await,
        }
    }
}
