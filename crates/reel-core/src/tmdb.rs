//! Movie catalog client.

use std::future::Future;

use reqwest::header::ACCEPT;
use tracing::debug;

use crate::config::{ApiCredentials, TmdbConfig};
use crate::error::FetchError;
use crate::movie::MovieResponse;

/// Which catalog listing a committed query maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Popular movies, used whenever the query is empty.
    Discover,
    /// Free-text title search.
    Search(String),
}

impl Endpoint {
    pub fn for_query(query: &str) -> Self {
        if query.is_empty() {
            Self::Discover
        } else {
            Self::Search(query.to_string())
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self {
            Self::Discover => format!("{}/discover/movie?sort_by=popularity.desc", base),
            Self::Search(q) => format!("{}/search/movie?query={}", base, urlencoding::encode(q)),
        }
    }
}

/// Anything that can answer catalog requests. The HTTP client is the real
/// one; tests substitute an in-memory fake.
pub trait MovieApi: Send + Sync + 'static {
    fn fetch(
        &self,
        endpoint: Endpoint,
    ) -> impl Future<Output = Result<MovieResponse, FetchError>> + Send;
}

#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig, credentials: &ApiCredentials) -> Self {
        Self::with_client(reqwest::Client::new(), config, credentials)
    }

    pub fn with_client(
        http: reqwest::Client,
        config: &TmdbConfig,
        credentials: &ApiCredentials,
    ) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            token: credentials.tmdb_token.clone(),
        }
    }
}

impl MovieApi for TmdbClient {
    fn fetch(
        &self,
        endpoint: Endpoint,
    ) -> impl Future<Output = Result<MovieResponse, FetchError>> + Send {
        let url = endpoint.url(&self.base_url);
        let request = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.token);

        async move {
            debug!("[tmdb] GET {}", url);
            let response = request.send().await?;

            if !response.status().is_success() {
                return Err(FetchError::Status(response.status()));
            }

            let data: MovieResponse = response.json().await?;
            debug!("[tmdb] {} results from {}", data.results.len(), url);
            Ok(data)
        }
    }
}
