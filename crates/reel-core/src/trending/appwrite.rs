use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{TrendingRecord, TrendingStore};
use crate::config::{ApiCredentials, AppwriteConfig, TmdbConfig};
use crate::error::TrendingStoreError;
use crate::movie::Movie;

/// Trending records in a hosted Appwrite collection, spoken to over its
/// REST API.
pub struct AppwriteTrendingStore {
    http: reqwest::Client,
    documents_url: String,
    tmdb: TmdbConfig,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<TrendingRecord>,
}

impl AppwriteTrendingStore {
    pub fn new(
        config: &AppwriteConfig,
        credentials: &ApiCredentials,
        tmdb: TmdbConfig,
    ) -> Result<Self, TrendingStoreError> {
        if config.project_id.is_empty() {
            return Err(TrendingStoreError::NotConfigured("trending.appwrite.project_id"));
        }
        if config.database_id.is_empty() {
            return Err(TrendingStoreError::NotConfigured("trending.appwrite.database_id"));
        }
        if config.collection_id.is_empty() {
            return Err(TrendingStoreError::NotConfigured("trending.appwrite.collection_id"));
        }
        let Some(key) = credentials.appwrite_key.as_deref() else {
            return Err(TrendingStoreError::NotConfigured("appwrite API key"));
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Appwrite-Project",
            HeaderValue::from_str(&config.project_id)
                .map_err(|_| TrendingStoreError::NotConfigured("trending.appwrite.project_id"))?,
        );
        let mut key = HeaderValue::from_str(key)
            .map_err(|_| TrendingStoreError::NotConfigured("appwrite API key"))?;
        key.set_sensitive(true);
        headers.insert("X-Appwrite-Key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            documents_url: documents_url(config),
            tmdb,
        })
    }

    async fn list(&self, queries: &[serde_json::Value]) -> Result<Vec<TrendingRecord>, TrendingStoreError> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_string()))
            .collect();
        let resp = self.http.get(&self.documents_url).query(&params).send().await?;
        let resp = check(resp).await?;
        let list: DocumentList = resp.json().await?;
        Ok(list.documents)
    }
}

fn documents_url(config: &AppwriteConfig) -> String {
    format!(
        "{}/databases/{}/collections/{}/documents",
        config.endpoint.trim_end_matches('/'),
        config.database_id,
        config.collection_id
    )
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, TrendingStoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(TrendingStoreError::Status { status, body })
}

impl TrendingStore for AppwriteTrendingStore {
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<(), TrendingStoreError> {
        let existing = self
            .list(&[json!({"method": "equal", "attribute": "searchTerm", "values": [term]})])
            .await?;

        if let Some(doc) = existing.into_iter().next() {
            let url = format!("{}/{}", self.documents_url, doc.id);
            debug!("[trending] appwrite {:?} count -> {}", term, doc.count + 1);
            let resp = self
                .http
                .patch(&url)
                .json(&json!({"data": {"count": doc.count + 1}}))
                .send()
                .await?;
            check(resp).await?;
        } else {
            debug!("[trending] appwrite new term {:?}", term);
            let resp = self
                .http
                .post(&self.documents_url)
                .json(&json!({
                    "documentId": "unique()",
                    "data": {
                        "searchTerm": term,
                        "count": 1,
                        "movie_id": movie.id,
                        "title": movie.title,
                        "poster_url": movie.poster_url(&self.tmdb).unwrap_or_default(),
                    }
                }))
                .send()
                .await?;
            check(resp).await?;
        }
        Ok(())
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingRecord>, TrendingStoreError> {
        let mut docs = self
            .list(&[
                json!({"method": "orderDesc", "attribute": "count"}),
                json!({"method": "limit", "values": [limit]}),
            ])
            .await?;
        docs.truncate(limit);
        Ok(docs)
    }
}
