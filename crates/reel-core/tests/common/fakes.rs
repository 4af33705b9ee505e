#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reel_core::config::Config;
use reel_core::core::{BroadcastMessage, DiscoveryCore, DiscoveryEvent};
use reel_core::error::{FetchError, TrendingStoreError};
use reel_core::movie::{Movie, MovieResponse};
use reel_core::state::{DiscoveryState, StateManager};
use reel_core::tmdb::{Endpoint, MovieApi};
use reel_core::trending::{TrendingRecord, TrendingStore};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

#[derive(Clone)]
pub enum Reply {
    Body(Value),
    Status(u16),
}

/// Catalog fake keyed by query text (`""` for the popular listing).
/// Unknown queries answer with an empty result list.
#[derive(Default)]
pub struct FakeApi {
    replies: Mutex<HashMap<String, (Reply, Duration)>>,
    pub calls: Mutex<Vec<Endpoint>>,
}

impl FakeApi {
    pub fn reply(&self, query: &str, reply: Reply) {
        self.reply_after(query, reply, Duration::ZERO);
    }

    pub fn reply_after(&self, query: &str, reply: Reply, delay: Duration) {
        self.replies
            .lock()
            .unwrap()
            .insert(query.to_string(), (reply, delay));
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|e| match e {
                Endpoint::Search(q) => Some(q),
                Endpoint::Discover => None,
            })
            .collect()
    }
}

impl MovieApi for FakeApi {
    fn fetch(
        &self,
        endpoint: Endpoint,
    ) -> impl Future<Output = Result<MovieResponse, FetchError>> + Send {
        let key = match &endpoint {
            Endpoint::Discover => String::new(),
            Endpoint::Search(q) => q.clone(),
        };
        self.calls.lock().unwrap().push(endpoint);
        let (reply, delay) = self
            .replies
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or((Reply::Body(json!({"results": []})), Duration::ZERO));

        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match reply {
                Reply::Body(v) => Ok(serde_json::from_value(v).unwrap()),
                Reply::Status(code) => Err(FetchError::Status(StatusCode::from_u16(code).unwrap())),
            }
        }
    }
}

/// Store fake remembering every `record_search` call. With `record_delay`
/// set, each call sleeps that long before it counts.
#[derive(Default)]
pub struct FakeStore {
    pub recorded: Mutex<Vec<(String, u64)>>,
    pub top: Mutex<Vec<TrendingRecord>>,
    pub fail_listing: Mutex<bool>,
    pub record_delay: Duration,
}

impl FakeStore {
    pub fn recorded(&self) -> Vec<(String, u64)> {
        self.recorded.lock().unwrap().clone()
    }
}

impl TrendingStore for FakeStore {
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<(), TrendingStoreError> {
        if !self.record_delay.is_zero() {
            tokio::time::sleep(self.record_delay).await;
        }
        self.recorded
            .lock()
            .unwrap()
            .push((term.to_string(), movie.id));
        Ok(())
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingRecord>, TrendingStoreError> {
        if *self.fail_listing.lock().unwrap() {
            return Err(TrendingStoreError::NotConfigured("fake"));
        }
        let mut top = self.top.lock().unwrap().clone();
        top.truncate(limit);
        Ok(top)
    }
}

pub fn movies(ids: &[u64]) -> Value {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "title": format!("Movie {}", id)}))
        .collect();
    json!({"page": 1, "results": results})
}

pub fn record(term: &str, count: u64) -> TrendingRecord {
    TrendingRecord {
        id: format!("id-{}", term),
        search_term: term.to_string(),
        count,
        movie_id: count,
        title: term.to_string(),
        poster_url: String::new(),
        updated_at: None,
    }
}

pub struct Harness {
    pub tx: mpsc::Sender<DiscoveryEvent>,
    pub state: Arc<StateManager>,
    pub api: Arc<FakeApi>,
    pub store: Arc<FakeStore>,
    pub broadcasts: broadcast::Receiver<BroadcastMessage>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    pub fn start(api: FakeApi, store: FakeStore) -> Self {
        let config = Config::default();
        let api = Arc::new(api);
        let store = Arc::new(store);
        let (broadcast_tx, broadcasts) = broadcast::channel(256);
        let (tx, rx) = mpsc::channel(256);
        let core = DiscoveryCore::new(
            &config,
            Arc::clone(&api),
            Arc::clone(&store),
            broadcast_tx,
            tx.clone(),
        );
        let state = core.state_manager();
        let handle = tokio::spawn(core.run(rx));
        Self {
            tx,
            state,
            api,
            store,
            broadcasts,
            handle,
        }
    }

    pub async fn type_text(&self, text: &str) {
        self.tx
            .send(DiscoveryEvent::QueryChanged(text.to_string()))
            .await
            .unwrap();
    }

    pub async fn send(&self, evt: DiscoveryEvent) {
        self.tx.send(evt).await.unwrap();
    }

    pub async fn snapshot(&self) -> DiscoveryState {
        self.state.get_state().await
    }

    pub async fn shutdown(self) {
        self.tx.send(DiscoveryEvent::Shutdown).await.unwrap();
        self.handle.await.unwrap().unwrap();
    }
}

/// Let virtual time pass; every task that becomes ready runs first.
pub async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
