//! DiscoveryCore: single-owner event loop for all discovery state.
//!
//! The TUI and the HTTP API send `DiscoveryEvent`s; fetch and trending tasks
//! report back through the same channel. Only this loop writes to the
//! `StateManager`, and after every write it broadcasts
//! `BroadcastMessage::StateUpdated` so readers can pull a fresh snapshot.
//!
//! Typed text goes through the debouncer, whose deadline is one arm of the
//! loop's `select!`. Every committed query gets a sequence number; results
//! for anything but the latest commit are dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::TrendingStoreError;
use crate::search::{self, SearchOutcome, SearchSequencer};
use crate::state::{LoadState, StateManager};
use crate::tmdb::MovieApi;
use crate::trending::{TrendingRecord, TrendingRecorder, TrendingStore};

/// How long shutdown waits for queued trending updates to be written.
const RECORDER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

// ── DiscoveryEvent ────────────────────────────────────────────────────────────

/// All inputs into the DiscoveryCore loop.
#[derive(Debug)]
pub enum DiscoveryEvent {
    /// Raw search text changed (every keystroke).
    QueryChanged(String),
    /// Commit this text now, skipping the quiet period.
    Submit(String),
    /// A fetch task finished.
    SearchFinished {
        seq: u64,
        query: String,
        outcome: SearchOutcome,
    },
    /// A trending listing finished.
    TrendingLoaded(Result<Vec<TrendingRecord>, TrendingStoreError>),
    /// Reload the trending section.
    RefreshTrending,
    Shutdown,
}

/// What the core tells its listeners.
#[derive(Debug, Clone)]
pub enum BroadcastMessage {
    /// `DiscoveryState` changed; receivers should fetch from the StateManager.
    StateUpdated,
    /// A short human-readable line for the in-app log.
    Log(String),
}

// ── DiscoveryCore ─────────────────────────────────────────────────────────────

pub struct DiscoveryCore<A, S> {
    api: Arc<A>,
    store: Arc<S>,
    recorder: TrendingRecorder,
    recorder_worker: JoinHandle<()>,
    state_manager: Arc<StateManager>,
    debouncer: Debouncer,
    sequencer: SearchSequencer,
    trending_limit: usize,
    /// Handed to fetch tasks so their results come back through the loop.
    event_tx: mpsc::Sender<DiscoveryEvent>,
    broadcast_tx: broadcast::Sender<BroadcastMessage>,
}

impl<A: MovieApi, S: TrendingStore> DiscoveryCore<A, S> {
    /// Must be called from within a Tokio runtime: the trending recorder
    /// worker is spawned here.
    pub fn new(
        config: &Config,
        api: Arc<A>,
        store: Arc<S>,
        broadcast_tx: broadcast::Sender<BroadcastMessage>,
        event_tx: mpsc::Sender<DiscoveryEvent>,
    ) -> Self {
        let (recorder, recorder_worker) = TrendingRecorder::spawn(Arc::clone(&store));
        Self {
            api,
            store,
            recorder,
            recorder_worker,
            state_manager: Arc::new(StateManager::new()),
            debouncer: Debouncer::new(config.search.debounce()),
            sequencer: SearchSequencer::new(),
            trending_limit: config.trending.limit,
            event_tx,
            broadcast_tx,
        }
    }

    /// Borrow the state manager (for the TUI and the HTTP server).
    pub fn state_manager(&self) -> Arc<StateManager> {
        Arc::clone(&self.state_manager)
    }

    /// Run the core event loop. Starts with the popular listing and one
    /// trending load, then returns when a `Shutdown` event is received, once
    /// the trending updates already queued have been written.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<DiscoveryEvent>) -> anyhow::Result<()> {
        info!(
            "DiscoveryCore: starting event loop (debounce {:?}, trending top {})",
            self.debouncer.window(),
            self.trending_limit
        );

        self.commit(String::new()).await;
        self.load_trending();

        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                evt = event_rx.recv() => match evt {
                    None => {
                        info!("DiscoveryCore: event channel closed, shutting down");
                        break;
                    }
                    Some(DiscoveryEvent::Shutdown) => {
                        info!("DiscoveryCore: shutdown requested");
                        break;
                    }
                    Some(evt) => self.handle_event(evt).await,
                },
                _ = wait_until(deadline) => {
                    if let Some(query) = self.debouncer.poll(Instant::now()) {
                        self.commit(query).await;
                    }
                }
            }
        }

        self.drain_recorder().await;
        Ok(())
    }

    /// Close the recorder queue and wait for the worker to finish the jobs
    /// still in it.
    async fn drain_recorder(self) {
        let Self {
            recorder,
            recorder_worker,
            ..
        } = self;
        drop(recorder);
        match tokio::time::timeout(RECORDER_DRAIN_TIMEOUT, recorder_worker).await {
            Ok(Ok(())) => debug!("DiscoveryCore: trending recorder drained"),
            Ok(Err(e)) => warn!("DiscoveryCore: trending recorder task failed: {}", e),
            Err(_) => warn!(
                "DiscoveryCore: trending updates still pending after {:?}, giving up",
                RECORDER_DRAIN_TIMEOUT
            ),
        }
    }

    async fn handle_event(&mut self, evt: DiscoveryEvent) {
        match evt {
            DiscoveryEvent::QueryChanged(text) => {
                self.debouncer.push(text, Instant::now());
            }

            DiscoveryEvent::Submit(text) => {
                self.debouncer.cancel();
                self.commit(text).await;
            }

            DiscoveryEvent::SearchFinished {
                seq,
                query,
                outcome,
            } => self.finish_search(seq, query, outcome).await,

            DiscoveryEvent::TrendingLoaded(Ok(records)) => {
                debug!("DiscoveryCore: {} trending records", records.len());
                self.state_manager.set_trending(records).await;
                let _ = self.broadcast_tx.send(BroadcastMessage::StateUpdated);
            }

            // Prior trending records stay on screen.
            DiscoveryEvent::TrendingLoaded(Err(e)) => {
                warn!("DiscoveryCore: trending load failed: {}", e);
            }

            DiscoveryEvent::RefreshTrending => self.load_trending(),

            DiscoveryEvent::Shutdown => {}
        }
    }

    /// Hand `query` to the catalog. The previous fetch, if any, keeps running
    /// but its result will be discarded.
    async fn commit(&mut self, query: String) {
        let seq = self.sequencer.begin();
        info!("DiscoveryCore: commit #{} {:?}", seq, query);
        self.state_manager.begin_search(&query).await;
        let _ = self.broadcast_tx.send(BroadcastMessage::StateUpdated);

        let api = Arc::clone(&self.api);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = search::resolve(api.as_ref(), &query).await;
            let _ = tx
                .send(DiscoveryEvent::SearchFinished {
                    seq,
                    query,
                    outcome,
                })
                .await;
        });
    }

    async fn finish_search(&mut self, seq: u64, query: String, outcome: SearchOutcome) {
        // Recording does not depend on whether the result is still shown.
        if let Some(top) = outcome.trending_candidate(&query) {
            if let Err(e) = self.recorder.record(&query, top) {
                warn!("DiscoveryCore: could not queue trending update: {}", e);
            }
        }

        if !self.sequencer.is_latest(seq) {
            debug!(
                "DiscoveryCore: dropping stale result #{} {:?} (latest #{})",
                seq,
                query,
                self.sequencer.latest()
            );
            return;
        }

        let load = match outcome {
            SearchOutcome::Found(movies) => {
                let _ = self.broadcast_tx.send(BroadcastMessage::Log(format!(
                    "{:?}: {} movies",
                    query,
                    movies.len()
                )));
                LoadState::Ready(movies)
            }
            SearchOutcome::Rejected(msg) => LoadState::Error(msg),
            SearchOutcome::Failed(e) => {
                error!("DiscoveryCore: fetch for {:?} failed: {}", query, e);
                LoadState::Ready(Vec::new())
            }
        };
        self.state_manager.finish_search(load).await;
        let _ = self.broadcast_tx.send(BroadcastMessage::StateUpdated);
    }

    fn load_trending(&self) {
        let store = Arc::clone(&self.store);
        let tx = self.event_tx.clone();
        let limit = self.trending_limit;
        tokio::spawn(async move {
            let result = store.list_top(limit).await;
            let _ = tx.send(DiscoveryEvent::TrendingLoaded(result)).await;
        });
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
