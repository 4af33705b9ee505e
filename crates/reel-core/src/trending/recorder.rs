use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::TrendingStore;
use crate::error::TrendingStoreError;
use crate::movie::Movie;

#[derive(Debug)]
struct RecordJob {
    term: String,
    movie: Movie,
}

/// Worker applying `record_search` calls one at a time, in the order they
/// were queued. Callers never wait on the store; failures are logged and
/// dropped. The worker exits once every sender is gone and the queue is empty.
#[derive(Clone)]
pub struct TrendingRecorder {
    tx: mpsc::UnboundedSender<RecordJob>,
}

impl TrendingRecorder {
    pub fn spawn<S: TrendingStore>(store: Arc<S>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<RecordJob>();
        let handle = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                if let Err(e) = store.record_search(&job.term, &job.movie).await {
                    warn!("[trending] failed to record {:?}: {}", job.term, e);
                }
            }
            info!("[trending] recorder stopped");
        });
        (Self { tx }, handle)
    }

    /// Queue `term` crediting `movie`. Only fails once the worker is gone.
    pub fn record(&self, term: &str, movie: &Movie) -> Result<(), TrendingStoreError> {
        self.tx
            .send(RecordJob {
                term: term.to_string(),
                movie: movie.clone(),
            })
            .map_err(|_| TrendingStoreError::Closed)
    }
}
