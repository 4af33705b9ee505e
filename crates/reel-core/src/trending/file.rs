use std::path::PathBuf;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{TrendingRecord, TrendingStore};
use crate::config::TmdbConfig;
use crate::error::TrendingStoreError;
use crate::movie::Movie;

/// Trending records in a local JSON file, cached in memory after first use
/// and written through on every change.
pub struct FileTrendingStore {
    path: PathBuf,
    tmdb: TmdbConfig,
    records: RwLock<Option<Vec<TrendingRecord>>>,
}

impl FileTrendingStore {
    pub fn new(path: PathBuf, tmdb: TmdbConfig) -> Self {
        Self {
            path,
            tmdb,
            records: RwLock::new(None),
        }
    }

    async fn read_file(&self) -> Result<Vec<TrendingRecord>, TrendingStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, records: &[TrendingRecord]) -> Result<(), TrendingStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

fn make_record_id(term: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut h = DefaultHasher::new();
    term.hash(&mut h);
    let now = Utc::now();
    now.timestamp_nanos_opt().unwrap_or(now.timestamp()).hash(&mut h);
    format!("{:016x}", h.finish())
}

impl TrendingStore for FileTrendingStore {
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<(), TrendingStoreError> {
        let mut guard = self.records.write().await;
        let mut records = match guard.as_ref() {
            Some(cached) => cached.clone(),
            None => self.read_file().await?,
        };

        match records.iter_mut().find(|r| r.search_term == term) {
            Some(rec) => {
                rec.count += 1;
                rec.updated_at = Some(Utc::now());
                debug!("[trending] {:?} count -> {}", term, rec.count);
            }
            None => {
                records.push(TrendingRecord {
                    id: make_record_id(term),
                    search_term: term.to_string(),
                    count: 1,
                    movie_id: movie.id,
                    title: movie.title.clone(),
                    poster_url: movie.poster_url(&self.tmdb).unwrap_or_default(),
                    updated_at: Some(Utc::now()),
                });
                info!("[trending] new term {:?} ({})", term, movie.title);
            }
        }

        // The cache only ever holds what is on disk.
        self.write_file(&records).await?;
        *guard = Some(records);
        Ok(())
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingRecord>, TrendingStoreError> {
        {
            let guard = self.records.read().await;
            if let Some(records) = guard.as_ref() {
                return Ok(top_n(records, limit));
            }
        }
        let mut guard = self.records.write().await;
        if guard.is_none() {
            *guard = Some(self.read_file().await?);
        }
        Ok(guard.as_deref().map(|r| top_n(r, limit)).unwrap_or_default())
    }
}

fn top_n(records: &[TrendingRecord], limit: usize) -> Vec<TrendingRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.search_term.cmp(&b.search_term))
    });
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.into(),
            poster_path: Some(format!("/{}.jpg", id)),
            release_date: None,
            vote_average: None,
            original_language: None,
            overview: None,
        }
    }

    fn store(dir: &tempfile::TempDir) -> FileTrendingStore {
        FileTrendingStore::new(dir.path().join("trending.json"), TmdbConfig::default())
    }

    #[tokio::test]
    async fn test_create_then_increment() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        s.record_search("batman", &movie(268, "Batman")).await.unwrap();
        s.record_search("batman", &movie(999, "Other")).await.unwrap();

        let top = s.list_top(5).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].count, 2);
        // The first credited movie is kept.
        assert_eq!(top[0].movie_id, 268);
        assert_eq!(top[0].poster_url, "https://image.tmdb.org/t/p/w500/268.jpg");
    }

    #[tokio::test]
    async fn test_terms_are_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        s.record_search("Batman", &movie(1, "a")).await.unwrap();
        s.record_search("batman", &movie(1, "a")).await.unwrap();
        assert_eq!(s.list_top(5).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_top_is_capped_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        for (i, term) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
            for _ in 0..=i {
                s.record_search(term, &movie(i as u64, term)).await.unwrap();
            }
        }
        let top = s.list_top(5).await.unwrap();
        assert_eq!(top.len(), 5);
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(top[0].search_term, "g");
    }

    #[tokio::test]
    async fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        store(&dir)
            .record_search("dune", &movie(438631, "Dune"))
            .await
            .unwrap();
        let top = store(&dir).list_top(5).await.unwrap();
        assert_eq!(top[0].search_term, "dune");
        assert_eq!(top[0].title, "Dune");
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_and_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir).list_top(5).await.unwrap().is_empty());

        std::fs::write(dir.path().join("trending.json"), "{not json").unwrap();
        let err = store(&dir).list_top(5).await.unwrap_err();
        assert!(matches!(err, TrendingStoreError::Json(_)));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_counts_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trending.json");
        let s = FileTrendingStore::new(path.clone(), TmdbConfig::default());
        s.record_search("alien", &movie(348, "Alien")).await.unwrap();

        // Replace the file with a directory so the next write fails.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(s.record_search("alien", &movie(348, "Alien")).await.is_err());
        assert!(s.record_search("dune", &movie(438631, "Dune")).await.is_err());

        let top = s.list_top(5).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].search_term, "alien");
        assert_eq!(top[0].count, 1);
    }
}
