//! File-backed report cache with expiry.
//!
//! Each entry is one JSON file named after a hash of its key and wrapped in
//! an envelope recording when it was written. Reads treat expired or
//! unreadable entries as absent, and writes never fail the caller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

/// Prefix shared by every cache file. [`ReportCache::clear`] only touches
/// files carrying it.
pub const CACHE_PREFIX: &str = "buyphase_";

/// Default time an entry stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
    timestamp: DateTime<Utc>,
}

/// Expiring key/value store on disk.
#[derive(Debug, Clone)]
pub struct ReportCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ReportCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fresh value for `key`, if any. Expired entries are deleted.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for_key(key);
        let contents = fs::read_to_string(&path).await.ok()?;

        let envelope: Envelope<T> = match serde_json::from_str(&contents) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!("Ignoring unreadable cache entry {}: {}", key, e);
                return None;
            }
        };

        if self.is_expired(envelope.timestamp, Utc::now()) {
            debug!("Cache expired for {}", key);
            if let Err(e) = fs::remove_file(&path).await {
                debug!("Failed to remove expired entry {}: {}", path.display(), e);
            }
            return None;
        }

        debug!("Cache hit for {}", key);
        Some(envelope.data)
    }

    /// Store `value` under `key`. Failures are logged and swallowed.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.write(key, value, Utc::now()).await {
            warn!("Failed to cache {}: {}", key, e);
        }
    }

    /// Remove every prefixed entry. Returns how many were removed.
    pub async fn clear(&self) -> Result<usize, CacheError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(CACHE_PREFIX) {
                fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn write<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        timestamp: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).await?;
        let envelope = Envelope {
            data: value,
            timestamp,
        };
        let json = serde_json::to_string(&envelope)?;
        fs::write(self.path_for_key(key), json).await?;
        Ok(())
    }

    fn is_expired(&self, written: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(written);
        age.num_milliseconds() > self.ttl.as_millis() as i64
    }

    fn path_for_key(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.json", CACHE_PREFIX, Self::key_hash(key)))
    }

    /// Hash a key to a short file-safe string.
    fn key_hash(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        team: String,
        games: u32,
    }

    fn payload() -> Payload {
        Payload {
            team: "79".to_string(),
            games: 4,
        }
    }

    #[test]
    fn test_key_hash() {
        let a = ReportCache::key_hash("report_79");
        let b = ReportCache::key_hash("report_80");

        assert_ne!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let cache = ReportCache::new(dir.path(), DEFAULT_TTL);

        cache.set("report_79", &payload()).await;
        let cached: Option<Payload> = cache.get("report_79").await;

        assert_eq!(cached, Some(payload()));
        assert!(cache.get::<Payload>("report_80").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_removed() {
        let dir = TempDir::new().unwrap();
        let cache = ReportCache::new(dir.path(), DEFAULT_TTL);
        let stale = Utc::now() - chrono::Duration::hours(2);

        cache.write("report_79", &payload(), stale).await.unwrap();

        assert!(cache.get::<Payload>("report_79").await.is_none());
        assert!(!cache.path_for_key("report_79").exists());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_absent() {
        let dir = TempDir::new().unwrap();
        let cache = ReportCache::new(dir.path(), DEFAULT_TTL);
        std::fs::write(cache.path_for_key("report_79"), "{not json").unwrap();

        assert!(cache.get::<Payload>("report_79").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_only_prefixed() {
        let dir = TempDir::new().unwrap();
        let cache = ReportCache::new(dir.path(), DEFAULT_TTL);
        cache.set("a", &payload()).await;
        cache.set("b", &payload()).await;
        std::fs::write(dir.path().join("keep.json"), "{}").unwrap();

        assert_eq!(cache.clear().await.unwrap(), 2);
        assert!(dir.path().join("keep.json").exists());
        assert!(cache.get::<Payload>("a").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_missing_dir() {
        let dir = TempDir::new().unwrap();
        let cache = ReportCache::new(dir.path().join("never-created"), DEFAULT_TTL);

        assert_eq!(cache.clear().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_into_unwritable_dir_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();
        let cache = ReportCache::new(file.join("nested"), DEFAULT_TTL);

        cache.set("a", &payload()).await;
        assert!(cache.get::<Payload>("a").await.is_none());
    }
}
