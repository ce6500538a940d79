//! TTL-checked persistent cache.
//!
//! Entries are stored as `{"payload": ..., "timestamp": <ms>}` and are only
//! returned while `now - timestamp < ttl`. Expired or unreadable entries are
//! removed and reported as absent, so callers always fall back to a fetch.

use anyhow::{Context, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::storage::LocalStorage;

#[derive(Serialize)]
struct CacheRecordRef<'a, T> {
    payload: &'a T,
    timestamp: i64,
}

#[derive(Deserialize)]
struct CacheRecord<T> {
    payload: T,
    timestamp: i64,
}

/// Cache of serialized payloads keyed by name.
#[derive(Clone)]
pub struct PersistentCache {
    storage: Arc<LocalStorage>,
}

impl PersistentCache {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }

    /// Write `payload` stamped with the current time.
    pub async fn save<T: Serialize>(&self, key: &str, payload: &T) -> Result<()> {
        let record = CacheRecordRef {
            payload,
            timestamp: self.storage.clock().now_millis(),
        };
        let json = serde_json::to_string(&record).with_context(|| format!("Failed to serialize cache entry {key}"))?;
        self.storage.set_item(key, &json).await
    }

    /// Read `key` if it was written less than `ttl` ago.
    pub async fn load_if_valid<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Result<Option<T>> {
        let Some(raw) = self.storage.get_item(key).await? else {
            return Ok(None);
        };

        let record: CacheRecord<T> = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!("⚠️  Dropping unreadable cache entry '{key}': {e}");
                self.storage.remove_item(key).await?;
                return Ok(None);
            }
        };

        let age = self.storage.clock().now_millis() - record.timestamp;
        if age < ttl_millis(ttl) {
            Ok(Some(record.payload))
        } else {
            self.storage.remove_item(key).await?;
            Ok(None)
        }
    }

    /// Time at which `key` was last written, whether or not it is still valid.
    pub async fn written_at(&self, key: &str) -> Result<Option<i64>> {
        let Some(raw) = self.storage.get_item(key).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str::<CacheRecord<serde_json::Value>>(&raw)
            .ok()
            .map(|record| record.timestamp))
    }

    /// Drop an entry. Returns whether it existed.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        self.storage.remove_item(key).await
    }
}

fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}
