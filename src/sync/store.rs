//! Process-wide keyed store of last-known entity data.
//!
//! Entries are JSON objects merged shallowly on update. Each entry carries a
//! refresh generation that only ever increases, so consumers can compare the
//! generation they rendered with the current one.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

use crate::constants::NOTIFICATION_CHANNEL_CAPACITY;
use crate::utils::clock::SharedClock;

#[derive(Debug, Clone, PartialEq)]
pub struct StoreEntry {
    pub data: Map<String, Value>,
    /// When `data` was last written, in ms
    pub last_updated: i64,
    /// Refresh generation, 0 until the first trigger
    pub generation: i64,
}

/// Emitted when an entry's generation changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub id: String,
    pub generation: i64,
}

#[derive(Clone)]
pub struct SharedStore {
    entries: Arc<RwLock<HashMap<String, StoreEntry>>>,
    clock: SharedClock,
    changes: broadcast::Sender<StoreChange>,
}

impl SharedStore {
    pub fn new(clock: SharedClock) -> Self {
        let (changes, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
            changes,
        }
    }

    pub fn get(&self, id: &str) -> Option<StoreEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Shallow-merge `partial` into the entry for `id`, creating it if needed.
    pub fn update(&self, id: &str, partial: Map<String, Value>) -> StoreEntry {
        let now = self.clock.now_millis();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(id.to_string()).or_insert_with(|| StoreEntry {
            data: Map::new(),
            last_updated: now,
            generation: 0,
        });
        entry.data.extend(partial);
        entry.last_updated = now;
        entry.clone()
    }

    /// Stamp a new generation for `id` and notify subscribers.
    pub fn trigger_refresh(&self, id: &str) -> i64 {
        let now = self.clock.now_millis();
        let generation = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            let entry = entries.entry(id.to_string()).or_insert_with(|| StoreEntry {
                data: Map::new(),
                last_updated: now,
                generation: 0,
            });
            entry.generation = now.max(entry.generation + 1);
            entry.generation
        };

        let _ = self.changes.send(StoreChange {
            id: id.to_string(),
            generation,
        });
        generation
    }

    pub fn generation(&self, id: &str) -> Option<i64> {
        self.get(id).map(|entry| entry.generation)
    }

    pub fn remove(&self, id: &str) -> Option<StoreEntry> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}
