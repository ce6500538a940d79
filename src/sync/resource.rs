//! Generic entity list with TTL caching, optimistic patching and change
//! announcements.
//!
//! Every entity kind implements [`Resource`]; [`ResourceList`] supplies the
//! shared behavior so no call site re-implements cache or notification steps.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use uuid::Uuid;

use crate::api::models::Identified;
use crate::api::{ApiError, CourseApi};
use crate::storage::PersistentCache;
use crate::sync::bus::{Action, NotificationBus, Topic};
use crate::sync::SyncError;

/// One kind of server-owned entity and the endpoints that manage it.
///
/// Operations an entity does not support take [`std::convert::Infallible`]
/// fields, which makes them uncallable.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Item: Identified + Clone + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Filter: Clone + Default + Send + Sync + 'static;
    type Create: Send + 'static;
    type Update: Send + 'static;

    const TOPIC: Topic;
    /// Plural name used in log lines
    const NAME: &'static str;
    /// Whether notifications name something other than the item itself, so
    /// removing an unknown item has to look it up first.
    const ANNOUNCES_OWNER: bool = false;

    /// Persistent cache key for lists built with `filter`, if cached at all.
    fn cache_key(_filter: &Self::Filter) -> Option<String> {
        None
    }

    /// Whether a created or updated item belongs in a list built with `filter`.
    fn belongs(_filter: &Self::Filter, _item: &Self::Item) -> bool {
        true
    }

    /// Entity id put in notifications about `item`.
    fn announced_id(item: &Self::Item) -> String {
        item.id().to_string()
    }

    async fn fetch(api: &dyn CourseApi, filter: &Self::Filter) -> Result<Vec<Self::Item>, ApiError>;
    async fn create(api: &dyn CourseApi, fields: Self::Create) -> Result<Self::Item, ApiError>;
    async fn update(api: &dyn CourseApi, id: &str, fields: Self::Update) -> Result<Self::Item, ApiError>;
    async fn remove(api: &dyn CourseApi, id: &str) -> Result<(), ApiError>;
}

struct ListInner<R: Resource> {
    id: Uuid,
    api: Arc<dyn CourseApi>,
    cache: PersistentCache,
    bus: NotificationBus,
    filter: R::Filter,
    ttl: Duration,
    items: RwLock<Vec<R::Item>>,
    error: RwLock<Option<String>>,
    in_flight: AtomicBool,
    /// Set once `items` mirrors the server, from the cache or a fetch
    loaded: AtomicBool,
}

/// Local view of one entity list. Clones share state.
pub struct ResourceList<R: Resource> {
    inner: Arc<ListInner<R>>,
}

impl<R: Resource> Clone for ResourceList<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Clears the in-flight flag when a mutation ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<R: Resource> ResourceList<R> {
    pub fn new(
        api: Arc<dyn CourseApi>,
        cache: PersistentCache,
        bus: NotificationBus,
        filter: R::Filter,
        ttl: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(ListInner {
                id: Uuid::new_v4(),
                api,
                cache,
                bus,
                filter,
                ttl,
                items: RwLock::new(Vec::new()),
                error: RwLock::new(None),
                in_flight: AtomicBool::new(false),
                loaded: AtomicBool::new(false),
            }),
        }
    }

    /// Identity of this list in notifications it emits.
    pub fn list_id(&self) -> Uuid {
        self.inner.id
    }

    pub fn filter(&self) -> &R::Filter {
        &self.inner.filter
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.inner.bus
    }

    /// Snapshot of the current items.
    pub fn items(&self) -> Vec<R::Item> {
        self.inner.items.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn get(&self, id: &str) -> Option<R::Item> {
        self.inner
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.items.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// User-facing message of the last failed operation, cleared on success.
    pub fn error(&self) -> Option<String> {
        self.inner.error.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether the items came from the cache or the API rather than only from
    /// local mutations.
    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.load(Ordering::SeqCst)
    }

    /// Whether a mutation is running; callers disable their submit control meanwhile.
    pub fn is_submitting(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Items from the cache when still valid, otherwise from the API.
    pub async fn list(&self) -> Result<Vec<R::Item>, SyncError> {
        if let Some(key) = R::cache_key(&self.inner.filter) {
            match self.inner.cache.load_if_valid::<Vec<R::Item>>(&key, self.inner.ttl).await {
                Ok(Some(items)) => {
                    debug!("📦 Serving {} {} from cache '{}'", items.len(), R::NAME, key);
                    self.set_items(items.clone());
                    self.inner.loaded.store(true, Ordering::SeqCst);
                    self.set_error(None);
                    return Ok(items);
                }
                Ok(None) => {}
                Err(e) => warn!("⚠️  Failed to read cache '{key}': {e}"),
            }
        }

        self.refresh().await
    }

    /// Fetch from the API and re-save the cache.
    pub async fn refresh(&self) -> Result<Vec<R::Item>, SyncError> {
        let items = R::fetch(self.inner.api.as_ref(), &self.inner.filter)
            .await
            .map_err(|e| self.fail("fetch", e))?;

        info!("✅ Fetched {} {} from API", items.len(), R::NAME);
        self.set_items(items.clone());
        self.inner.loaded.store(true, Ordering::SeqCst);
        self.persist().await;
        self.set_error(None);
        Ok(items)
    }

    /// Drop the persistent cache entry so the next `list` refetches.
    pub async fn invalidate(&self) {
        if let Some(key) = R::cache_key(&self.inner.filter) {
            if let Err(e) = self.inner.cache.remove(&key).await {
                warn!("⚠️  Failed to invalidate cache '{key}': {e}");
            }
        }
    }

    pub async fn create(&self, fields: R::Create) -> Result<R::Item, SyncError> {
        let _guard = self.begin()?;

        let item = R::create(self.inner.api.as_ref(), fields)
            .await
            .map_err(|e| self.fail("create", e))?;

        if R::belongs(&self.inner.filter, &item) {
            self.patch(|items| upsert(items, item.clone()));
        }
        self.finish(Action::Created, R::announced_id(&item)).await;
        Ok(item)
    }

    pub async fn update(&self, id: &str, fields: R::Update) -> Result<R::Item, SyncError> {
        let _guard = self.begin()?;

        let item = R::update(self.inner.api.as_ref(), id, fields)
            .await
            .map_err(|e| self.fail("update", e))?;

        if R::belongs(&self.inner.filter, &item) {
            self.patch(|items| upsert(items, item.clone()));
        } else {
            self.patch(|items| items.retain(|existing| existing.id() != id));
        }
        self.finish(Action::Updated, R::announced_id(&item)).await;
        Ok(item)
    }

    pub async fn remove(&self, id: &str) -> Result<(), SyncError> {
        let _guard = self.begin()?;

        let announced = self.resolve_announced_id(id).await;

        R::remove(self.inner.api.as_ref(), id)
            .await
            .map_err(|e| self.fail("remove", e))?;

        self.patch(|items| items.retain(|item| item.id() != id));
        self.finish(Action::Removed, announced).await;
        Ok(())
    }

    fn begin(&self) -> Result<InFlightGuard<'_>, SyncError> {
        self.inner
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SyncError::InFlight)?;
        Ok(InFlightGuard(&self.inner.in_flight))
    }

    async fn finish(&self, action: Action, entity_id: String) {
        self.set_error(None);
        if self.is_loaded() {
            self.persist().await;
        } else {
            // A partial list must not stand in for the server's
            self.invalidate().await;
        }
        self.inner
            .bus
            .announce_from(R::TOPIC, &entity_id, action, Some(self.inner.id))
            .await;
    }

    /// Notification id for the item `id` about to be removed.
    async fn resolve_announced_id(&self, id: &str) -> String {
        if let Some(item) = self.get(id) {
            return R::announced_id(&item);
        }
        if !R::ANNOUNCES_OWNER {
            return id.to_string();
        }

        if let Some(key) = R::cache_key(&self.inner.filter) {
            if let Ok(Some(items)) = self.inner.cache.load_if_valid::<Vec<R::Item>>(&key, self.inner.ttl).await {
                if let Some(item) = items.iter().find(|item| item.id() == id) {
                    return R::announced_id(item);
                }
            }
        }

        match R::fetch(self.inner.api.as_ref(), &self.inner.filter).await {
            Ok(items) => match items.iter().find(|item| item.id() == id) {
                Some(item) => R::announced_id(item),
                None => id.to_string(),
            },
            Err(e) => {
                warn!("⚠️  Failed to look up {} '{id}' before removal: {e}", R::NAME);
                id.to_string()
            }
        }
    }

    fn fail(&self, operation: &str, e: ApiError) -> SyncError {
        error!("❌ Failed to {operation} {}: {e}", R::NAME);
        self.set_error(Some(e.user_message()));
        SyncError::Api(e)
    }

    async fn persist(&self) {
        if let Some(key) = R::cache_key(&self.inner.filter) {
            let items = self.items();
            if let Err(e) = self.inner.cache.save(&key, &items).await {
                warn!("⚠️  Failed to write cache '{key}': {e}");
            }
        }
    }

    fn set_items(&self, items: Vec<R::Item>) {
        *self.inner.items.write().unwrap_or_else(PoisonError::into_inner) = items;
    }

    fn patch(&self, apply: impl FnOnce(&mut Vec<R::Item>)) {
        let mut items = self.inner.items.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut items);
    }

    fn set_error(&self, message: Option<String>) {
        *self.inner.error.write().unwrap_or_else(PoisonError::into_inner) = message;
    }
}

/// Replace the item with the same id in place, or append it.
fn upsert<T: Identified>(items: &mut Vec<T>, item: T) {
    match items.iter().position(|existing| existing.id() == item.id()) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}
