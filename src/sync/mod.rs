//! Synchronization service module for the Course4Me client.
//!
//! This module provides the [`SyncService`] struct, the data layer between
//! the REST API and everything that displays or mutates courses, lecturers,
//! reviews, followed items and contact requests.
//!
//! The service offers:
//! - Entity lists that serve a TTL cache, patch themselves after writes and
//!   announce every change ([`ResourceList`])
//! - A typed invalidation bus that reaches this context and every other
//!   context sharing the same storage ([`NotificationBus`])
//! - A shared in-memory store for per-course page data ([`SharedStore`])
//! - Listeners that refetch on foreign changes and stop when dropped
//!   ([`RefreshListener`])

pub mod bus;
pub mod catalog;
pub mod contact_requests;
pub mod course_data;
pub mod dashboard;
pub mod listener;
pub mod resource;
pub mod reviews;
pub mod store;
pub mod tracking;

use anyhow::Result;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::api::models::{ContactRequestFilter, CourseReview, CourseReviewFields, ListFilter};
use crate::api::{ApiError, CourseApi};
use crate::config::Config;
use crate::constants::{
    CACHE_KEY_CONTACT_REQUESTS, CACHE_KEY_DASHBOARD, CACHE_KEY_TRACKED_COURSES, CACHE_KEY_TRACKED_LECTURERS,
    DEFAULT_FRESH_WRITE_WINDOW_MS, DEFAULT_LIST_TTL_SECONDS, ERROR_IN_FLIGHT,
};
use crate::storage::{LocalStorage, PersistentCache, Session};

pub use bus::{Action, Notification, NotificationBus, SignalHub, Subscription, Topic};
pub use catalog::{Courses, Departments, Lecturers};
pub use contact_requests::{AdminContactRequests, MyContactRequests};
pub use course_data::{CourseData, CourseDataLoader};
pub use dashboard::{DashboardSummary, TrackedCourseCard};
pub use listener::RefreshListener;
pub use resource::{Resource, ResourceList};
pub use reviews::{CourseReviews, LecturerReviews};
pub use store::{SharedStore, StoreChange, StoreEntry};
pub use tracking::{TrackedCourses, TrackedLecturers};

/// Errors surfaced by list operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A mutation is already running on this list.
    #[error("Another request is already in flight")]
    InFlight,
}

impl SyncError {
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Api(e) => e.user_message(),
            SyncError::InFlight => ERROR_IN_FLIGHT.to_string(),
        }
    }
}

/// Represents the current status of a synchronization operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    /// A sync operation is already in progress
    InProgress,
    /// The sync completed successfully
    Success,
    /// The sync failed with an error
    Error {
        /// Human-readable error message describing what went wrong
        message: String,
    },
}

/// Cache windows used by a [`SyncService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub list_ttl: Duration,
    pub fresh_write_window: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            list_ttl: Duration::from_secs(DEFAULT_LIST_TTL_SECONDS),
            fresh_write_window: Duration::from_millis(DEFAULT_FRESH_WRITE_WINDOW_MS),
        }
    }
}

impl From<&Config> for SyncOptions {
    fn from(config: &Config) -> Self {
        Self {
            list_ttl: config.list_ttl(),
            fresh_write_window: config.fresh_write_window(),
        }
    }
}

/// Data layer of one client context.
///
/// Several services may share a [`SignalHub`] (and therefore one storage);
/// each is then a separate context, and changes announced in one reach the
/// listeners of the others.
///
/// # Example
/// ```rust,no_run
/// use course4me::api::http::HttpApi;
/// use course4me::storage::LocalStorage;
/// use course4me::sync::{SignalHub, SyncOptions, SyncService};
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let storage = Arc::new(LocalStorage::in_memory().await?);
/// let hub = SignalHub::new(storage);
/// let api = Arc::new(HttpApi::new("http://localhost:5000", Some("token".to_string()))?);
/// let service = SyncService::new(api, &hub, SyncOptions::default());
///
/// let tracked = service.tracked_courses();
/// tracked.list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SyncService {
    api: Arc<dyn CourseApi>,
    storage: Arc<LocalStorage>,
    cache: PersistentCache,
    bus: NotificationBus,
    store: SharedStore,
    options: SyncOptions,
    sync_in_progress: Arc<Mutex<bool>>,
}

impl SyncService {
    /// Open a new context on `hub`.
    pub fn new(api: Arc<dyn CourseApi>, hub: &SignalHub, options: SyncOptions) -> Self {
        let storage = hub.storage();
        let store = SharedStore::new(storage.clock());
        Self {
            api,
            cache: PersistentCache::new(Arc::clone(&storage)),
            storage,
            bus: hub.context(),
            store,
            options,
            sync_in_progress: Arc::new(Mutex::new(false)),
        }
    }

    pub fn api(&self) -> Arc<dyn CourseApi> {
        Arc::clone(&self.api)
    }

    pub fn storage(&self) -> Arc<LocalStorage> {
        Arc::clone(&self.storage)
    }

    pub fn cache(&self) -> &PersistentCache {
        &self.cache
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn list_ttl(&self) -> Duration {
        self.options.list_ttl
    }

    fn list<R: Resource>(&self, filter: R::Filter) -> ResourceList<R> {
        ResourceList::new(
            Arc::clone(&self.api),
            self.cache.clone(),
            self.bus.clone(),
            filter,
            self.options.list_ttl,
        )
    }

    pub fn courses(&self, filter: ListFilter) -> ResourceList<Courses> {
        self.list(filter)
    }

    pub fn lecturers(&self, filter: ListFilter) -> ResourceList<Lecturers> {
        self.list(filter)
    }

    pub fn departments(&self) -> ResourceList<Departments> {
        self.list(())
    }

    pub fn course_reviews(&self, course_id: &str) -> ResourceList<CourseReviews> {
        self.list(course_id.to_string())
    }

    pub fn lecturer_reviews(&self, lecturer_id: &str) -> ResourceList<LecturerReviews> {
        self.list(lecturer_id.to_string())
    }

    pub fn tracked_courses(&self) -> ResourceList<TrackedCourses> {
        self.list(())
    }

    pub fn tracked_lecturers(&self) -> ResourceList<TrackedLecturers> {
        self.list(())
    }

    pub fn my_contact_requests(&self) -> ResourceList<MyContactRequests> {
        self.list(())
    }

    pub fn admin_contact_requests(&self, filter: ContactRequestFilter) -> ResourceList<AdminContactRequests> {
        self.list(filter)
    }

    pub fn course_data(&self) -> CourseDataLoader {
        CourseDataLoader::new(
            Arc::clone(&self.api),
            self.store.clone(),
            self.storage.clock(),
            self.options.fresh_write_window,
        )
    }

    /// Submit a review through `reviews` and fold it into the course page data.
    pub async fn submit_course_review(
        &self,
        reviews: &ResourceList<CourseReviews>,
        fields: CourseReviewFields,
    ) -> Result<CourseReview, SyncError> {
        let review = reviews.create(fields).await?;
        if self.course_data().record_review(&review).is_none() {
            self.store.trigger_refresh(&review.course.id);
        }
        Ok(review)
    }

    /// The stored session, if any.
    pub async fn session(&self) -> Result<Session> {
        Session::load(&self.storage).await
    }

    /// Forget the session and every cache that belongs to the signed-in user.
    pub async fn sign_out(&self) -> Result<()> {
        Session::clear(&self.storage).await?;
        for key in [
            CACHE_KEY_TRACKED_COURSES,
            CACHE_KEY_TRACKED_LECTURERS,
            CACHE_KEY_CONTACT_REQUESTS,
            CACHE_KEY_DASHBOARD,
        ] {
            self.cache.remove(key).await?;
        }
        info!("👋 Signed out");
        Ok(())
    }

    /// Ask the server to send a password reset link to `email`.
    pub async fn request_password_reset(&self, email: &str) -> Result<String, SyncError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::Validation("יש להזין כתובת אימייל תקינה".to_string()).into());
        }
        Ok(self.api.request_password_reset(email).await?)
    }

    /// Checks if a synchronization operation is currently in progress.
    pub async fn is_syncing(&self) -> bool {
        *self.sync_in_progress.lock().await
    }

    /// Refresh the catalog and, when signed in, the followed lists.
    ///
    /// Only one sync runs at a time; a concurrent call returns
    /// [`SyncStatus::InProgress`] immediately.
    pub async fn sync(&self) -> Result<SyncStatus> {
        {
            let mut sync_guard = self.sync_in_progress.lock().await;
            if *sync_guard {
                return Ok(SyncStatus::InProgress);
            }
            *sync_guard = true;
        }

        let result = self.perform_sync().await;

        {
            let mut sync_guard = self.sync_in_progress.lock().await;
            *sync_guard = false;
        }

        result
    }

    async fn perform_sync(&self) -> Result<SyncStatus> {
        info!("🔄 Starting sync process...");

        let catalog = async {
            self.courses(ListFilter::default()).refresh().await?;
            self.lecturers(ListFilter::default()).refresh().await?;
            self.departments().refresh().await?;
            Ok::<(), SyncError>(())
        };
        if let Err(e) = catalog.await {
            error!("❌ Failed to sync catalog: {e}");
            return Ok(SyncStatus::Error {
                message: e.user_message(),
            });
        }

        let followed = async {
            self.tracked_courses().refresh().await?;
            self.tracked_lecturers().refresh().await?;
            Ok::<(), SyncError>(())
        };
        match followed.await {
            Ok(()) => {}
            Err(SyncError::Api(ApiError::Unauthorized)) => {
                info!("⚠️  Not signed in, skipping followed courses and lecturers");
            }
            Err(e) => {
                error!("❌ Failed to sync followed items: {e}");
                return Ok(SyncStatus::Error {
                    message: e.user_message(),
                });
            }
        }

        info!("✅ Sync finished");
        Ok(SyncStatus::Success)
    }
}
