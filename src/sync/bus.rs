//! Typed invalidation bus.
//!
//! A [`SignalHub`] is shared by every context (think: browser tab) that uses
//! the same [`LocalStorage`]. Each context gets its own [`NotificationBus`].
//! Announcing a change:
//! 1. delivers it to subscribers of the announcing context,
//! 2. records it under the topic's sentinel key in storage,
//! 3. delivers it to subscribers of every *other* context.

use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use uuid::Uuid;

use crate::constants::{
    NOTIFICATION_CHANNEL_CAPACITY, SENTINEL_CONTACT_REQUEST_CHANGED, SENTINEL_COURSE_CHANGED,
    SENTINEL_DEPARTMENT_CHANGED, SENTINEL_LECTURER_CHANGED, SENTINEL_LECTURER_REVIEW_CHANGED,
    SENTINEL_REVIEW_CHANGED, SENTINEL_TRACKED_COURSE_CHANGED, SENTINEL_TRACKED_LECTURER_CHANGED,
};
use crate::storage::LocalStorage;

/// Kind of entity a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    Courses,
    Lecturers,
    Departments,
    CourseReviews,
    LecturerReviews,
    TrackedCourses,
    TrackedLecturers,
    ContactRequests,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Courses,
        Topic::Lecturers,
        Topic::Departments,
        Topic::CourseReviews,
        Topic::LecturerReviews,
        Topic::TrackedCourses,
        Topic::TrackedLecturers,
        Topic::ContactRequests,
    ];

    /// Storage key holding the latest notification of this topic.
    pub fn sentinel_key(&self) -> &'static str {
        match self {
            Topic::Courses => SENTINEL_COURSE_CHANGED,
            Topic::Lecturers => SENTINEL_LECTURER_CHANGED,
            Topic::Departments => SENTINEL_DEPARTMENT_CHANGED,
            Topic::CourseReviews => SENTINEL_REVIEW_CHANGED,
            Topic::LecturerReviews => SENTINEL_LECTURER_REVIEW_CHANGED,
            Topic::TrackedCourses => SENTINEL_TRACKED_COURSE_CHANGED,
            Topic::TrackedLecturers => SENTINEL_TRACKED_LECTURER_CHANGED,
            Topic::ContactRequests => SENTINEL_CONTACT_REQUEST_CHANGED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Created,
    Updated,
    Removed,
}

/// A change announced on the bus; also the sentinel record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub topic: Topic,
    pub entity_id: String,
    pub action: Action,
    pub timestamp: i64,
    /// Context that announced the change
    pub origin: Uuid,
    /// List that announced the change, if any
    #[serde(default)]
    pub emitter: Option<Uuid>,
}

/// Cross-context channel over one storage.
#[derive(Clone)]
pub struct SignalHub {
    storage: Arc<LocalStorage>,
    sender: broadcast::Sender<Notification>,
}

impl SignalHub {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        let (sender, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self { storage, sender }
    }

    pub fn storage(&self) -> Arc<LocalStorage> {
        Arc::clone(&self.storage)
    }

    /// Open a new context on this hub.
    pub fn context(&self) -> NotificationBus {
        let (local, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        NotificationBus {
            origin: Uuid::new_v4(),
            local,
            hub: self.clone(),
        }
    }
}

/// Per-context side of the bus.
#[derive(Clone)]
pub struct NotificationBus {
    origin: Uuid,
    local: broadcast::Sender<Notification>,
    hub: SignalHub,
}

impl NotificationBus {
    pub fn origin(&self) -> Uuid {
        self.origin
    }

    pub fn hub(&self) -> &SignalHub {
        &self.hub
    }

    /// Announce a change that did not come from a particular list.
    pub async fn announce(&self, topic: Topic, entity_id: &str, action: Action) -> Notification {
        self.announce_from(topic, entity_id, action, None).await
    }

    /// Announce a change on behalf of `emitter`.
    ///
    /// A failed sentinel write is logged; in-process delivery still happens.
    pub async fn announce_from(
        &self,
        topic: Topic,
        entity_id: &str,
        action: Action,
        emitter: Option<Uuid>,
    ) -> Notification {
        let notification = Notification {
            topic,
            entity_id: entity_id.to_string(),
            action,
            timestamp: self.hub.storage.clock().now_millis(),
            origin: self.origin,
            emitter,
        };

        // No receivers is fine
        let _ = self.local.send(notification.clone());

        match serde_json::to_string(&notification) {
            Ok(record) => {
                if let Err(e) = self.hub.storage.set_item(topic.sentinel_key(), &record).await {
                    warn!("⚠️  Failed to write sentinel {}: {e}", topic.sentinel_key());
                }
            }
            Err(e) => warn!("⚠️  Failed to serialize notification: {e}"),
        }

        let _ = self.hub.sender.send(notification.clone());
        debug!("📣 {:?} {:?} {}", topic, action, entity_id);
        notification
    }

    /// Most recent notification recorded for `topic` by any context.
    pub async fn last_signal(&self, topic: Topic) -> Result<Option<Notification>> {
        let raw = self.hub.storage.get_item(topic.sentinel_key()).await?;
        Ok(raw.and_then(|raw| serde_json::from_str(&raw).ok()))
    }

    /// Receive notifications for `topics` from this and other contexts.
    pub fn subscribe(&self, topics: &[Topic]) -> Subscription {
        Subscription {
            origin: self.origin,
            topics: topics.to_vec(),
            local: self.local.subscribe(),
            remote: self.hub.sender.subscribe(),
        }
    }
}

/// Stream of notifications for a set of topics.
pub struct Subscription {
    origin: Uuid,
    topics: Vec<Topic>,
    local: broadcast::Receiver<Notification>,
    remote: broadcast::Receiver<Notification>,
}

impl Subscription {
    fn accepts(&self, notification: &Notification, from_remote: bool) -> bool {
        // The hub echoes our own announcements; those already arrived locally
        if from_remote && notification.origin == self.origin {
            return false;
        }
        self.topics.contains(&notification.topic)
    }

    /// Wait for the next matching notification. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<Notification> {
        loop {
            let (result, from_remote) = tokio::select! {
                result = self.local.recv() => (result, false),
                result = self.remote.recv() => (result, true),
            };

            match result {
                Ok(notification) => {
                    if self.accepts(&notification, from_remote) {
                        return Some(notification);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("⚠️  Subscription lagged, {skipped} notification(s) skipped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching notification that is already queued, if any.
    pub fn try_recv(&mut self) -> Option<Notification> {
        loop {
            let (result, from_remote) = match self.local.try_recv() {
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => (self.remote.try_recv(), true),
                other => (other, false),
            };

            match result {
                Ok(notification) => {
                    if self.accepts(&notification, from_remote) {
                        return Some(notification);
                    }
                }
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
