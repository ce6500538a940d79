//! Background reaction to bus notifications.
//!
//! A [`RefreshListener`] owns a spawned task that runs a handler for each
//! matching notification. Dropping the listener aborts the task, including any
//! request it has in flight, so nothing touches a list after its owner is gone.

use log::{debug, warn};
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::sync::bus::{Notification, NotificationBus, Topic};
use crate::sync::resource::{Resource, ResourceList};

pub struct RefreshListener {
    task: JoinHandle<()>,
    handled: watch::Receiver<u64>,
}

impl RefreshListener {
    /// Run `handler` for every notification on `topics`.
    pub fn spawn_with<F, Fut>(bus: &NotificationBus, topics: &[Topic], handler: F) -> Self
    where
        F: Fn(Notification) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        // Subscribe before spawning so nothing announced after this call is missed
        let mut subscription = bus.subscribe(topics);
        let (counter, handled) = watch::channel(0u64);

        let task = tokio::spawn(async move {
            while let Some(notification) = subscription.recv().await {
                if handler(notification).await {
                    counter.send_modify(|count| *count += 1);
                }
            }
        });

        Self { task, handled }
    }

    /// Keep `list` in sync with changes announced by anyone but itself:
    /// invalidate its cache and refetch once per notification.
    pub fn spawn<R: Resource>(list: ResourceList<R>) -> Self {
        let bus = list.bus().clone();
        Self::spawn_with(&bus, &[R::TOPIC], move |notification| {
            let list = list.clone();
            async move {
                if notification.emitter == Some(list.list_id()) {
                    return false;
                }
                debug!(
                    "🔄 Refreshing {} after {:?} of {}",
                    R::NAME,
                    notification.action,
                    notification.entity_id
                );
                list.invalidate().await;
                if let Err(e) = list.refresh().await {
                    warn!("⚠️  Refresh of {} failed: {e}", R::NAME);
                }
                true
            }
        })
    }

    /// Number of notifications handled so far.
    pub fn handled_count(&self) -> u64 {
        *self.handled.borrow()
    }

    /// Wait until at least `count` notifications were handled.
    pub async fn wait_for(&mut self, count: u64) -> bool {
        self.handled.wait_for(|handled| *handled >= count).await.is_ok()
    }
}

impl Drop for RefreshListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}
