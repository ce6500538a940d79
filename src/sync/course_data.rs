//! Per-course page data backed by the shared store.
//!
//! A course page needs the course, its reviews and their averages. The
//! loader keeps the last result in the [`SharedStore`]; an entry written
//! within the fresh-write window is served without another round trip, which
//! covers the read that immediately follows a review submission.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::api::models::{Course, CourseReview, Identified};
use crate::api::CourseApi;
use crate::stats::{course_stats, CourseStats};
use crate::sync::store::SharedStore;
use crate::sync::SyncError;
use crate::utils::clock::SharedClock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseData {
    pub course: Course,
    pub reviews: Vec<CourseReview>,
    pub stats: Option<CourseStats>,
}

impl CourseData {
    pub fn new(course: Course, reviews: Vec<CourseReview>) -> Self {
        let stats = course_stats(&reviews);
        Self { course, reviews, stats }
    }
}

#[derive(Clone)]
pub struct CourseDataLoader {
    api: Arc<dyn CourseApi>,
    store: SharedStore,
    clock: SharedClock,
    fresh_window: Duration,
}

impl CourseDataLoader {
    pub fn new(api: Arc<dyn CourseApi>, store: SharedStore, clock: SharedClock, fresh_window: Duration) -> Self {
        Self {
            api,
            store,
            clock,
            fresh_window,
        }
    }

    /// Stored data if written within the fresh window, otherwise fetched.
    pub async fn load(&self, course_id: &str) -> Result<CourseData, SyncError> {
        if let Some(data) = self.fresh(course_id) {
            debug!("📦 Serving course {course_id} from shared store");
            return Ok(data);
        }
        self.fetch(course_id).await
    }

    /// Fetch course and reviews together and store the result.
    pub async fn fetch(&self, course_id: &str) -> Result<CourseData, SyncError> {
        let (course, reviews) = tokio::try_join!(
            self.api.fetch_course(course_id),
            self.api.fetch_course_reviews(course_id)
        )?;

        let data = CourseData::new(course, reviews);
        self.store_data(course_id, &data);
        Ok(data)
    }

    /// Merge a just-written review into the stored entry and bump its generation.
    pub fn record_review(&self, review: &CourseReview) -> Option<i64> {
        let course_id = review.course.id.as_str();
        let mut data = self.stored(course_id)?;

        match data.reviews.iter().position(|existing| existing.id() == review.id()) {
            Some(index) => data.reviews[index] = review.clone(),
            None => data.reviews.insert(0, review.clone()),
        }
        data.stats = course_stats(&data.reviews);

        self.store_data(course_id, &data);
        Some(self.store.trigger_refresh(course_id))
    }

    /// Drop a removed review from the stored entry and bump its generation.
    pub fn forget_review(&self, course_id: &str, review_id: &str) -> Option<i64> {
        let mut data = self.stored(course_id)?;
        data.reviews.retain(|review| review.id() != review_id);
        data.stats = course_stats(&data.reviews);

        self.store_data(course_id, &data);
        Some(self.store.trigger_refresh(course_id))
    }

    /// Signal that the course changed elsewhere.
    pub fn mark_changed(&self, course_id: &str) -> i64 {
        self.store.trigger_refresh(course_id)
    }

    fn fresh(&self, course_id: &str) -> Option<CourseData> {
        let entry = self.store.get(course_id)?;
        let age = self.clock.now_millis() - entry.last_updated;
        let window = i64::try_from(self.fresh_window.as_millis()).unwrap_or(i64::MAX);
        if age >= window {
            return None;
        }
        serde_json::from_value(Value::Object(entry.data)).ok()
    }

    fn stored(&self, course_id: &str) -> Option<CourseData> {
        let entry = self.store.get(course_id)?;
        serde_json::from_value(Value::Object(entry.data)).ok()
    }

    fn store_data(&self, course_id: &str, data: &CourseData) {
        match serde_json::to_value(data) {
            Ok(Value::Object(map)) => {
                self.store.update(course_id, map);
            }
            Ok(_) => {}
            Err(e) => warn!("⚠️  Failed to store course {course_id}: {e}"),
        }
    }
}
