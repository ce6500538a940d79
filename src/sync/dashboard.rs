//! Home screen summary built from the followed lists, cached like any list.

use anyhow::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::api::models::{Course, TrackedCourse};
use crate::constants::CACHE_KEY_DASHBOARD;
use crate::stats::{course_stats, CourseStats};
use crate::sync::bus::Topic;
use crate::sync::listener::RefreshListener;
use crate::sync::SyncService;

/// A followed course with its review averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedCourseCard {
    pub tracked_id: String,
    pub course: Course,
    pub review_count: usize,
    pub stats: Option<CourseStats>,
}

/// Summary shown on the signed-in user's home screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub tracked_courses: Vec<TrackedCourseCard>,
    pub tracked_lecturer_count: usize,
    pub open_contact_requests: usize,
    pub generated_at: i64,
}

impl SyncService {
    /// Dashboard summary, from cache while valid.
    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        match self
            .cache()
            .load_if_valid::<DashboardSummary>(CACHE_KEY_DASHBOARD, self.list_ttl())
            .await
        {
            Ok(Some(summary)) => return Ok(summary),
            Ok(None) => {}
            Err(e) => warn!("⚠️  Failed to read dashboard cache: {e}"),
        }

        let summary = self.build_dashboard().await?;
        if let Err(e) = self.cache().save(CACHE_KEY_DASHBOARD, &summary).await {
            warn!("⚠️  Failed to cache dashboard: {e}");
        }
        Ok(summary)
    }

    async fn build_dashboard(&self) -> Result<DashboardSummary> {
        let tracked_courses = self.tracked_courses().list().await?;
        let tracked_lecturers = self.tracked_lecturers().list().await?;
        let contact_requests = self.my_contact_requests();
        contact_requests.list().await?;

        let mut cards = Vec::with_capacity(tracked_courses.len());
        for tracked in tracked_courses {
            cards.push(self.course_card(tracked).await?);
        }

        info!("✅ Built dashboard with {} tracked course(s)", cards.len());
        Ok(DashboardSummary {
            tracked_courses: cards,
            tracked_lecturer_count: tracked_lecturers.len(),
            open_contact_requests: contact_requests.open_count(),
            generated_at: self.storage().clock().now_millis(),
        })
    }

    async fn course_card(&self, tracked: TrackedCourse) -> Result<TrackedCourseCard> {
        let reviews = self.api().fetch_course_reviews(&tracked.course.id).await?;
        Ok(TrackedCourseCard {
            tracked_id: tracked.id,
            review_count: reviews.len(),
            stats: course_stats(&reviews),
            course: tracked.course,
        })
    }

    /// Drop the cached dashboard whenever followed courses, followed lecturers,
    /// reviews or contact requests change in any context.
    pub fn watch_dashboard(&self) -> RefreshListener {
        let cache = self.cache().clone();
        RefreshListener::spawn_with(
            self.bus(),
            &[
                Topic::TrackedCourses,
                Topic::TrackedLecturers,
                Topic::CourseReviews,
                Topic::ContactRequests,
            ],
            move |_| {
                let cache = cache.clone();
                async move {
                    if let Err(e) = cache.remove(CACHE_KEY_DASHBOARD).await {
                        warn!("⚠️  Failed to drop dashboard cache: {e}");
                    }
                    true
                }
            },
        )
    }
}
