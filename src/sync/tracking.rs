//! Followed courses and lecturers.

use async_trait::async_trait;
use std::convert::Infallible;

use crate::api::models::{TrackedCourse, TrackedLecturer};
use crate::api::{ApiError, CourseApi};
use crate::constants::{CACHE_KEY_TRACKED_COURSES, CACHE_KEY_TRACKED_LECTURERS};
use crate::sync::bus::Topic;
use crate::sync::resource::{Resource, ResourceList};

/// Courses the signed-in user follows. Creating takes a course id.
pub struct TrackedCourses;

#[async_trait]
impl Resource for TrackedCourses {
    type Item = TrackedCourse;
    type Filter = ();
    type Create = String;
    type Update = Infallible;

    const TOPIC: Topic = Topic::TrackedCourses;
    const NAME: &'static str = "tracked courses";
    const ANNOUNCES_OWNER: bool = true;

    fn cache_key(_: &()) -> Option<String> {
        Some(CACHE_KEY_TRACKED_COURSES.to_string())
    }

    fn announced_id(tracked: &TrackedCourse) -> String {
        tracked.course.id.clone()
    }

    async fn fetch(api: &dyn CourseApi, _: &()) -> Result<Vec<TrackedCourse>, ApiError> {
        api.fetch_tracked_courses().await
    }

    async fn create(api: &dyn CourseApi, course_id: String) -> Result<TrackedCourse, ApiError> {
        api.track_course(&course_id).await
    }

    async fn update(_: &dyn CourseApi, _: &str, fields: Infallible) -> Result<TrackedCourse, ApiError> {
        match fields {}
    }

    async fn remove(api: &dyn CourseApi, id: &str) -> Result<(), ApiError> {
        api.untrack_course(id).await
    }
}

impl ResourceList<TrackedCourses> {
    /// Tracking record for `course_id`, if the course is followed.
    pub fn find_course(&self, course_id: &str) -> Option<TrackedCourse> {
        self.items().into_iter().find(|tracked| tracked.course.id == course_id)
    }

    pub fn is_tracking(&self, course_id: &str) -> bool {
        self.find_course(course_id).is_some()
    }
}

/// Lecturers the signed-in user follows. Creating takes a lecturer id.
pub struct TrackedLecturers;

#[async_trait]
impl Resource for TrackedLecturers {
    type Item = TrackedLecturer;
    type Filter = ();
    type Create = String;
    type Update = Infallible;

    const TOPIC: Topic = Topic::TrackedLecturers;
    const NAME: &'static str = "tracked lecturers";
    const ANNOUNCES_OWNER: bool = true;

    fn cache_key(_: &()) -> Option<String> {
        Some(CACHE_KEY_TRACKED_LECTURERS.to_string())
    }

    fn announced_id(tracked: &TrackedLecturer) -> String {
        tracked.lecturer.id.clone()
    }

    async fn fetch(api: &dyn CourseApi, _: &()) -> Result<Vec<TrackedLecturer>, ApiError> {
        api.fetch_tracked_lecturers().await
    }

    async fn create(api: &dyn CourseApi, lecturer_id: String) -> Result<TrackedLecturer, ApiError> {
        api.track_lecturer(&lecturer_id).await
    }

    async fn update(_: &dyn CourseApi, _: &str, fields: Infallible) -> Result<TrackedLecturer, ApiError> {
        match fields {}
    }

    async fn remove(api: &dyn CourseApi, id: &str) -> Result<(), ApiError> {
        api.untrack_lecturer(id).await
    }
}

impl ResourceList<TrackedLecturers> {
    pub fn is_tracking(&self, lecturer_id: &str) -> bool {
        self.items().iter().any(|tracked| tracked.lecturer.id == lecturer_id)
    }
}
