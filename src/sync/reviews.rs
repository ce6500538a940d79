//! Course and lecturer reviews with their aggregate statistics.

use async_trait::async_trait;

use crate::api::models::{CourseReview, CourseReviewFields, LecturerReview, LecturerReviewFields};
use crate::api::{ApiError, CourseApi};
use crate::stats::{course_stats, lecturer_stats, CourseStats, LecturerStats};
use crate::sync::bus::Topic;
use crate::sync::resource::{Resource, ResourceList};

/// Reviews of one course; the filter is the course id.
pub struct CourseReviews;

#[async_trait]
impl Resource for CourseReviews {
    type Item = CourseReview;
    type Filter = String;
    type Create = CourseReviewFields;
    type Update = CourseReviewFields;

    const TOPIC: Topic = Topic::CourseReviews;
    const NAME: &'static str = "course reviews";
    const ANNOUNCES_OWNER: bool = true;

    fn belongs(course_id: &String, review: &CourseReview) -> bool {
        review.course.id == *course_id
    }

    // Listeners key their refresh on the course, not the review
    fn announced_id(review: &CourseReview) -> String {
        review.course.id.clone()
    }

    async fn fetch(api: &dyn CourseApi, course_id: &String) -> Result<Vec<CourseReview>, ApiError> {
        api.fetch_course_reviews(course_id).await
    }

    async fn create(api: &dyn CourseApi, fields: CourseReviewFields) -> Result<CourseReview, ApiError> {
        fields.validate()?;
        api.create_course_review(&fields).await
    }

    async fn update(api: &dyn CourseApi, id: &str, fields: CourseReviewFields) -> Result<CourseReview, ApiError> {
        fields.validate()?;
        api.update_course_review(id, &fields).await
    }

    async fn remove(api: &dyn CourseApi, id: &str) -> Result<(), ApiError> {
        api.delete_course_review(id).await
    }
}

impl ResourceList<CourseReviews> {
    /// Averages over the reviews currently in the list.
    pub fn stats(&self) -> Option<CourseStats> {
        course_stats(&self.items())
    }
}

/// Reviews of one lecturer; the filter is the lecturer id.
pub struct LecturerReviews;

#[async_trait]
impl Resource for LecturerReviews {
    type Item = LecturerReview;
    type Filter = String;
    type Create = LecturerReviewFields;
    type Update = LecturerReviewFields;

    const TOPIC: Topic = Topic::LecturerReviews;
    const NAME: &'static str = "lecturer reviews";
    const ANNOUNCES_OWNER: bool = true;

    fn belongs(lecturer_id: &String, review: &LecturerReview) -> bool {
        review.lecturer.id == *lecturer_id
    }

    fn announced_id(review: &LecturerReview) -> String {
        review.lecturer.id.clone()
    }

    async fn fetch(api: &dyn CourseApi, lecturer_id: &String) -> Result<Vec<LecturerReview>, ApiError> {
        api.fetch_lecturer_reviews(lecturer_id).await
    }

    async fn create(api: &dyn CourseApi, fields: LecturerReviewFields) -> Result<LecturerReview, ApiError> {
        fields.validate()?;
        api.create_lecturer_review(&fields).await
    }

    async fn update(
        api: &dyn CourseApi,
        id: &str,
        fields: LecturerReviewFields,
    ) -> Result<LecturerReview, ApiError> {
        fields.validate()?;
        api.update_lecturer_review(id, &fields).await
    }

    async fn remove(api: &dyn CourseApi, id: &str) -> Result<(), ApiError> {
        api.delete_lecturer_review(id).await
    }
}

impl ResourceList<LecturerReviews> {
    pub fn stats(&self) -> Option<LecturerStats> {
        lecturer_stats(&self.items())
    }
}
