//! REST API abstraction layer.
//!
//! This module defines the interface the client uses to reach the Course4Me
//! REST API, along with the error taxonomy every call maps into. The HTTP
//! implementation lives in [`http`]; tests substitute an in-memory one.

use async_trait::async_trait;
use serde::Deserialize;

pub mod http;
pub mod models;

use crate::constants::{ERROR_NETWORK, ERROR_REQUEST_FAILED, ERROR_SERVER, ERROR_UNAUTHORIZED};
use models::{
    ContactRequest, ContactRequestFilter, ContactRequestUpdate, Course, CourseFields, CourseReview, CourseReviewFields,
    Department, DepartmentFields, Lecturer, LecturerFields, LecturerReview, LecturerReviewFields, ListFilter,
    NewContactRequest, TrackedCourse, TrackedLecturer,
};

/// Error types for API operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// The server rejected the request (4xx).
    #[error("Request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Client { status: u16, message: Option<String> },

    /// The server failed (5xx).
    #[error("Server error ({status})")]
    Server { status: u16 },

    /// A 2xx body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Input rejected before any request was sent.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// An authenticated call was attempted without a token.
    #[error("Not signed in")]
    Unauthorized,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// Classify a non-2xx response.
    pub fn from_response(status: u16, body: &str) -> Self {
        if status >= 500 {
            return ApiError::Server { status };
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message.or(body.error))
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty());

        ApiError::Client { status, message }
    }

    /// HTTP status behind the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Client { status, .. } | ApiError::Server { status } => Some(*status),
            _ => None,
        }
    }

    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => ERROR_NETWORK.to_string(),
            ApiError::Client { message: Some(message), .. } => message.clone(),
            ApiError::Client { message: None, .. } => ERROR_REQUEST_FAILED.to_string(),
            ApiError::Server { .. } | ApiError::Decode(_) => ERROR_SERVER.to_string(),
            ApiError::Validation(message) => message.clone(),
            ApiError::Unauthorized => ERROR_UNAUTHORIZED.to_string(),
        }
    }
}

/// Interface to the Course4Me REST API.
///
/// One method per endpoint. Implementations translate transport failures and
/// non-2xx responses into [`ApiError`]; they never retry.
#[async_trait]
pub trait CourseApi: Send + Sync {
    // Courses
    async fn fetch_courses(&self, filter: &ListFilter) -> Result<Vec<Course>, ApiError>;
    async fn fetch_course(&self, course_id: &str) -> Result<Course, ApiError>;
    async fn create_course(&self, fields: &CourseFields) -> Result<Course, ApiError>;
    async fn update_course(&self, course_id: &str, fields: &CourseFields) -> Result<Course, ApiError>;
    async fn delete_course(&self, course_id: &str) -> Result<(), ApiError>;

    // Lecturers
    async fn fetch_lecturers(&self, filter: &ListFilter) -> Result<Vec<Lecturer>, ApiError>;
    async fn create_lecturer(&self, fields: &LecturerFields) -> Result<Lecturer, ApiError>;
    async fn update_lecturer(&self, lecturer_id: &str, fields: &LecturerFields) -> Result<Lecturer, ApiError>;
    async fn delete_lecturer(&self, lecturer_id: &str) -> Result<(), ApiError>;

    // Departments
    async fn fetch_departments(&self) -> Result<Vec<Department>, ApiError>;
    async fn create_department(&self, fields: &DepartmentFields) -> Result<Department, ApiError>;
    async fn update_department(&self, department_id: &str, fields: &DepartmentFields)
        -> Result<Department, ApiError>;
    async fn delete_department(&self, department_id: &str) -> Result<(), ApiError>;

    // Course reviews
    async fn fetch_course_reviews(&self, course_id: &str) -> Result<Vec<CourseReview>, ApiError>;
    async fn create_course_review(&self, fields: &CourseReviewFields) -> Result<CourseReview, ApiError>;
    async fn update_course_review(&self, review_id: &str, fields: &CourseReviewFields)
        -> Result<CourseReview, ApiError>;
    async fn delete_course_review(&self, review_id: &str) -> Result<(), ApiError>;

    // Lecturer reviews
    async fn fetch_lecturer_reviews(&self, lecturer_id: &str) -> Result<Vec<LecturerReview>, ApiError>;
    async fn create_lecturer_review(&self, fields: &LecturerReviewFields) -> Result<LecturerReview, ApiError>;
    async fn update_lecturer_review(
        &self,
        review_id: &str,
        fields: &LecturerReviewFields,
    ) -> Result<LecturerReview, ApiError>;
    async fn delete_lecturer_review(&self, review_id: &str) -> Result<(), ApiError>;

    // Tracking
    async fn fetch_tracked_courses(&self) -> Result<Vec<TrackedCourse>, ApiError>;
    async fn track_course(&self, course_id: &str) -> Result<TrackedCourse, ApiError>;
    async fn untrack_course(&self, tracked_id: &str) -> Result<(), ApiError>;
    async fn fetch_tracked_lecturers(&self) -> Result<Vec<TrackedLecturer>, ApiError>;
    async fn track_lecturer(&self, lecturer_id: &str) -> Result<TrackedLecturer, ApiError>;
    async fn untrack_lecturer(&self, tracked_id: &str) -> Result<(), ApiError>;

    // Contact requests
    async fn fetch_my_contact_requests(&self) -> Result<Vec<ContactRequest>, ApiError>;
    async fn create_contact_request(&self, request: &NewContactRequest) -> Result<ContactRequest, ApiError>;
    async fn delete_contact_request(&self, request_id: &str) -> Result<(), ApiError>;
    async fn fetch_contact_requests(&self, filter: &ContactRequestFilter) -> Result<Vec<ContactRequest>, ApiError>;
    async fn update_contact_request(
        &self,
        request_id: &str,
        update: &ContactRequestUpdate,
    ) -> Result<ContactRequest, ApiError>;

    // Auth
    /// Ask the server to email a reset link. Returns the server's message.
    async fn request_password_reset(&self, email: &str) -> Result<String, ApiError>;
}
