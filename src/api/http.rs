//! HTTP implementation of [`CourseApi`] using reqwest.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::models::{
    ContactRequest, ContactRequestFilter, ContactRequestUpdate, Course, CourseFields, CourseReview, CourseReviewFields,
    Department, DepartmentFields, Lecturer, LecturerFields, LecturerReview, LecturerReviewFields, ListFilter,
    NewContactRequest, TrackedCourse, TrackedLecturer,
};
use super::{ApiError, CourseApi};

/// Whether a call needs the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Optional,
    Required,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackCourseBody<'a> {
    course_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackLecturerBody<'a> {
    lecturer_id: &'a str,
}

#[derive(Serialize)]
struct ForgotPasswordBody<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: String,
}

/// Client for the Course4Me REST API.
pub struct HttpApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpApi {
    /// Create a client for `base_url` (e.g. "https://course4me.example.org").
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Validation(format!("Invalid API base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Validation(format!("Invalid API base URL '{base_url}'")));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build http client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            token: token.filter(|token| !token.is_empty()),
        })
    }

    /// Absolute URL for the path `segments`, each one percent-encoded, so an
    /// id can never add a path component or a query.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, path: &[&str], auth: Auth) -> Result<RequestBuilder, ApiError> {
        let builder = self.client.request(method, self.endpoint(path));
        match (&self.token, auth) {
            (Some(token), _) => Ok(builder.bearer_auth(token)),
            (None, Auth::Optional) => Ok(builder),
            (None, Auth::Required) => Err(ApiError::Unauthorized),
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("API responded {status}: {body}");
        Err(ApiError::from_response(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&'static str, String)],
        auth: Auth,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path, auth)?.query(query);
        self.send_json(builder).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &[&str],
        body: &B,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path, auth)?.json(body);
        self.send_json(builder).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &[&str], body: &B) -> Result<T, ApiError> {
        let builder = self.request(Method::PUT, path, Auth::Required)?.json(body);
        self.send_json(builder).await
    }

    async fn delete(&self, path: &[&str]) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, path, Auth::Required)?;
        self.send(builder).await.map(|_| ())
    }
}

#[async_trait]
impl CourseApi for HttpApi {
    async fn fetch_courses(&self, filter: &ListFilter) -> Result<Vec<Course>, ApiError> {
        self.get(&["api", "courses"], &filter.query_pairs(), Auth::Optional).await
    }

    async fn fetch_course(&self, course_id: &str) -> Result<Course, ApiError> {
        self.get(&["api", "courses", course_id], &[], Auth::Optional).await
    }

    async fn create_course(&self, fields: &CourseFields) -> Result<Course, ApiError> {
        self.post(&["api", "courses"], fields, Auth::Required).await
    }

    async fn update_course(&self, course_id: &str, fields: &CourseFields) -> Result<Course, ApiError> {
        self.put(&["api", "courses", course_id], fields).await
    }

    async fn delete_course(&self, course_id: &str) -> Result<(), ApiError> {
        self.delete(&["api", "courses", course_id]).await
    }

    async fn fetch_lecturers(&self, filter: &ListFilter) -> Result<Vec<Lecturer>, ApiError> {
        self.get(&["api", "lecturers"], &filter.query_pairs(), Auth::Optional).await
    }

    async fn create_lecturer(&self, fields: &LecturerFields) -> Result<Lecturer, ApiError> {
        self.post(&["api", "lecturers"], fields, Auth::Required).await
    }

    async fn update_lecturer(&self, lecturer_id: &str, fields: &LecturerFields) -> Result<Lecturer, ApiError> {
        self.put(&["api", "lecturers", lecturer_id], fields).await
    }

    async fn delete_lecturer(&self, lecturer_id: &str) -> Result<(), ApiError> {
        self.delete(&["api", "lecturers", lecturer_id]).await
    }

    async fn fetch_departments(&self) -> Result<Vec<Department>, ApiError> {
        self.get(&["api", "departments"], &[], Auth::Optional).await
    }

    async fn create_department(&self, fields: &DepartmentFields) -> Result<Department, ApiError> {
        self.post(&["api", "departments"], fields, Auth::Required).await
    }

    async fn update_department(
        &self,
        department_id: &str,
        fields: &DepartmentFields,
    ) -> Result<Department, ApiError> {
        self.put(&["api", "departments", department_id], fields).await
    }

    async fn delete_department(&self, department_id: &str) -> Result<(), ApiError> {
        self.delete(&["api", "departments", department_id]).await
    }

    async fn fetch_course_reviews(&self, course_id: &str) -> Result<Vec<CourseReview>, ApiError> {
        self.get(&["api", "reviews", "course", course_id], &[], Auth::Optional)
            .await
    }

    async fn create_course_review(&self, fields: &CourseReviewFields) -> Result<CourseReview, ApiError> {
        self.post(&["api", "reviews"], fields, Auth::Required).await
    }

    async fn update_course_review(
        &self,
        review_id: &str,
        fields: &CourseReviewFields,
    ) -> Result<CourseReview, ApiError> {
        self.put(&["api", "reviews", review_id], fields).await
    }

    async fn delete_course_review(&self, review_id: &str) -> Result<(), ApiError> {
        self.delete(&["api", "reviews", review_id]).await
    }

    async fn fetch_lecturer_reviews(&self, lecturer_id: &str) -> Result<Vec<LecturerReview>, ApiError> {
        self.get(
            &["api", "lecturer-reviews", "lecturer", lecturer_id],
            &[],
            Auth::Optional,
        )
        .await
    }

    async fn create_lecturer_review(&self, fields: &LecturerReviewFields) -> Result<LecturerReview, ApiError> {
        self.post(&["api", "lecturer-reviews"], fields, Auth::Required).await
    }

    async fn update_lecturer_review(
        &self,
        review_id: &str,
        fields: &LecturerReviewFields,
    ) -> Result<LecturerReview, ApiError> {
        self.put(&["api", "lecturer-reviews", review_id], fields).await
    }

    async fn delete_lecturer_review(&self, review_id: &str) -> Result<(), ApiError> {
        self.delete(&["api", "lecturer-reviews", review_id]).await
    }

    async fn fetch_tracked_courses(&self) -> Result<Vec<TrackedCourse>, ApiError> {
        self.get(&["api", "tracked-courses"], &[], Auth::Required).await
    }

    async fn track_course(&self, course_id: &str) -> Result<TrackedCourse, ApiError> {
        self.post(&["api", "tracked-courses"], &TrackCourseBody { course_id }, Auth::Required)
            .await
    }

    async fn untrack_course(&self, tracked_id: &str) -> Result<(), ApiError> {
        self.delete(&["api", "tracked-courses", tracked_id]).await
    }

    async fn fetch_tracked_lecturers(&self) -> Result<Vec<TrackedLecturer>, ApiError> {
        self.get(&["api", "tracked-lecturers"], &[], Auth::Required).await
    }

    async fn track_lecturer(&self, lecturer_id: &str) -> Result<TrackedLecturer, ApiError> {
        self.post(
            &["api", "tracked-lecturers"],
            &TrackLecturerBody { lecturer_id },
            Auth::Required,
        )
        .await
    }

    async fn untrack_lecturer(&self, tracked_id: &str) -> Result<(), ApiError> {
        self.delete(&["api", "tracked-lecturers", tracked_id]).await
    }

    async fn fetch_my_contact_requests(&self) -> Result<Vec<ContactRequest>, ApiError> {
        self.get(&["api", "contact-requests", "my-requests"], &[], Auth::Required).await
    }

    async fn create_contact_request(&self, request: &NewContactRequest) -> Result<ContactRequest, ApiError> {
        self.post(&["api", "contact-requests"], request, Auth::Required).await
    }

    async fn delete_contact_request(&self, request_id: &str) -> Result<(), ApiError> {
        self.delete(&["api", "contact-requests", request_id]).await
    }

    async fn fetch_contact_requests(&self, filter: &ContactRequestFilter) -> Result<Vec<ContactRequest>, ApiError> {
        self.get(&["api", "contact-requests"], &filter.query_pairs(), Auth::Required)
            .await
    }

    async fn update_contact_request(
        &self,
        request_id: &str,
        update: &ContactRequestUpdate,
    ) -> Result<ContactRequest, ApiError> {
        self.put(&["api", "contact-requests", request_id], update).await
    }

    async fn request_password_reset(&self, email: &str) -> Result<String, ApiError> {
        let body: MessageBody = self
            .post(&["api", "auth", "forgot-password"], &ForgotPasswordBody { email }, Auth::Optional)
            .await?;
        Ok(body.message)
    }
}
