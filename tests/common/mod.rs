#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use course4me::api::models::{
    ContactRequest, ContactRequestFilter, ContactRequestUpdate, ContactStatus, Course, CourseFields, CourseRatings,
    CourseReview, CourseReviewFields, Department, DepartmentFields, Lecturer, LecturerFields, LecturerRatings,
    LecturerReview, LecturerReviewFields, ListFilter, NamedRef, NewContactRequest, TrackedCourse, TrackedLecturer,
};
use course4me::api::{ApiError, CourseApi};
use course4me::storage::LocalStorage;
use course4me::sync::{SignalHub, SyncOptions, SyncService};
use course4me::utils::clock::ManualClock;

pub const START_MILLIS: i64 = 1_700_000_000_000;

/// Server contents held by [`MockApi`].
#[derive(Default)]
pub struct MockState {
    pub courses: Vec<Course>,
    pub lecturers: Vec<Lecturer>,
    pub departments: Vec<Department>,
    pub course_reviews: Vec<CourseReview>,
    pub lecturer_reviews: Vec<LecturerReview>,
    pub tracked_courses: Vec<TrackedCourse>,
    pub tracked_lecturers: Vec<TrackedLecturer>,
    pub contact_requests: Vec<ContactRequest>,
}

/// In-memory API with per-endpoint call counters, injected failures and an
/// optional artificial latency.
#[derive(Default)]
pub struct MockApi {
    pub state: Mutex<MockState>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
    delay: Mutex<Option<Duration>>,
    next_id: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_state(state: MockState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
            ..Self::default()
        })
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    /// Make every call to `method` fail with `error` until cleared.
    pub fn fail(&self, method: &'static str, error: ApiError) {
        self.failures.lock().unwrap().insert(method, error);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    async fn enter(&self, method: &'static str) -> Result<(), ApiError> {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.failures.lock().unwrap().get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn new_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

fn not_found() -> ApiError {
    ApiError::Client {
        status: 404,
        message: Some("לא נמצא".to_string()),
    }
}

fn refs(ids: &[String]) -> Vec<NamedRef> {
    ids.iter().map(|id| NamedRef::new(id.clone(), "")).collect()
}

#[async_trait]
impl CourseApi for MockApi {
    async fn fetch_courses(&self, filter: &ListFilter) -> Result<Vec<Course>, ApiError> {
        self.enter("fetch_courses").await?;
        let state = self.state.lock().unwrap();
        Ok(state
            .courses
            .iter()
            .filter(|course| filter.search.as_deref().map_or(true, |search| course.title.contains(search)))
            .filter(|course| {
                filter
                    .department
                    .as_deref()
                    .map_or(true, |department| course.departments.iter().any(|d| d.id == department))
            })
            .cloned()
            .collect())
    }

    async fn fetch_course(&self, course_id: &str) -> Result<Course, ApiError> {
        self.enter("fetch_course").await?;
        let state = self.state.lock().unwrap();
        state
            .courses
            .iter()
            .find(|course| course.id == course_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_course(&self, fields: &CourseFields) -> Result<Course, ApiError> {
        self.enter("create_course").await?;
        let course = Course {
            id: self.new_id("course"),
            title: fields.title.clone(),
            course_number: fields.course_number.clone(),
            credits: fields.credits,
            departments: refs(&fields.department_ids),
            academic_institution: fields.academic_institution.clone(),
            description: fields.description.clone(),
            prerequisites: fields.prerequisites.clone(),
            lecturers: refs(&fields.lecturer_ids),
        };
        self.state.lock().unwrap().courses.push(course.clone());
        Ok(course)
    }

    async fn update_course(&self, course_id: &str, fields: &CourseFields) -> Result<Course, ApiError> {
        self.enter("update_course").await?;
        let mut state = self.state.lock().unwrap();
        let course = state
            .courses
            .iter_mut()
            .find(|course| course.id == course_id)
            .ok_or_else(not_found)?;
        course.title = fields.title.clone();
        course.course_number = fields.course_number.clone();
        course.credits = fields.credits;
        course.departments = refs(&fields.department_ids);
        course.prerequisites = fields.prerequisites.clone();
        course.lecturers = refs(&fields.lecturer_ids);
        Ok(course.clone())
    }

    async fn delete_course(&self, course_id: &str) -> Result<(), ApiError> {
        self.enter("delete_course").await?;
        let mut state = self.state.lock().unwrap();
        let before = state.courses.len();
        state.courses.retain(|course| course.id != course_id);
        if state.courses.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn fetch_lecturers(&self, filter: &ListFilter) -> Result<Vec<Lecturer>, ApiError> {
        self.enter("fetch_lecturers").await?;
        let state = self.state.lock().unwrap();
        Ok(state
            .lecturers
            .iter()
            .filter(|lecturer| filter.search.as_deref().map_or(true, |search| lecturer.name.contains(search)))
            .cloned()
            .collect())
    }

    async fn create_lecturer(&self, fields: &LecturerFields) -> Result<Lecturer, ApiError> {
        self.enter("create_lecturer").await?;
        let lecturer = Lecturer {
            id: self.new_id("lecturer"),
            name: fields.name.clone(),
            email: fields.email.clone(),
            departments: refs(&fields.department_ids),
            academic_institution: fields.academic_institution.clone(),
        };
        self.state.lock().unwrap().lecturers.push(lecturer.clone());
        Ok(lecturer)
    }

    async fn update_lecturer(&self, lecturer_id: &str, fields: &LecturerFields) -> Result<Lecturer, ApiError> {
        self.enter("update_lecturer").await?;
        let mut state = self.state.lock().unwrap();
        let lecturer = state
            .lecturers
            .iter_mut()
            .find(|lecturer| lecturer.id == lecturer_id)
            .ok_or_else(not_found)?;
        lecturer.name = fields.name.clone();
        lecturer.email = fields.email.clone();
        lecturer.departments = refs(&fields.department_ids);
        Ok(lecturer.clone())
    }

    async fn delete_lecturer(&self, lecturer_id: &str) -> Result<(), ApiError> {
        self.enter("delete_lecturer").await?;
        self.state.lock().unwrap().lecturers.retain(|lecturer| lecturer.id != lecturer_id);
        Ok(())
    }

    async fn fetch_departments(&self) -> Result<Vec<Department>, ApiError> {
        self.enter("fetch_departments").await?;
        Ok(self.state.lock().unwrap().departments.clone())
    }

    async fn create_department(&self, fields: &DepartmentFields) -> Result<Department, ApiError> {
        self.enter("create_department").await?;
        let department = Department {
            id: self.new_id("department"),
            name: fields.name.clone(),
            code: fields.code.clone(),
            academic_institution: fields.academic_institution.clone(),
        };
        self.state.lock().unwrap().departments.push(department.clone());
        Ok(department)
    }

    async fn update_department(
        &self,
        department_id: &str,
        fields: &DepartmentFields,
    ) -> Result<Department, ApiError> {
        self.enter("update_department").await?;
        let mut state = self.state.lock().unwrap();
        let department = state
            .departments
            .iter_mut()
            .find(|department| department.id == department_id)
            .ok_or_else(not_found)?;
        department.name = fields.name.clone();
        department.code = fields.code.clone();
        Ok(department.clone())
    }

    async fn delete_department(&self, department_id: &str) -> Result<(), ApiError> {
        self.enter("delete_department").await?;
        self.state
            .lock()
            .unwrap()
            .departments
            .retain(|department| department.id != department_id);
        Ok(())
    }

    async fn fetch_course_reviews(&self, course_id: &str) -> Result<Vec<CourseReview>, ApiError> {
        self.enter("fetch_course_reviews").await?;
        let state = self.state.lock().unwrap();
        Ok(state
            .course_reviews
            .iter()
            .filter(|review| review.course.id == course_id)
            .cloned()
            .collect())
    }

    async fn create_course_review(&self, fields: &CourseReviewFields) -> Result<CourseReview, ApiError> {
        self.enter("create_course_review").await?;
        let review = CourseReview {
            id: self.new_id("review"),
            course: NamedRef::new(fields.course_id.clone(), ""),
            lecturer: fields.lecturer_id.clone().map(|id| NamedRef::new(id, "")),
            user: Some(NamedRef::new("user-1", "דנה כהן")),
            ratings: fields.ratings,
            comment: fields.comment.clone(),
            is_anonymous: fields.is_anonymous,
            created_at: Some("2025-01-15T14:30:00.000Z".to_string()),
        };
        self.state.lock().unwrap().course_reviews.push(review.clone());
        Ok(review)
    }

    async fn update_course_review(
        &self,
        review_id: &str,
        fields: &CourseReviewFields,
    ) -> Result<CourseReview, ApiError> {
        self.enter("update_course_review").await?;
        let mut state = self.state.lock().unwrap();
        let review = state
            .course_reviews
            .iter_mut()
            .find(|review| review.id == review_id)
            .ok_or_else(not_found)?;
        review.ratings = fields.ratings;
        review.comment = fields.comment.clone();
        review.is_anonymous = fields.is_anonymous;
        Ok(review.clone())
    }

    async fn delete_course_review(&self, review_id: &str) -> Result<(), ApiError> {
        self.enter("delete_course_review").await?;
        self.state.lock().unwrap().course_reviews.retain(|review| review.id != review_id);
        Ok(())
    }

    async fn fetch_lecturer_reviews(&self, lecturer_id: &str) -> Result<Vec<LecturerReview>, ApiError> {
        self.enter("fetch_lecturer_reviews").await?;
        let state = self.state.lock().unwrap();
        Ok(state
            .lecturer_reviews
            .iter()
            .filter(|review| review.lecturer.id == lecturer_id)
            .cloned()
            .collect())
    }

    async fn create_lecturer_review(&self, fields: &LecturerReviewFields) -> Result<LecturerReview, ApiError> {
        self.enter("create_lecturer_review").await?;
        let review = LecturerReview {
            id: self.new_id("lecturer-review"),
            lecturer: NamedRef::new(fields.lecturer_id.clone(), ""),
            course: fields.course_id.clone().map(|id| NamedRef::new(id, "")),
            user: Some(NamedRef::new("user-1", "דנה כהן")),
            ratings: fields.ratings,
            comment: fields.comment.clone(),
            is_anonymous: fields.is_anonymous,
            created_at: None,
        };
        self.state.lock().unwrap().lecturer_reviews.push(review.clone());
        Ok(review)
    }

    async fn update_lecturer_review(
        &self,
        review_id: &str,
        fields: &LecturerReviewFields,
    ) -> Result<LecturerReview, ApiError> {
        self.enter("update_lecturer_review").await?;
        let mut state = self.state.lock().unwrap();
        let review = state
            .lecturer_reviews
            .iter_mut()
            .find(|review| review.id == review_id)
            .ok_or_else(not_found)?;
        review.ratings = fields.ratings;
        review.comment = fields.comment.clone();
        Ok(review.clone())
    }

    async fn delete_lecturer_review(&self, review_id: &str) -> Result<(), ApiError> {
        self.enter("delete_lecturer_review").await?;
        self.state
            .lock()
            .unwrap()
            .lecturer_reviews
            .retain(|review| review.id != review_id);
        Ok(())
    }

    async fn fetch_tracked_courses(&self) -> Result<Vec<TrackedCourse>, ApiError> {
        self.enter("fetch_tracked_courses").await?;
        Ok(self.state.lock().unwrap().tracked_courses.clone())
    }

    async fn track_course(&self, course_id: &str) -> Result<TrackedCourse, ApiError> {
        self.enter("track_course").await?;
        let mut state = self.state.lock().unwrap();
        let course = state
            .courses
            .iter()
            .find(|course| course.id == course_id)
            .cloned()
            .ok_or_else(not_found)?;
        let tracked = TrackedCourse {
            id: self.new_id("tracked"),
            course,
            created_at: None,
        };
        state.tracked_courses.push(tracked.clone());
        Ok(tracked)
    }

    async fn untrack_course(&self, tracked_id: &str) -> Result<(), ApiError> {
        self.enter("untrack_course").await?;
        let mut state = self.state.lock().unwrap();
        let before = state.tracked_courses.len();
        state.tracked_courses.retain(|tracked| tracked.id != tracked_id);
        if state.tracked_courses.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn fetch_tracked_lecturers(&self) -> Result<Vec<TrackedLecturer>, ApiError> {
        self.enter("fetch_tracked_lecturers").await?;
        Ok(self.state.lock().unwrap().tracked_lecturers.clone())
    }

    async fn track_lecturer(&self, lecturer_id: &str) -> Result<TrackedLecturer, ApiError> {
        self.enter("track_lecturer").await?;
        let mut state = self.state.lock().unwrap();
        let lecturer = state
            .lecturers
            .iter()
            .find(|lecturer| lecturer.id == lecturer_id)
            .cloned()
            .ok_or_else(not_found)?;
        let tracked = TrackedLecturer {
            id: self.new_id("tracked-lecturer"),
            lecturer,
            created_at: None,
        };
        state.tracked_lecturers.push(tracked.clone());
        Ok(tracked)
    }

    async fn untrack_lecturer(&self, tracked_id: &str) -> Result<(), ApiError> {
        self.enter("untrack_lecturer").await?;
        self.state
            .lock()
            .unwrap()
            .tracked_lecturers
            .retain(|tracked| tracked.id != tracked_id);
        Ok(())
    }

    async fn fetch_my_contact_requests(&self) -> Result<Vec<ContactRequest>, ApiError> {
        self.enter("fetch_my_contact_requests").await?;
        Ok(self.state.lock().unwrap().contact_requests.clone())
    }

    async fn create_contact_request(&self, request: &NewContactRequest) -> Result<ContactRequest, ApiError> {
        self.enter("create_contact_request").await?;
        let created = ContactRequest {
            id: self.new_id("contact"),
            user: Some(NamedRef::new("user-1", "דנה כהן")),
            subject: request.subject.clone(),
            category: request.category.clone(),
            description: request.description.clone(),
            status: ContactStatus::Pending,
            admin_response: None,
            responded_by: None,
            created_at: None,
            updated_at: None,
            responded_at: None,
        };
        self.state.lock().unwrap().contact_requests.push(created.clone());
        Ok(created)
    }

    async fn delete_contact_request(&self, request_id: &str) -> Result<(), ApiError> {
        self.enter("delete_contact_request").await?;
        self.state
            .lock()
            .unwrap()
            .contact_requests
            .retain(|request| request.id != request_id);
        Ok(())
    }

    async fn fetch_contact_requests(&self, filter: &ContactRequestFilter) -> Result<Vec<ContactRequest>, ApiError> {
        self.enter("fetch_contact_requests").await?;
        let state = self.state.lock().unwrap();
        Ok(state
            .contact_requests
            .iter()
            .filter(|request| filter.status.map_or(true, |status| request.status == status))
            .cloned()
            .collect())
    }

    async fn update_contact_request(
        &self,
        request_id: &str,
        update: &ContactRequestUpdate,
    ) -> Result<ContactRequest, ApiError> {
        self.enter("update_contact_request").await?;
        let mut state = self.state.lock().unwrap();
        let request = state
            .contact_requests
            .iter_mut()
            .find(|request| request.id == request_id)
            .ok_or_else(not_found)?;
        request.status = update.status;
        if let Some(response) = &update.admin_response {
            request.admin_response = Some(response.clone());
            request.responded_by = Some(NamedRef::new("admin-1", "מנהל"));
        }
        Ok(request.clone())
    }

    async fn request_password_reset(&self, _email: &str) -> Result<String, ApiError> {
        self.enter("request_password_reset").await?;
        Ok("נשלח קישור לאיפוס סיסמה".to_string())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn course(id: &str, title: &str) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        course_number: format!("{}-101", id.to_uppercase()),
        credits: Some(3.0),
        departments: vec![NamedRef::new("cs", "מדעי המחשב")],
        academic_institution: None,
        description: None,
        prerequisites: Vec::new(),
        lecturers: Vec::new(),
    }
}

pub fn lecturer(id: &str, name: &str) -> Lecturer {
    Lecturer {
        id: id.to_string(),
        name: name.to_string(),
        email: None,
        departments: vec![NamedRef::new("cs", "מדעי המחשב")],
        academic_institution: None,
    }
}

pub fn course_ratings(scores: [u8; 5]) -> CourseRatings {
    CourseRatings {
        interest: scores[0],
        difficulty: scores[1],
        workload: scores[2],
        teaching_quality: scores[3],
        recommendation: scores[4],
    }
}

pub fn lecturer_ratings(scores: [u8; 5]) -> LecturerRatings {
    LecturerRatings {
        clarity: scores[0],
        responsiveness: scores[1],
        availability: scores[2],
        organization: scores[3],
        knowledge: scores[4],
    }
}

pub fn course_review(id: &str, course_id: &str, scores: [u8; 5]) -> CourseReview {
    CourseReview {
        id: id.to_string(),
        course: NamedRef::new(course_id, ""),
        lecturer: None,
        user: Some(NamedRef::new("user-2", "יואב לוי")),
        ratings: course_ratings(scores),
        comment: String::new(),
        is_anonymous: false,
        created_at: None,
    }
}

pub fn review_fields(course_id: &str, scores: [u8; 5]) -> CourseReviewFields {
    CourseReviewFields {
        course_id: course_id.to_string(),
        lecturer_id: None,
        ratings: course_ratings(scores),
        comment: "קורס מצוין".to_string(),
        is_anonymous: false,
    }
}

pub fn course_fields(title: &str, number: &str) -> CourseFields {
    CourseFields {
        title: title.to_string(),
        course_number: number.to_string(),
        department_ids: vec!["cs".to_string()],
        ..CourseFields::default()
    }
}

/// In-memory storage driven by a manual clock.
pub async fn storage(clock: &ManualClock) -> Arc<LocalStorage> {
    let storage = LocalStorage::in_memory()
        .await
        .expect("in-memory storage should open")
        .with_clock(Arc::new(clock.clone()));
    Arc::new(storage)
}

/// One client: storage, hub, clock and the API it talks to.
pub struct Harness {
    pub api: Arc<MockApi>,
    pub clock: ManualClock,
    pub hub: SignalHub,
}

impl Harness {
    pub async fn new(api: Arc<MockApi>) -> Self {
        let clock = ManualClock::new(START_MILLIS);
        let hub = SignalHub::new(storage(&clock).await);
        Self { api, clock, hub }
    }

    /// Open another context (tab) on the same storage.
    pub fn context(&self) -> SyncService {
        SyncService::new(self.api.clone(), &self.hub, SyncOptions::default())
    }
}
