//! API data models.
//!
//! The REST API is not consistent about shapes: references arrive as bare ids
//! or embedded objects, departments as an array or a legacy comma-joined
//! `department` string, prerequisites as a string or an array, ids as `_id` or
//! `id`, and `isAnonymous` as a boolean, number or string. Every model here
//! deserializes through a private wire type and normalizes once, so the rest
//! of the crate only ever sees one shape. Serializing a model produces the
//! normalized shape, which the wire types also accept.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ApiError;
use crate::constants::{ANONYMOUS_USER, UNKNOWN_USER};
use crate::stats::{CourseRatingField, LecturerRatingField, Rated, RATING_RANGE};

/// Anything addressed by a server id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Normalized reference to a lecturer, department, course or user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl NamedRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RefWire {
    Id(String),
    Object {
        #[serde(alias = "_id")]
        id: String,
        #[serde(default, alias = "fullName")]
        name: Option<String>,
    },
}

impl From<RefWire> for NamedRef {
    fn from(wire: RefWire) -> Self {
        match wire {
            RefWire::Id(id) => NamedRef { id, name: String::new() },
            RefWire::Object { id, name } => NamedRef {
                id,
                name: name.unwrap_or_default(),
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RefListWire {
    List(Vec<RefWire>),
    Joined(String),
    Single(RefWire),
}

impl RefListWire {
    fn into_refs(self) -> Vec<NamedRef> {
        match self {
            RefListWire::List(items) => items.into_iter().map(NamedRef::from).collect(),
            RefListWire::Joined(joined) => split_joined(&joined)
                .into_iter()
                .map(|name| NamedRef::new(name.clone(), name))
                .collect(),
            RefListWire::Single(item) => vec![item.into()],
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringListWire {
    List(Vec<String>),
    Joined(String),
}

impl StringListWire {
    fn into_strings(self) -> Vec<String> {
        match self {
            StringListWire::List(items) => items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            StringListWire::Joined(joined) => split_joined(&joined),
        }
    }
}

fn split_joined(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Prefer the plural field; fall back to the legacy singular one when the
/// plural is missing or empty.
fn normalize_refs(plural: Option<RefListWire>, legacy: Option<RefListWire>) -> Vec<NamedRef> {
    let refs = plural.map(RefListWire::into_refs).unwrap_or_default();
    if !refs.is_empty() {
        return refs;
    }
    legacy.map(RefListWire::into_refs).unwrap_or_default()
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flex>::deserialize(deserializer)? {
        Some(Flex::Bool(value)) => value,
        Some(Flex::Int(value)) => value != 0,
        Some(Flex::Text(value)) => matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on"),
        None => false,
    })
}

fn flexible_number<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex {
        Number(f32),
        Text(String),
    }

    Ok(match Option::<Flex>::deserialize(deserializer)? {
        Some(Flex::Number(value)) => Some(value),
        Some(Flex::Text(value)) => value.trim().parse().ok(),
        None => None,
    })
}

fn join_strings<S: Serializer>(items: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&items.join(", "))
}

fn display_name<'a>(is_anonymous: bool, user: Option<&'a NamedRef>) -> &'a str {
    if is_anonymous {
        return ANONYMOUS_USER;
    }
    user.map(|user| user.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_USER)
}

fn check_rating(label: &str, value: u8) -> Result<(), ApiError> {
    if RATING_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("הדירוג '{label}' חייב להיות בין 1 ל-5")))
    }
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub course_number: String,
    pub credits: Option<f32>,
    pub departments: Vec<NamedRef>,
    pub academic_institution: Option<String>,
    pub description: Option<String>,
    pub prerequisites: Vec<String>,
    pub lecturers: Vec<NamedRef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseWire {
    #[serde(alias = "_id")]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    course_number: String,
    #[serde(default, deserialize_with = "flexible_number")]
    credits: Option<f32>,
    #[serde(default)]
    departments: Option<RefListWire>,
    #[serde(default)]
    department: Option<RefListWire>,
    #[serde(default)]
    academic_institution: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    prerequisites: Option<StringListWire>,
    #[serde(default)]
    lecturers: Option<RefListWire>,
}

impl<'de> Deserialize<'de> for Course {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = CourseWire::deserialize(deserializer)?;
        Ok(Course {
            id: wire.id,
            title: wire.title,
            course_number: wire.course_number,
            credits: wire.credits,
            departments: normalize_refs(wire.departments, wire.department),
            academic_institution: wire.academic_institution,
            description: wire.description,
            prerequisites: wire.prerequisites.map(StringListWire::into_strings).unwrap_or_default(),
            lecturers: wire.lecturers.map(RefListWire::into_refs).unwrap_or_default(),
        })
    }
}

impl Identified for Course {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Fields sent when creating or replacing a course.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFields {
    pub title: String,
    pub course_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<f32>,
    #[serde(rename = "departments")]
    pub department_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(serialize_with = "join_strings")]
    pub prerequisites: Vec<String>,
    #[serde(rename = "lecturers")]
    pub lecturer_ids: Vec<String>,
}

impl CourseFields {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("יש להזין שם קורס".to_string()));
        }
        if self.course_number.trim().is_empty() {
            return Err(ApiError::Validation("יש להזין מספר קורס".to_string()));
        }
        Ok(())
    }
}

/// Search parameters for course and lecturer listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListFilter {
    pub search: Option<String>,
    pub department: Option<String>,
}

impl ListFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.department.is_none()
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(department) = &self.department {
            pairs.push(("department", department.clone()));
        }
        pairs
    }
}

// ---------------------------------------------------------------------------
// Lecturers and departments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecturer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub departments: Vec<NamedRef>,
    pub academic_institution: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LecturerWire {
    #[serde(alias = "_id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    departments: Option<RefListWire>,
    #[serde(default)]
    department: Option<RefListWire>,
    #[serde(default)]
    academic_institution: Option<String>,
}

impl<'de> Deserialize<'de> for Lecturer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = LecturerWire::deserialize(deserializer)?;
        Ok(Lecturer {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            departments: normalize_refs(wire.departments, wire.department),
            academic_institution: wire.academic_institution,
        })
    }
}

impl Identified for Lecturer {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturerFields {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "departments")]
    pub department_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_institution: Option<String>,
}

impl LecturerFields {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("יש להזין שם מרצה".to_string()));
        }
        if self.department_ids.is_empty() {
            return Err(ApiError::Validation("יש לבחור לפחות חוג אחד".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub academic_institution: Option<String>,
}

impl Identified for Department {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentFields {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_institution: Option<String>,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Ratings of a course review, each 1..=5, or 0 when the review leaves it out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRatings {
    #[serde(default)]
    pub interest: u8,
    #[serde(default)]
    pub difficulty: u8,
    #[serde(default)]
    pub workload: u8,
    #[serde(default)]
    pub teaching_quality: u8,
    #[serde(default, alias = "investment")]
    pub recommendation: u8,
}

impl CourseRatings {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_rating("עניין", self.interest)?;
        check_rating("קושי", self.difficulty)?;
        check_rating("עומס", self.workload)?;
        check_rating("איכות ההוראה", self.teaching_quality)?;
        check_rating("המלצה", self.recommendation)
    }
}

/// Ratings of a lecturer review, each 1..=5, or 0 when the review leaves it out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturerRatings {
    #[serde(default)]
    pub clarity: u8,
    #[serde(default)]
    pub responsiveness: u8,
    #[serde(default)]
    pub availability: u8,
    #[serde(default)]
    pub organization: u8,
    #[serde(default)]
    pub knowledge: u8,
}

impl LecturerRatings {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_rating("בהירות", self.clarity)?;
        check_rating("היענות", self.responsiveness)?;
        check_rating("זמינות", self.availability)?;
        check_rating("ארגון", self.organization)?;
        check_rating("ידע", self.knowledge)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseReview {
    pub id: String,
    pub course: NamedRef,
    pub lecturer: Option<NamedRef>,
    pub user: Option<NamedRef>,
    #[serde(flatten)]
    pub ratings: CourseRatings,
    pub comment: String,
    pub is_anonymous: bool,
    pub created_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseReviewWire {
    #[serde(alias = "_id")]
    id: String,
    #[serde(alias = "courseId")]
    course: RefWire,
    #[serde(default, alias = "lecturerId")]
    lecturer: Option<RefWire>,
    #[serde(default)]
    user: Option<RefWire>,
    #[serde(default)]
    interest: u8,
    #[serde(default)]
    difficulty: u8,
    #[serde(default)]
    workload: u8,
    #[serde(default)]
    teaching_quality: u8,
    #[serde(default, alias = "investment")]
    recommendation: u8,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    is_anonymous: bool,
    #[serde(default)]
    created_at: Option<String>,
}

impl<'de> Deserialize<'de> for CourseReview {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = CourseReviewWire::deserialize(deserializer)?;
        Ok(CourseReview {
            id: wire.id,
            course: wire.course.into(),
            lecturer: wire.lecturer.map(NamedRef::from),
            user: wire.user.map(NamedRef::from),
            ratings: CourseRatings {
                interest: wire.interest,
                difficulty: wire.difficulty,
                workload: wire.workload,
                teaching_quality: wire.teaching_quality,
                recommendation: wire.recommendation,
            },
            comment: wire.comment.unwrap_or_default(),
            is_anonymous: wire.is_anonymous,
            created_at: wire.created_at,
        })
    }
}

impl CourseReview {
    /// Name shown next to the review.
    pub fn display_name(&self) -> &str {
        display_name(self.is_anonymous, self.user.as_ref())
    }
}

impl Identified for CourseReview {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Rated<CourseRatingField> for CourseReview {
    fn rating(&self, field: CourseRatingField) -> u8 {
        match field {
            CourseRatingField::Interest => self.ratings.interest,
            CourseRatingField::Difficulty => self.ratings.difficulty,
            CourseRatingField::Workload => self.ratings.workload,
            CourseRatingField::TeachingQuality => self.ratings.teaching_quality,
            CourseRatingField::Recommendation => self.ratings.recommendation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseReviewFields {
    #[serde(rename = "course")]
    pub course_id: String,
    #[serde(rename = "lecturer", skip_serializing_if = "Option::is_none")]
    pub lecturer_id: Option<String>,
    #[serde(flatten)]
    pub ratings: CourseRatings,
    pub comment: String,
    pub is_anonymous: bool,
}

impl CourseReviewFields {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.course_id.is_empty() {
            return Err(ApiError::Validation("יש לבחור קורס".to_string()));
        }
        self.ratings.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturerReview {
    pub id: String,
    pub lecturer: NamedRef,
    pub course: Option<NamedRef>,
    pub user: Option<NamedRef>,
    #[serde(flatten)]
    pub ratings: LecturerRatings,
    pub comment: String,
    pub is_anonymous: bool,
    pub created_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LecturerReviewWire {
    #[serde(alias = "_id")]
    id: String,
    #[serde(alias = "lecturerId")]
    lecturer: RefWire,
    #[serde(default, alias = "courseId")]
    course: Option<RefWire>,
    #[serde(default)]
    user: Option<RefWire>,
    #[serde(default)]
    clarity: u8,
    #[serde(default)]
    responsiveness: u8,
    #[serde(default)]
    availability: u8,
    #[serde(default)]
    organization: u8,
    #[serde(default)]
    knowledge: u8,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    is_anonymous: bool,
    #[serde(default)]
    created_at: Option<String>,
}

impl<'de> Deserialize<'de> for LecturerReview {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = LecturerReviewWire::deserialize(deserializer)?;
        Ok(LecturerReview {
            id: wire.id,
            lecturer: wire.lecturer.into(),
            course: wire.course.map(NamedRef::from),
            user: wire.user.map(NamedRef::from),
            ratings: LecturerRatings {
                clarity: wire.clarity,
                responsiveness: wire.responsiveness,
                availability: wire.availability,
                organization: wire.organization,
                knowledge: wire.knowledge,
            },
            comment: wire.comment.unwrap_or_default(),
            is_anonymous: wire.is_anonymous,
            created_at: wire.created_at,
        })
    }
}

impl LecturerReview {
    pub fn display_name(&self) -> &str {
        display_name(self.is_anonymous, self.user.as_ref())
    }
}

impl Identified for LecturerReview {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Rated<LecturerRatingField> for LecturerReview {
    fn rating(&self, field: LecturerRatingField) -> u8 {
        match field {
            LecturerRatingField::Clarity => self.ratings.clarity,
            LecturerRatingField::Responsiveness => self.ratings.responsiveness,
            LecturerRatingField::Availability => self.ratings.availability,
            LecturerRatingField::Organization => self.ratings.organization,
            LecturerRatingField::Knowledge => self.ratings.knowledge,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturerReviewFields {
    #[serde(rename = "lecturer")]
    pub lecturer_id: String,
    #[serde(rename = "course", skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(flatten)]
    pub ratings: LecturerRatings,
    pub comment: String,
    pub is_anonymous: bool,
}

impl LecturerReviewFields {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.lecturer_id.is_empty() {
            return Err(ApiError::Validation("יש לבחור מרצה".to_string()));
        }
        self.ratings.validate()
    }
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedCourse {
    #[serde(alias = "_id")]
    pub id: String,
    pub course: Course,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Identified for TrackedCourse {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedLecturer {
    #[serde(alias = "_id")]
    pub id: String,
    pub lecturer: Lecturer,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Identified for TrackedLecturer {
    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Contact requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    Pending,
    InProgress,
    Answered,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Pending => "pending",
            ContactStatus::InProgress => "in_progress",
            ContactStatus::Answered => "answered",
        }
    }

    /// Whether the request still awaits an answer.
    pub fn is_open(&self) -> bool {
        !matches!(self, ContactStatus::Answered)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub id: String,
    pub user: Option<NamedRef>,
    pub subject: String,
    pub category: Option<String>,
    pub description: String,
    pub status: ContactStatus,
    pub admin_response: Option<String>,
    pub responded_by: Option<NamedRef>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub responded_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactRequestWire {
    #[serde(alias = "_id")]
    id: String,
    #[serde(default, alias = "requester")]
    user: Option<RefWire>,
    #[serde(default)]
    subject: String,
    #[serde(default, alias = "type")]
    category: Option<String>,
    #[serde(default, alias = "message")]
    description: String,
    #[serde(default)]
    status: ContactStatus,
    #[serde(default)]
    admin_response: Option<String>,
    #[serde(default)]
    responded_by: Option<RefWire>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    responded_at: Option<String>,
}

impl<'de> Deserialize<'de> for ContactRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ContactRequestWire::deserialize(deserializer)?;
        Ok(ContactRequest {
            id: wire.id,
            user: wire.user.map(NamedRef::from),
            subject: wire.subject,
            category: wire.category,
            description: wire.description,
            status: wire.status,
            admin_response: wire.admin_response.filter(|response| !response.trim().is_empty()),
            responded_by: wire.responded_by.map(NamedRef::from),
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            responded_at: wire.responded_at,
        })
    }
}

impl Identified for ContactRequest {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactRequest {
    pub subject: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub description: String,
}

impl NewContactRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.subject.trim().is_empty() {
            return Err(ApiError::Validation("יש להזין נושא לפנייה".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(ApiError::Validation("יש להזין תיאור לפנייה".to_string()));
        }
        Ok(())
    }
}

/// Administrator update of a contact request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestUpdate {
    pub status: ContactStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_response: Option<String>,
}

impl ContactRequestUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let has_response = self
            .admin_response
            .as_deref()
            .is_some_and(|response| !response.trim().is_empty());
        if self.status == ContactStatus::Answered && !has_response {
            return Err(ApiError::Validation("יש להזין תשובה לפני סימון הפנייה כנענתה".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ContactRequestFilter {
    pub status: Option<ContactStatus>,
}

impl ContactRequestFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.status
            .map(|status| vec![("status", status.as_str().to_string())])
            .unwrap_or_default()
    }
}
