use course4me::api::models::{
    ContactRequest, ContactRequestFilter, ContactRequestUpdate, ContactStatus, Course, CourseFields, CourseReview,
    CourseReviewFields, Lecturer, LecturerFields, LecturerReview, NewContactRequest, TrackedCourse,
};
use course4me::api::ApiError;
use course4me::constants::{ANONYMOUS_USER, UNKNOWN_USER};
use serde_json::json;

#[test]
fn test_course_with_embedded_references() {
    let course: Course = serde_json::from_value(json!({
        "_id": "c1",
        "title": "מבני נתונים",
        "courseNumber": "20407",
        "credits": 4,
        "departments": [{"_id": "cs", "name": "מדעי המחשב"}, "math"],
        "prerequisites": ["מבוא למדעי המחשב", " "],
        "lecturers": [{"_id": "l1", "name": "ד\"ר כהן"}]
    }))
    .unwrap();

    assert_eq!(course.id, "c1");
    assert_eq!(course.credits, Some(4.0));
    assert_eq!(course.departments.len(), 2);
    assert_eq!(course.departments[0].name, "מדעי המחשב");
    assert_eq!(course.departments[1].id, "math");
    assert_eq!(course.prerequisites, vec!["מבוא למדעי המחשב"]);
    assert_eq!(course.lecturers[0].id, "l1");
}

#[test]
fn test_course_legacy_department_string() {
    let course: Course = serde_json::from_value(json!({
        "id": "c2",
        "title": "אלגברה",
        "courseNumber": "20109",
        "credits": "3.5",
        "department": "מתמטיקה, מדעי המחשב",
        "prerequisites": "חשבון א, חשבון ב"
    }))
    .unwrap();

    let names: Vec<&str> = course.departments.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["מתמטיקה", "מדעי המחשב"]);
    assert_eq!(course.credits, Some(3.5));
    assert_eq!(course.prerequisites, vec!["חשבון א", "חשבון ב"]);
    assert!(course.lecturers.is_empty());
}

#[test]
fn test_plural_departments_win_over_legacy() {
    let course: Course = serde_json::from_value(json!({
        "_id": "c3",
        "departments": [],
        "department": "פיזיקה"
    }))
    .unwrap();
    assert_eq!(course.departments.len(), 1);
    assert_eq!(course.departments[0].name, "פיזיקה");

    let course: Course = serde_json::from_value(json!({
        "_id": "c4",
        "departments": ["cs"],
        "department": "פיזיקה"
    }))
    .unwrap();
    assert_eq!(course.departments.len(), 1);
    assert_eq!(course.departments[0].id, "cs");
}

#[test]
fn test_normalized_course_reads_back() {
    let course: Course = serde_json::from_value(json!({
        "_id": "c5",
        "title": "רשתות",
        "department": "מדעי המחשב",
        "prerequisites": "מערכות הפעלה"
    }))
    .unwrap();

    let reread: Course = serde_json::from_value(serde_json::to_value(&course).unwrap()).unwrap();
    assert_eq!(reread, course);
}

#[test]
fn test_course_fields_wire_shape() {
    let fields = CourseFields {
        title: "קומפילציה".to_string(),
        course_number: "20364".to_string(),
        department_ids: vec!["cs".to_string()],
        prerequisites: vec!["אוטומטים".to_string(), "מבני נתונים".to_string()],
        ..CourseFields::default()
    };

    let value = serde_json::to_value(&fields).unwrap();
    assert_eq!(value["courseNumber"], "20364");
    assert_eq!(value["departments"], json!(["cs"]));
    assert_eq!(value["prerequisites"], "אוטומטים, מבני נתונים");
    assert!(value.get("credits").is_none());

    assert!(fields.validate().is_ok());
    let missing_title = CourseFields {
        title: "  ".to_string(),
        ..fields
    };
    assert!(matches!(missing_title.validate(), Err(ApiError::Validation(_))));
}

#[test]
fn test_lecturer_fields_require_department() {
    let fields = LecturerFields {
        name: "ד\"ר לוי".to_string(),
        ..LecturerFields::default()
    };
    assert!(fields.validate().is_err());

    let lecturer: Lecturer = serde_json::from_value(json!({
        "_id": "l1",
        "name": "ד\"ר לוי",
        "department": "מדעי המחשב"
    }))
    .unwrap();
    assert_eq!(lecturer.departments[0].name, "מדעי המחשב");
}

#[test]
fn test_is_anonymous_coercion() {
    let cases = [
        (json!(true), true),
        (json!(false), false),
        (json!(1), true),
        (json!(0), false),
        (json!("true"), true),
        (json!("false"), false),
        (json!(null), false),
    ];

    for (raw, expected) in cases {
        let review: CourseReview = serde_json::from_value(json!({
            "_id": "r1",
            "course": "c1",
            "interest": 4,
            "difficulty": 3,
            "workload": 3,
            "teachingQuality": 4,
            "recommendation": 5,
            "isAnonymous": raw
        }))
        .unwrap();
        assert_eq!(review.is_anonymous, expected, "isAnonymous = {raw}");
    }
}

#[test]
fn test_review_display_name() {
    let review: CourseReview = serde_json::from_value(json!({
        "_id": "r1",
        "courseId": {"_id": "c1", "title": "ignored"},
        "user": {"_id": "u1", "fullName": "דנה כהן"},
        "interest": 5,
        "difficulty": 2,
        "workload": 2,
        "teachingQuality": 5,
        "investment": 4,
        "isAnonymous": "1"
    }))
    .unwrap();

    assert_eq!(review.course.id, "c1");
    assert_eq!(review.ratings.recommendation, 4);
    assert_eq!(review.display_name(), ANONYMOUS_USER);

    let named = CourseReview {
        is_anonymous: false,
        ..review.clone()
    };
    assert_eq!(named.display_name(), "דנה כהן");

    let unknown = CourseReview {
        is_anonymous: false,
        user: None,
        ..review
    };
    assert_eq!(unknown.display_name(), UNKNOWN_USER);
}

#[test]
fn test_lecturer_review_with_bare_ids() {
    let review: LecturerReview = serde_json::from_value(json!({
        "_id": "lr1",
        "lecturer": "l1",
        "course": "c1",
        "clarity": 5,
        "responsiveness": 4,
        "availability": 3,
        "organization": 4,
        "knowledge": 5,
        "isAnonymous": 0
    }))
    .unwrap();

    assert_eq!(review.lecturer.id, "l1");
    assert_eq!(review.course.as_ref().map(|c| c.id.as_str()), Some("c1"));
    assert_eq!(review.ratings.availability, 3);
    assert!(!review.is_anonymous);
}

#[test]
fn test_review_fields_validation_and_shape() {
    let mut fields = CourseReviewFields {
        course_id: "c1".to_string(),
        ..CourseReviewFields::default()
    };
    assert!(matches!(fields.validate(), Err(ApiError::Validation(_))));

    fields.ratings.interest = 5;
    fields.ratings.difficulty = 3;
    fields.ratings.workload = 2;
    fields.ratings.teaching_quality = 4;
    fields.ratings.recommendation = 4;
    assert!(fields.validate().is_ok());

    let value = serde_json::to_value(&fields).unwrap();
    assert_eq!(value["course"], "c1");
    assert_eq!(value["teachingQuality"], 4);
    assert_eq!(value["isAnonymous"], false);
    assert!(value.get("lecturer").is_none());

    fields.ratings.workload = 6;
    assert!(fields.validate().is_err());
}

#[test]
fn test_tracked_course_embeds_normalized_course() {
    let tracked: TrackedCourse = serde_json::from_value(json!({
        "_id": "t1",
        "course": {"_id": "c1", "title": "מבני נתונים", "department": "מדעי המחשב"},
        "createdAt": "2025-01-15T14:30:00.000Z"
    }))
    .unwrap();

    assert_eq!(tracked.id, "t1");
    assert_eq!(tracked.course.departments[0].name, "מדעי המחשב");
}

#[test]
fn test_contact_request_shapes() {
    let request: ContactRequest = serde_json::from_value(json!({
        "_id": "cr1",
        "subject": "בעיה בהתחברות",
        "type": "technical",
        "message": "לא מצליח להתחבר",
        "status": "in_progress",
        "adminResponse": ""
    }))
    .unwrap();

    assert_eq!(request.category.as_deref(), Some("technical"));
    assert_eq!(request.description, "לא מצליח להתחבר");
    assert_eq!(request.status, ContactStatus::InProgress);
    assert!(request.status.is_open());
    assert_eq!(request.admin_response, None);

    let new_request = NewContactRequest {
        subject: "הצעה".to_string(),
        category: Some("feature".to_string()),
        description: "להוסיף מצב לילה".to_string(),
    };
    let value = serde_json::to_value(&new_request).unwrap();
    assert_eq!(value["type"], "feature");
    assert!(new_request.validate().is_ok());

    let filter = ContactRequestFilter {
        status: Some(ContactStatus::Answered),
    };
    assert_eq!(filter.query_pairs(), vec![("status", "answered".to_string())]);
}

#[test]
fn test_answer_requires_response() {
    let update = ContactRequestUpdate {
        status: ContactStatus::Answered,
        admin_response: Some("   ".to_string()),
    };
    assert!(update.validate().is_err());

    let update = ContactRequestUpdate {
        status: ContactStatus::InProgress,
        admin_response: None,
    };
    assert!(update.validate().is_ok());
}
