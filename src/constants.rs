//! Constants used throughout the client
//!
//! This module centralizes storage key names, cache windows and user-facing
//! text so that every list, listener and cache agrees on them.

// Persistent cache keys
pub const CACHE_KEY_COURSES: &str = "courses_data";
pub const CACHE_KEY_LECTURERS: &str = "lecturers_data";
pub const CACHE_KEY_DEPARTMENTS: &str = "departments_data";
pub const CACHE_KEY_TRACKED_COURSES: &str = "tracked_courses_data";
pub const CACHE_KEY_TRACKED_LECTURERS: &str = "tracked_lecturers_data";
pub const CACHE_KEY_CONTACT_REQUESTS: &str = "contact_requests_data";
pub const CACHE_KEY_DASHBOARD: &str = "dashboard_tracked_courses";

// Cross-context sentinel keys
pub const SENTINEL_COURSE_CHANGED: &str = "courseChanged";
pub const SENTINEL_LECTURER_CHANGED: &str = "lecturerChanged";
pub const SENTINEL_DEPARTMENT_CHANGED: &str = "departmentChanged";
pub const SENTINEL_REVIEW_CHANGED: &str = "reviewChanged";
pub const SENTINEL_LECTURER_REVIEW_CHANGED: &str = "lecturerReviewChanged";
pub const SENTINEL_TRACKED_COURSE_CHANGED: &str = "trackedCourseChanged";
pub const SENTINEL_TRACKED_LECTURER_CHANGED: &str = "trackedLecturerChanged";
pub const SENTINEL_CONTACT_REQUEST_CHANGED: &str = "contactRequestChanged";

// Session keys
pub const SESSION_KEY_TOKEN: &str = "token";
pub const SESSION_KEY_USER: &str = "user";
pub const SESSION_KEY_USER_ID: &str = "userId";
pub const SESSION_KEY_USER_FULL_NAME: &str = "userFullName";

// Cache windows
/// Validity window of list caches, in seconds
pub const DEFAULT_LIST_TTL_SECONDS: u64 = 300;
/// Window in which a just-written course entry is served without refetching
pub const DEFAULT_FRESH_WRITE_WINDOW_MS: u64 = 1000;
/// Upper bound accepted for `list_ttl_seconds`
pub const MAX_LIST_TTL_SECONDS: u64 = 86_400;
/// Upper bound accepted for `fresh_write_window_ms`
pub const MAX_FRESH_WRITE_WINDOW_MS: u64 = 60_000;

// Buffer sizes
pub const NOTIFICATION_CHANNEL_CAPACITY: usize = 256;
pub const LOG_BUFFER_CAPACITY: usize = 1000;

// User-facing messages
pub const ERROR_NETWORK: &str = "שגיאת תקשורת עם השרת. אנא נסה שוב מאוחר יותר";
pub const ERROR_SERVER: &str = "אירעה שגיאה בשרת. אנא נסה שוב מאוחר יותר";
pub const ERROR_REQUEST_FAILED: &str = "הבקשה נכשלה";
pub const ERROR_UNAUTHORIZED: &str = "יש להתחבר כדי לבצע פעולה זו";
pub const ERROR_IN_FLIGHT: &str = "הבקשה כבר נשלחה, אנא המתן";
pub const ANONYMOUS_USER: &str = "משתמש אנונימי";
pub const UNKNOWN_USER: &str = "משתמש";
pub const NOT_ENOUGH_REVIEWS: &str = "אין מספיק ביקורות";

// CLI messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const ERROR_NO_API_TOKEN: &str = "❌ Error: no API token found in the session or environment";
