use course4me::api::http::HttpApi;
use course4me::api::{ApiError, CourseApi};
use course4me::constants::{ERROR_IN_FLIGHT, ERROR_NETWORK, ERROR_REQUEST_FAILED, ERROR_SERVER, ERROR_UNAUTHORIZED};
use course4me::sync::SyncError;

#[test]
fn test_server_errors_are_classified_by_status() {
    let error = ApiError::from_response(503, r#"{"message":"db down"}"#);
    assert_eq!(error, ApiError::Server { status: 503 });
    assert_eq!(error.status(), Some(503));
    assert_eq!(error.user_message(), ERROR_SERVER);
}

#[test]
fn test_client_error_message_comes_from_body() {
    let error = ApiError::from_response(400, r#"{"message":"כבר כתבת ביקורת על הקורס הזה"}"#);
    assert_eq!(error.user_message(), "כבר כתבת ביקורת על הקורס הזה");
    assert_eq!(error.status(), Some(400));

    let error = ApiError::from_response(409, r#"{"error":"Already tracking"}"#);
    assert_eq!(error.user_message(), "Already tracking");
}

#[test]
fn test_client_error_without_message_uses_generic_text() {
    for body in ["", "not json", r#"{"message":"  "}"#, r#"{"other":1}"#] {
        let error = ApiError::from_response(404, body);
        assert_eq!(
            error,
            ApiError::Client {
                status: 404,
                message: None
            }
        );
        assert_eq!(error.user_message(), ERROR_REQUEST_FAILED);
    }
}

#[test]
fn test_transport_and_auth_messages() {
    let network = ApiError::Network("connection refused".to_string());
    assert_eq!(network.status(), None);
    assert_eq!(network.user_message(), ERROR_NETWORK);

    assert_eq!(ApiError::Decode("eof".to_string()).user_message(), ERROR_SERVER);
    assert_eq!(ApiError::Unauthorized.user_message(), ERROR_UNAUTHORIZED);
    assert_eq!(ApiError::Validation("שדה חסר".to_string()).user_message(), "שדה חסר");
}

#[test]
fn test_sync_error_messages() {
    assert_eq!(SyncError::InFlight.user_message(), ERROR_IN_FLIGHT);

    let wrapped: SyncError = ApiError::Server { status: 500 }.into();
    assert_eq!(wrapped.user_message(), ERROR_SERVER);
    assert_eq!(wrapped.to_string(), "Server error (500)");
}

#[test]
fn test_endpoint_joins_paths() {
    let api = HttpApi::new("https://course4me.example.org/", None).unwrap();
    assert_eq!(
        api.endpoint(&["api", "courses"]).as_str(),
        "https://course4me.example.org/api/courses"
    );
    assert_eq!(
        api.endpoint(&["api", "reviews", "course", "c1"]).as_str(),
        "https://course4me.example.org/api/reviews/course/c1"
    );
    assert!(!api.has_token());

    let api = HttpApi::new("https://example.org/course4me", None).unwrap();
    assert_eq!(
        api.endpoint(&["api", "departments"]).as_str(),
        "https://example.org/course4me/api/departments"
    );

    let api = HttpApi::new("http://localhost:5000", Some(String::new())).unwrap();
    assert!(!api.has_token());
}

#[test]
fn test_ids_cannot_change_the_route() {
    let api = HttpApi::new("http://localhost:5000", None).unwrap();

    let url = api.endpoint(&["api", "courses", "c1/../../admin?all=1#x"]);
    assert_eq!(url.path_segments().unwrap().count(), 3);
    assert_eq!(url.query(), None);
    assert_eq!(url.fragment(), None);
    assert_eq!(url.as_str(), "http://localhost:5000/api/courses/c1%2F..%2F..%2Fadmin%3Fall=1%23x");
}

#[test]
fn test_invalid_base_url_is_rejected() {
    assert!(matches!(HttpApi::new("not a url", None), Err(ApiError::Validation(_))));
    assert!(matches!(HttpApi::new("mailto:admin@example.org", None), Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn test_authenticated_calls_fail_fast_without_token() {
    // Nothing listens on this port; the call must not get that far
    let api = HttpApi::new("http://127.0.0.1:9", None).unwrap();

    assert_eq!(api.fetch_tracked_courses().await, Err(ApiError::Unauthorized));
    assert_eq!(api.delete_course("c1").await, Err(ApiError::Unauthorized));
    assert_eq!(api.untrack_lecturer("t1").await, Err(ApiError::Unauthorized));
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let api = HttpApi::new("http://127.0.0.1:9", None).unwrap();

    let result = api.fetch_departments().await;
    assert!(matches!(result, Err(ApiError::Network(_))), "got {result:?}");
}
