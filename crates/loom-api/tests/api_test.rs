use axum::http::StatusCode;
use axum::response::IntoResponse;

use loom_api::error::ApiError;
use loom_chat::ChatError;
use loom_llm::LlmError;
use loom_persist::StoreError;

#[test]
fn empty_content_maps_to_bad_request() {
    let error: ApiError = ChatError::EmptyContent.into();
    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error.error_code(), "validation_error");
}

#[test]
fn malformed_id_maps_to_bad_request() {
    let error: ApiError = StoreError::InvalidId("nope".to_string()).into();
    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error.error_code(), "validation_error");
}

#[test]
fn missing_thread_maps_to_not_found() {
    let error: ApiError = StoreError::ThreadNotFound("abc".to_string()).into();
    assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(error.error_code(), "not_found");
}

#[test]
fn completion_failure_maps_to_bad_gateway() {
    let upstream = LlmError::Api {
        status: 500,
        message: "provider exploded".to_string(),
    };
    let error: ApiError = ChatError::Completion(upstream).into();
    assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
    assert_eq!(error.error_code(), "upstream_error");
}

#[test]
fn store_failure_maps_to_internal_error() {
    let error: ApiError = StoreError::Internal("broken".to_string()).into();
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.error_code(), "internal_error");
}

#[test]
fn response_status_matches_error() {
    let error: ApiError = ChatError::EmptyContent.into();
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
