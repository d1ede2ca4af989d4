use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use novelhub::auth::encode_jwt;

use crate::{AppStateTest, authorized_request};

#[tokio::test]
async fn should_throw_error_when_request_does_not_contain_header_authorization() {
    let test_state = AppStateTest::new();

    let request = Request::builder().uri("/me").body(Body::empty()).unwrap();

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_throw_error_when_auth_header_is_invalid() {
    let test_state = AppStateTest::new();

    let request = Request::builder()
        .uri("/me")
        .header(axum::http::header::AUTHORIZATION, "random-string")
        .body(Body::empty())
        .unwrap();

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_throw_error_when_auth_header_does_not_contain_bearer() {
    let test_state = AppStateTest::new();

    let request = Request::builder()
        .uri("/me")
        .header(
            axum::http::header::AUTHORIZATION,
            "not-bearer random-string",
        )
        .body(Body::empty())
        .unwrap();

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_throw_error_when_jwt_token_is_invalid() {
    let test_state = AppStateTest::new();

    let request = authorized_request("GET", "/me", "random-string");

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_throw_error_when_user_is_missing() {
    let test_state = AppStateTest::new();

    let token = encode_jwt(1000, &test_state.app_state.config.jwt).unwrap();

    let response = test_state
        .generate_response(authorized_request("GET", "/me", &token))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_guard_writes_on_public_paths() {
    let test_state = AppStateTest::new();
    let (user, _) = test_state.generate_jwt_with_user().await;
    let novel = test_state.insert_novel(&user).await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/novels/{}", novel.id))
        .body(Body::empty())
        .unwrap();
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/novels/{}", novel.id))
        .body(Body::empty())
        .unwrap();
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_be_ok_when_user_is_exist() {
    let test_state = AppStateTest::new();

    let (_, token) = test_state.generate_jwt_with_user().await;

    let response = test_state
        .generate_response(authorized_request("GET", "/me", &token))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}
