use axum::{
    body::Body,
    http::{self, Request, StatusCode},
};
use http_body_util::BodyExt;
use novelhub::{auth::decode_jwt, config::Config, controllers::auth::AuthResponse};
use serde::Serialize;
use serde_json::json;

use crate::{AppStateTest, read_json};

#[derive(Serialize)]
struct PartialAuthRequest {
    email: String,
}

#[derive(Serialize)]
struct AuthRequest {
    email: String,
    password: String,
}

fn auth_request(body: &impl Serialize) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn should_be_error_when_body_is_missing() {
    let test_state = AppStateTest::new();

    let request = Request::builder()
        .method("POST")
        .uri("/auth")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_be_error_when_body_is_invalid() {
    let test_state = AppStateTest::new();

    // -----------------------------------------------------------------------
    let response = test_state
        .generate_response(auth_request(&json!(PartialAuthRequest {
            email: "test@localhost".to_string()
        })))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // -----------------------------------------------------------------------
    let response = test_state
        .generate_response(auth_request(&AuthRequest {
            email: "a".to_string(),
            password: "pass".to_string(),
        }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // -----------------------------------------------------------------------
    let response = test_state
        .generate_response(auth_request(&AuthRequest {
            email: "reader@localhost".to_string(),
            password: "this-password-length-should-be-over-32-characters-to-trigger-error"
                .to_string(),
        }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_be_error_when_has_incorrect_type() {
    let test_state = AppStateTest::new();

    let request = Request::builder()
        .method("POST")
        .uri("/auth")
        .body(Body::from(
            serde_json::to_vec(&AuthRequest {
                email: "test@localhost".to_string(),
                password: "password".to_string(),
            })
            .unwrap(),
        ))
        .unwrap();

    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn should_be_error_when_credential_is_invalid() {
    let test_state = AppStateTest::new();

    let (user, _) = test_state.generate_jwt_with_user().await;

    let response = test_state
        .generate_response(auth_request(&AuthRequest {
            email: user.email,
            password: "incorrect-password".to_string(),
        }))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_be_ok_when_user_is_exist() {
    let test_state = AppStateTest::new();

    let (user, _) = test_state.generate_jwt_with_user().await;

    let response = test_state
        .generate_response(auth_request(&AuthRequest {
            email: user.email.clone(),
            password: "password".to_string(),
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let result: AuthResponse = read_json(response).await;
    let claims = decode_jwt(&result.token, &test_state.app_state.config.jwt)
        .unwrap()
        .claims;
    assert_eq!(claims.user_id, user.id);
}

#[tokio::test]
async fn should_be_create_user_when_user_is_missing() {
    let test_state = AppStateTest::new();

    let found = test_state
        .store()
        .find_user_by_email("test@localhost")
        .await
        .unwrap();
    assert!(found.is_none());

    let response = test_state
        .generate_response(auth_request(&AuthRequest {
            email: "test@localhost".to_string(),
            password: "password".to_string(),
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let found = test_state
        .store()
        .find_user_by_email("test@localhost")
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn should_be_error_when_user_is_missing_and_registration_is_disabled() {
    let mut config = Config::new().unwrap();
    config.application.allow_registration = false;

    let test_state = AppStateTest::new_with_config(config);

    let response = test_state
        .generate_response(auth_request(&AuthRequest {
            email: "test@localhost".to_string(),
            password: "password".to_string(),
        }))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response_body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(response_body.is_empty());

    let found = test_state
        .store()
        .find_user_by_email("test@localhost")
        .await
        .unwrap();
    assert!(found.is_none());
}
