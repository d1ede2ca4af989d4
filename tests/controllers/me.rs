use axum::http::StatusCode;
use chrono::{Days, Utc};
use novelhub::model::{AuthoredNovel, User};
use serde_json::{Value, json};

use crate::{AppStateTest, authorized_json_request, authorized_request, read_json};

#[tokio::test]
async fn should_be_ok() {
    let test_state = AppStateTest::new();

    let (user, token) = test_state.generate_jwt_with_user().await;

    let response = test_state
        .generate_response(authorized_request("GET", "/me", &token))
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let user_result: User = read_json(response).await;

    assert_eq!(user.id, user_result.id);
    assert_eq!(user.email, user_result.email);
    assert_eq!(user_result.username, None);
}

#[tokio::test]
async fn should_update_profile() {
    let test_state = AppStateTest::new();
    let (user, token) = test_state.generate_jwt_with_user().await;

    let response = test_state
        .generate_response(authorized_json_request(
            "PUT",
            "/me",
            &token,
            &json!({
                "username": "  night reader ",
                "age": 27,
                "interested_genres": ["Fantasy", "Mystery"],
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated: User = read_json(response).await;
    assert_eq!(updated.id, user.id);
    assert_eq!(updated.username.as_deref(), Some("night reader"));
    assert_eq!(updated.age, Some(27));
    assert_eq!(updated.interested_genres, vec!["Fantasy", "Mystery"]);
}

#[tokio::test]
async fn should_reject_invalid_profile() {
    let test_state = AppStateTest::new();
    let (_, token) = test_state.generate_jwt_with_user().await;

    for body in [
        json!({ "username": "   " }),
        json!({ "username": "reader", "age": 0 }),
        json!({ "username": "reader", "interested_genres": ["Cooking"] }),
        json!({ "username": "reader", "interested_genres": ["Drama", "Drama"] }),
    ] {
        let response = test_state
            .generate_response(authorized_json_request("PUT", "/me", &token, &body))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
    }
}

#[tokio::test]
async fn should_list_seven_days_of_reading_stats() {
    let test_state = AppStateTest::new();
    let (user, token) = test_state.generate_jwt_with_user().await;

    let today = Utc::now().date_naive();
    let two_days_ago = today - Days::new(2);
    test_state
        .store()
        .upsert_daily_activity(user.id, two_days_ago, 3)
        .await
        .unwrap();
    test_state
        .store()
        .upsert_daily_activity(user.id, today - Days::new(10), 8)
        .await
        .unwrap();

    let response = test_state
        .generate_response(authorized_request("GET", "/me/stats", &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let series: Vec<Value> = read_json(response).await;
    assert_eq!(series.len(), 7);
    assert_eq!(series[6]["date"], today.to_string());
    assert_eq!(series[4]["date"], two_days_ago.to_string());
    assert_eq!(series[4]["reads"], 3);

    let total: i64 = series.iter().map(|b| b["reads"].as_i64().unwrap()).sum();
    assert_eq!(total, 3);
}

#[tokio::test]
async fn should_list_authored_novels_with_last_chapter() {
    let test_state = AppStateTest::new();
    let (user, token) = test_state.generate_jwt_with_user().await;
    let (other, _) = test_state.generate_jwt_with_user().await;

    let novel = test_state.insert_novel(&user).await;
    test_state.insert_chapter(&novel).await;
    test_state.insert_chapter(&novel).await;
    let empty = test_state.insert_novel(&user).await;
    test_state.insert_novel(&other).await;

    let response = test_state
        .generate_response(authorized_request("GET", "/me/novels", &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let novels: Vec<AuthoredNovel> = read_json(response).await;
    assert_eq!(novels.len(), 2);

    let written = novels.iter().find(|n| n.novel.id == novel.id).unwrap();
    assert_eq!(written.last_chapter_number, 2);
    let fresh = novels.iter().find(|n| n.novel.id == empty.id).unwrap();
    assert_eq!(fresh.last_chapter_number, 0);
}
