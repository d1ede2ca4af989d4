use std::time::Duration;

use axum::http::StatusCode;
use chrono::Utc;
use novelhub::{
    controllers::reading::SessionResponse,
    model::{Chapter, Novel},
    reading::ScrollOutcome,
};
use serde_json::json;

use crate::{AppStateTest, authorized_json_request, authorized_request, read_json};

async fn open_session(
    test_state: &AppStateTest,
    token: &str,
    novel: &Novel,
    chapter: &Chapter,
) -> SessionResponse {
    let response = test_state
        .generate_response(authorized_request(
            "POST",
            &format!("/novels/{}/chapters/{}/sessions", novel.id, chapter.id),
            token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    read_json(response).await
}

async fn send_scroll(
    test_state: &AppStateTest,
    token: &str,
    session: &SessionResponse,
    scroll_top: f64,
) -> (StatusCode, Option<ScrollOutcome>) {
    let response = test_state
        .generate_response(authorized_json_request(
            "POST",
            &format!("/reading/sessions/{}/scroll", session.session_id),
            token,
            &json!({
                "scroll_top": scroll_top,
                "client_height": 300.0,
                "scroll_height": 800.0,
            }),
        ))
        .await;

    let status = response.status();
    if status == StatusCode::OK {
        (status, Some(read_json(response).await))
    } else {
        (status, None)
    }
}

/// The scroll response does not wait for the writes, so poll until they land.
async fn wait_for_chapter_views(test_state: &AppStateTest, chapter: &Chapter, views: i64) -> i64 {
    let mut current = 0;
    for _ in 0..100 {
        current = test_state
            .store()
            .get_chapter(chapter.novel_id, chapter.id)
            .await
            .unwrap()
            .views;
        if current >= views {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    current
}

#[tokio::test]
async fn should_count_a_read_once_per_session() {
    let test_state = AppStateTest::new();
    let (user, token) = test_state.generate_jwt_with_user().await;
    let novel = test_state.insert_novel(&user).await;
    let chapter = test_state.insert_chapter(&novel).await;

    let session = open_session(&test_state, &token, &novel, &chapter).await;

    let (_, outcome) = send_scroll(&test_state, &token, &session, 100.0).await;
    assert_eq!(
        outcome,
        Some(ScrollOutcome {
            reached_bottom: false,
            counted: false,
        })
    );

    let (_, outcome) = send_scroll(&test_state, &token, &session, 500.0).await;
    assert_eq!(
        outcome,
        Some(ScrollOutcome {
            reached_bottom: true,
            counted: true,
        })
    );

    for scroll_top in [500.0, 200.0, 500.0] {
        let (_, outcome) = send_scroll(&test_state, &token, &session, scroll_top).await;
        assert_eq!(
            outcome,
            Some(ScrollOutcome {
                reached_bottom: true,
                counted: false,
            })
        );
    }

    assert_eq!(wait_for_chapter_views(&test_state, &chapter, 1).await, 1);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let stored = test_state
        .store()
        .get_chapter(novel.id, chapter.id)
        .await
        .unwrap();
    assert_eq!(stored.views, 1);
    assert_eq!(test_state.store().get_novel(novel.id).await.unwrap().views, 1);

    let today = Utc::now().date_naive();
    let activity = test_state.store().get_activity(user.id, today).await.unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].chapters_read, 1);
}

#[tokio::test]
async fn should_count_again_after_reopening_the_chapter() {
    let test_state = AppStateTest::new();
    let (user, token) = test_state.generate_jwt_with_user().await;
    let novel = test_state.insert_novel(&user).await;
    let chapter = test_state.insert_chapter(&novel).await;

    for _ in 0..2 {
        let session = open_session(&test_state, &token, &novel, &chapter).await;
        let (_, outcome) = send_scroll(&test_state, &token, &session, 500.0).await;
        assert!(outcome.unwrap().counted);

        let response = test_state
            .generate_response(authorized_request(
                "DELETE",
                &format!("/reading/sessions/{}", session.session_id),
                &token,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    assert_eq!(wait_for_chapter_views(&test_state, &chapter, 2).await, 2);
}

#[tokio::test]
async fn should_not_scroll_a_closed_session() {
    let test_state = AppStateTest::new();
    let (user, token) = test_state.generate_jwt_with_user().await;
    let novel = test_state.insert_novel(&user).await;
    let chapter = test_state.insert_chapter(&novel).await;

    let session = open_session(&test_state, &token, &novel, &chapter).await;
    let response = test_state
        .generate_response(authorized_request(
            "DELETE",
            &format!("/reading/sessions/{}", session.session_id),
            &token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = send_scroll(&test_state, &token, &session, 500.0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_hide_sessions_of_other_readers() {
    let test_state = AppStateTest::new();
    let (user, token) = test_state.generate_jwt_with_user().await;
    let (_, other_token) = test_state.generate_jwt_with_user().await;
    let novel = test_state.insert_novel(&user).await;
    let chapter = test_state.insert_chapter(&novel).await;

    let session = open_session(&test_state, &token, &novel, &chapter).await;

    let (status, _) = send_scroll(&test_state, &other_token, &session, 500.0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, outcome) = send_scroll(&test_state, &token, &session, 500.0).await;
    assert!(outcome.unwrap().counted);
}

#[tokio::test]
async fn should_be_not_found_when_chapter_is_missing() {
    let test_state = AppStateTest::new();
    let (user, token) = test_state.generate_jwt_with_user().await;
    let novel = test_state.insert_novel(&user).await;

    let response = test_state
        .generate_response(authorized_request(
            "POST",
            &format!("/novels/{}/chapters/999/sessions", novel.id),
            &token,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(test_state.app_state.tracker.active_sessions(), 0);
}

#[tokio::test]
async fn should_reject_invalid_scroll_metrics() {
    let test_state = AppStateTest::new();
    let (user, token) = test_state.generate_jwt_with_user().await;
    let novel = test_state.insert_novel(&user).await;
    let chapter = test_state.insert_chapter(&novel).await;

    let session = open_session(&test_state, &token, &novel, &chapter).await;

    let (status, _) = send_scroll(&test_state, &token, &session, -10.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
