use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::Error,
    model::User,
    reading::{ScrollMetrics, ScrollOutcome},
    state::SharedAppState,
};

use super::chapters::ChapterPath;

#[derive(Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

#[derive(Deserialize, Debug)]
pub struct SessionPath {
    pub session_id: Uuid,
}

/// Opens a read session for the chapter the reader just opened.
#[tracing::instrument(name = "[POST] novels/{novel_id}/chapters/{chapter_id}/sessions", skip_all, fields(user_id = user.id, novel_id = path.novel_id, chapter_id = path.chapter_id))]
pub async fn mount(
    Extension(user): Extension<Arc<User>>,
    State(app_state): State<SharedAppState>,
    Path(path): Path<ChapterPath>,
) -> Result<(StatusCode, Json<SessionResponse>), Error> {
    let session = app_state
        .tracker
        .mount(user.id, path.novel_id, path.chapter_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: session.detach(),
        }),
    ))
}

/// The response never waits for the view and activity writes.
#[tracing::instrument(name = "[POST] reading/sessions/{session_id}/scroll", skip_all, fields(user_id = user.id, session_id = %path.session_id))]
pub async fn scroll(
    Extension(user): Extension<Arc<User>>,
    State(app_state): State<SharedAppState>,
    Path(path): Path<SessionPath>,
    Json(metrics): Json<ScrollMetrics>,
) -> Result<Json<ScrollOutcome>, Error> {
    metrics.validate().map_err(Error::Validation)?;

    let scrolled = app_state
        .tracker
        .scroll(path.session_id, user.id, &metrics)?;
    if scrolled.outcome.counted {
        tracing::info!("Chapter read to the end");
    }

    Ok(Json(scrolled.outcome))
}

#[tracing::instrument(name = "[DELETE] reading/sessions/{session_id}", skip_all, fields(user_id = user.id, session_id = %path.session_id))]
pub async fn unmount(
    Extension(user): Extension<Arc<User>>,
    State(app_state): State<SharedAppState>,
    Path(path): Path<SessionPath>,
) -> Result<StatusCode, Error> {
    app_state.tracker.unmount(path.session_id, user.id)?;

    Ok(StatusCode::NO_CONTENT)
}
