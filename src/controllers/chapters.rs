use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    error::Error,
    model::{Chapter, ChapterInput, User},
    state::SharedAppState,
};

use super::{
    novels::{NovelPath, owned_novel},
    validation::{check_length, into_result},
};

#[derive(Deserialize, Debug)]
pub struct ChapterRequest {
    pub title: String,
    pub content: String,
}

impl Validate for ChapterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_length(&mut errors, "title", self.title.trim(), 1, 200);
        if self.content.trim().is_empty() {
            errors.add(
                "content",
                ValidationError::new("length").with_message("Content must not be empty".into()),
            );
        }

        into_result(errors)
    }
}

impl From<ChapterRequest> for ChapterInput {
    fn from(request: ChapterRequest) -> Self {
        ChapterInput {
            title: request.title.trim().to_string(),
            content: request.content.trim().to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ChapterPath {
    pub novel_id: i64,
    pub chapter_id: i64,
}

#[tracing::instrument(name = "[GET] novels/{novel_id}/chapters/{chapter_id}", skip_all, fields(novel_id = path.novel_id, chapter_id = path.chapter_id))]
pub async fn show(
    State(app_state): State<SharedAppState>,
    Path(path): Path<ChapterPath>,
) -> Result<Json<Chapter>, Error> {
    let chapter = app_state
        .store
        .get_chapter(path.novel_id, path.chapter_id)
        .await?;

    Ok(Json(chapter))
}

#[tracing::instrument(name = "[POST] novels/{novel_id}/chapters", skip_all, fields(user_id = user.id, novel_id = path.novel_id))]
pub async fn store(
    Extension(user): Extension<Arc<User>>,
    State(app_state): State<SharedAppState>,
    Path(path): Path<NovelPath>,
    Json(request): Json<ChapterRequest>,
) -> Result<(StatusCode, Json<Chapter>), Error> {
    owned_novel(&app_state, &user, path.novel_id).await?;
    request.validate().map_err(Error::Validation)?;

    let chapter = app_state
        .store
        .add_chapter(path.novel_id, &ChapterInput::from(request))
        .await?;
    tracing::info!(
        chapter_id = chapter.id,
        chapter_number = chapter.chapter_number,
        "Added chapter"
    );

    Ok((StatusCode::CREATED, Json(chapter)))
}

#[tracing::instrument(name = "[PUT] novels/{novel_id}/chapters/{chapter_id}", skip_all, fields(user_id = user.id, novel_id = path.novel_id, chapter_id = path.chapter_id))]
pub async fn update(
    Extension(user): Extension<Arc<User>>,
    State(app_state): State<SharedAppState>,
    Path(path): Path<ChapterPath>,
    Json(request): Json<ChapterRequest>,
) -> Result<Json<Chapter>, Error> {
    owned_novel(&app_state, &user, path.novel_id).await?;
    request.validate().map_err(Error::Validation)?;

    let chapter = app_state
        .store
        .update_chapter(path.novel_id, path.chapter_id, &ChapterInput::from(request))
        .await?;

    Ok(Json(chapter))
}
