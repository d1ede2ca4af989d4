use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use validator::{Validate, ValidationErrors};

use crate::{
    auth::error::AuthError,
    error::Error,
    model::{
        LeadingCharacter, MAX_NOVEL_GENRES, Novel, NovelDetail, NovelInput, User, is_known_genre,
    },
    state::SharedAppState,
};

use super::validation::{check_genres, check_length, into_result};

const DEFAULT_LIMIT: i64 = 10;

/// Genre value that lists every novel.
const ALL_GENRES: &str = "All";

#[derive(Deserialize, Debug, Validate)]
pub struct ListQuery {
    genre: Option<String>,

    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    #[validate(range(min = 1, max = 50))]
    limit: Option<i64>,
}

impl ListQuery {
    fn genre_filter(&self) -> Result<Option<&str>, Error> {
        match self.genre.as_deref() {
            None | Some(ALL_GENRES) => Ok(None),
            Some(genre) if is_known_genre(genre) => Ok(Some(genre)),
            Some(_) => {
                let mut errors = ValidationErrors::new();
                errors.add(
                    "genre",
                    validator::ValidationError::new("genre_unknown")
                        .with_message("Unknown genre".into()),
                );
                Err(Error::Validation(errors))
            }
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct NovelRequest {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub leading_character: LeadingCharacter,
    pub story: String,
}

impl Validate for NovelRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_length(&mut errors, "title", self.title.trim(), 1, 200);
        check_length(&mut errors, "author", self.author.trim(), 1, 100);
        check_length(&mut errors, "story", self.story.trim(), 1, 5000);
        check_genres(&mut errors, "genres", &self.genres, Some(MAX_NOVEL_GENRES));

        into_result(errors)
    }
}

impl From<NovelRequest> for NovelInput {
    fn from(request: NovelRequest) -> Self {
        NovelInput {
            title: request.title.trim().to_string(),
            author: request.author.trim().to_string(),
            genres: request.genres,
            leading_character: request.leading_character,
            story: request.story.trim().to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct NovelPath {
    pub novel_id: i64,
}

/// Loads the novel and checks that `user` uploaded it.
pub(super) async fn owned_novel(
    app_state: &SharedAppState,
    user: &User,
    novel_id: i64,
) -> Result<Novel, Error> {
    let novel = app_state.store.get_novel(novel_id).await?;
    if novel.upload_by != user.id {
        return Err(Error::Auth(AuthError::Forbidden));
    }

    Ok(novel)
}

#[tracing::instrument(name = "[GET] novels", skip_all, fields(genre = ?query.genre, limit = ?query.limit))]
pub async fn index(
    State(app_state): State<SharedAppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Novel>>, Error> {
    query.validate().map_err(Error::Validation)?;

    let genre = query.genre_filter()?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let result = app_state.store.list_popular_novels(genre, limit).await?;

    Ok(Json(result))
}

#[tracing::instrument(name = "[GET] novels/{novel_id}", skip_all, fields(novel_id = path.novel_id))]
pub async fn show(
    State(app_state): State<SharedAppState>,
    Path(path): Path<NovelPath>,
) -> Result<Json<NovelDetail>, Error> {
    let novel = app_state.store.get_novel(path.novel_id).await?;
    let chapters = app_state.store.list_chapters(novel.id).await?;

    Ok(Json(NovelDetail { novel, chapters }))
}

#[tracing::instrument(name = "[POST] novels", skip_all, fields(user_id = user.id))]
pub async fn store(
    Extension(user): Extension<Arc<User>>,
    State(app_state): State<SharedAppState>,
    Json(request): Json<NovelRequest>,
) -> Result<(StatusCode, Json<Novel>), Error> {
    request.validate().map_err(Error::Validation)?;

    let novel = app_state
        .store
        .create_novel(user.id, &NovelInput::from(request))
        .await?;
    tracing::info!(novel_id = novel.id, "Created novel");

    Ok((StatusCode::CREATED, Json(novel)))
}

#[tracing::instrument(name = "[PUT] novels/{novel_id}", skip_all, fields(user_id = user.id, novel_id = path.novel_id))]
pub async fn update(
    Extension(user): Extension<Arc<User>>,
    State(app_state): State<SharedAppState>,
    Path(path): Path<NovelPath>,
    Json(request): Json<NovelRequest>,
) -> Result<Json<Novel>, Error> {
    owned_novel(&app_state, &user, path.novel_id).await?;
    request.validate().map_err(Error::Validation)?;

    let novel = app_state
        .store
        .update_novel(path.novel_id, &NovelInput::from(request))
        .await?;

    Ok(Json(novel))
}
