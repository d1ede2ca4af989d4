use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    error::Error,
    model::{AuthoredNovel, ProfileUpdate, User},
    reading::DailySeries,
    state::SharedAppState,
};

use super::validation::{check_genres, check_length, into_result};

#[derive(Deserialize, Debug)]
pub struct ProfileRequest {
    pub username: String,
    pub age: Option<i32>,
    #[serde(default)]
    pub interested_genres: Vec<String>,
}

impl Validate for ProfileRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_length(&mut errors, "username", self.username.trim(), 1, 50);
        if let Some(age) = self.age {
            if !(1..=150).contains(&age) {
                errors.add(
                    "age",
                    ValidationError::new("range").with_message("Age must be between 1 and 150".into()),
                );
            }
        }
        check_genres(&mut errors, "interested_genres", &self.interested_genres, None);

        into_result(errors)
    }
}

#[tracing::instrument(name = "[GET] me", skip_all)]
pub async fn index(Extension(user): Extension<Arc<User>>) -> Result<Json<Arc<User>>, Error> {
    Ok(Json(user))
}

#[tracing::instrument(name = "[PUT] me", skip_all, fields(user_id = user.id))]
pub async fn update(
    Extension(user): Extension<Arc<User>>,
    State(app_state): State<SharedAppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<User>, Error> {
    request.validate().map_err(Error::Validation)?;

    let profile = ProfileUpdate {
        username: request.username.trim().to_string(),
        age: request.age,
        interested_genres: request.interested_genres,
    };
    let result = app_state.store.update_profile(user.id, &profile).await?;

    Ok(Json(result))
}

/// Chapters read per day over the last week, for the profile chart.
#[tracing::instrument(name = "[GET] me/stats", skip_all, fields(user_id = user.id))]
pub async fn stats(
    Extension(user): Extension<Arc<User>>,
    State(app_state): State<SharedAppState>,
) -> Result<Json<DailySeries>, Error> {
    let series = app_state.activity.weekly(user.id).await?;

    Ok(Json(series))
}

#[tracing::instrument(name = "[GET] me/novels", skip_all, fields(user_id = user.id))]
pub async fn novels(
    Extension(user): Extension<Arc<User>>,
    State(app_state): State<SharedAppState>,
) -> Result<Json<Vec<AuthoredNovel>>, Error> {
    let novels = app_state.store.list_novels_by_uploader(user.id).await?;

    let mut result = Vec::with_capacity(novels.len());
    for novel in novels {
        let last_chapter_number = app_state.store.last_chapter_number(novel.id).await?;
        result.push(AuthoredNovel {
            novel,
            last_chapter_number,
        });
    }

    Ok(Json(result))
}
