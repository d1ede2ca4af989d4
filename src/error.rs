use axum::{http::StatusCode, response::IntoResponse};
use validator::ValidationErrors;

use crate::{auth::error::AuthError, db::error::DatabaseError, reading::ReadingError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database error")]
    Database(DatabaseError),

    #[error("Auth error")]
    Auth(AuthError),

    #[error("Reading error")]
    Reading(ReadingError),

    #[error("Validation error")]
    Validation(ValidationErrors),

    #[error("Other error: {0}")]
    Other(anyhow::Error),
}

impl From<DatabaseError> for Error {
    fn from(value: DatabaseError) -> Self {
        Self::Database(value)
    }
}

impl From<ReadingError> for Error {
    fn from(value: ReadingError) -> Self {
        Self::Reading(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::Database(database_error) => match database_error {
                DatabaseError::DatabaseError(error) => {
                    tracing::error!(err.msg = %error, err.details = ?error, "Database Error");

                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
                DatabaseError::NotFound => StatusCode::NOT_FOUND.into_response(),
                DatabaseError::Duplicate => StatusCode::CONFLICT.into_response(),
            },
            Error::Auth(auth_error) => match auth_error {
                AuthError::JwtError(error) => {
                    tracing::error!(err.msg = %error, err.details = ?error, "JWT Error");

                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
                AuthError::PasswordError(error) => {
                    tracing::error!(err.msg = %error, err.details = ?error, "Password Hash Error");

                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
                AuthError::Unauthenticated
                | AuthError::UserNotFound
                | AuthError::IncorrectCredential => StatusCode::UNAUTHORIZED.into_response(),
                AuthError::Forbidden => {
                    (StatusCode::FORBIDDEN, auth_error.to_string()).into_response()
                }
            },
            Error::Reading(reading_error) => match reading_error {
                ReadingError::ChapterNotFound | ReadingError::SessionNotFound => {
                    (StatusCode::NOT_FOUND, reading_error.to_string()).into_response()
                }
                ReadingError::ChapterLoad(ref error) => {
                    tracing::error!(err.msg = %error, err.details = ?error, "Chapter Load Error");

                    (StatusCode::SERVICE_UNAVAILABLE, "Chapter is unavailable").into_response()
                }
                ReadingError::Fetch(ref error) => {
                    tracing::error!(err.msg = %error, err.details = ?error, "Reading Fetch Error");

                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Reading activity is unavailable",
                    )
                        .into_response()
                }
                ReadingError::Write(error) => {
                    tracing::error!(err.msg = %error, err.details = ?error, "Reading Write Error");

                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            },
            Error::Other(error) => {
                tracing::error!(err.msg = %error, err.details = ?error, "Other Error");

                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            Error::Validation(validation_error) => {
                tracing::warn!(err.msg = %validation_error, err.details = ?validation_error, "Validation Error");

                (StatusCode::BAD_REQUEST, validation_error.to_string()).into_response()
            }
        }
    }
}
