use crate::db::error::DatabaseError;

#[derive(thiserror::Error, Debug)]
pub enum ReadingError {
    #[error("Chapter not found")]
    ChapterNotFound,
    #[error("Failed to load chapter")]
    ChapterLoad(#[source] DatabaseError),
    #[error("Reading session not found")]
    SessionNotFound,
    #[error("Failed to fetch reading data")]
    Fetch(#[source] DatabaseError),
    #[error("Failed to record reading progress")]
    Write(#[source] DatabaseError),
}
