use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    db::error::DatabaseError,
    model::{
        Chapter, ChapterInput, ChapterSummary, Novel, NovelInput, ProfileUpdate, ReadingActivity,
        User,
    },
};

pub mod memory;

pub use memory::MemoryStore;

/// Data access for users, novels, chapters and reading activity.
///
/// Counter updates (`increment_chapter_views`, `upsert_daily_activity`) must be
/// atomic at the store level so that concurrent readers never lose an update.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the user and its password hash.
    async fn find_user_by_email(&self, email: &str)
    -> Result<Option<(User, String)>, DatabaseError>;

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError>;

    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, DatabaseError>;

    async fn update_profile(
        &self,
        user_id: i64,
        profile: &ProfileUpdate,
    ) -> Result<User, DatabaseError>;

    async fn create_novel(&self, upload_by: i64, novel: &NovelInput)
    -> Result<Novel, DatabaseError>;

    async fn update_novel(&self, novel_id: i64, novel: &NovelInput)
    -> Result<Novel, DatabaseError>;

    async fn get_novel(&self, novel_id: i64) -> Result<Novel, DatabaseError>;

    /// Most viewed first. `None` lists every genre.
    async fn list_popular_novels(
        &self,
        genre: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Novel>, DatabaseError>;

    async fn list_novels_by_uploader(&self, user_id: i64) -> Result<Vec<Novel>, DatabaseError>;

    /// Ordered by chapter number.
    async fn list_chapters(&self, novel_id: i64) -> Result<Vec<ChapterSummary>, DatabaseError>;

    /// Highest chapter number of the novel, 0 when it has none.
    async fn last_chapter_number(&self, novel_id: i64) -> Result<i32, DatabaseError>;

    /// Appends a chapter numbered one past the current last chapter.
    async fn add_chapter(
        &self,
        novel_id: i64,
        chapter: &ChapterInput,
    ) -> Result<Chapter, DatabaseError>;

    async fn update_chapter(
        &self,
        novel_id: i64,
        chapter_id: i64,
        chapter: &ChapterInput,
    ) -> Result<Chapter, DatabaseError>;

    async fn get_chapter(&self, novel_id: i64, chapter_id: i64) -> Result<Chapter, DatabaseError>;

    /// Adds `delta` to the chapter's views and to its novel's views.
    async fn increment_chapter_views(
        &self,
        novel_id: i64,
        chapter_id: i64,
        delta: i64,
    ) -> Result<(), DatabaseError>;

    /// Creates the day's record with `delta`, or adds `delta` to it.
    async fn upsert_daily_activity(
        &self,
        user_id: i64,
        date: NaiveDate,
        delta: i32,
    ) -> Result<(), DatabaseError>;

    /// Every record of the user dated on or after `from`.
    async fn get_activity(
        &self,
        user_id: i64,
        from: NaiveDate,
    ) -> Result<Vec<ReadingActivity>, DatabaseError>;
}
