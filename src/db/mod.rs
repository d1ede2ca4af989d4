use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    model::{
        Chapter, ChapterInput, ChapterSummary, Novel, NovelInput, ProfileUpdate, ReadingActivity,
        User,
    },
    store::Store,
};

use self::error::DatabaseError;

pub mod chapter;
pub mod error;
pub mod novel;
pub mod reading_activity;
pub mod user;

/// [`Store`] backed by Postgres.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, DatabaseError> {
        user::find_user_by_email(&self.pool, email).await
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError> {
        user::create_user(&self.pool, email, password_hash).await
    }

    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, DatabaseError> {
        user::get_user_by_id_optional(&self.pool, user_id).await
    }

    async fn update_profile(
        &self,
        user_id: i64,
        profile: &ProfileUpdate,
    ) -> Result<User, DatabaseError> {
        user::update_profile(&self.pool, user_id, profile).await
    }

    async fn create_novel(
        &self,
        upload_by: i64,
        novel: &NovelInput,
    ) -> Result<Novel, DatabaseError> {
        novel::create_novel(&self.pool, upload_by, novel).await
    }

    async fn update_novel(
        &self,
        novel_id: i64,
        novel: &NovelInput,
    ) -> Result<Novel, DatabaseError> {
        novel::update_novel(&self.pool, novel_id, novel).await
    }

    async fn get_novel(&self, novel_id: i64) -> Result<Novel, DatabaseError> {
        novel::get_novel_by_id(&self.pool, novel_id).await
    }

    async fn list_popular_novels(
        &self,
        genre: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Novel>, DatabaseError> {
        novel::get_popular_novels(&self.pool, genre, limit).await
    }

    async fn list_novels_by_uploader(&self, user_id: i64) -> Result<Vec<Novel>, DatabaseError> {
        novel::get_novels_by_uploader(&self.pool, user_id).await
    }

    async fn list_chapters(&self, novel_id: i64) -> Result<Vec<ChapterSummary>, DatabaseError> {
        chapter::get_chapters(&self.pool, novel_id).await
    }

    async fn last_chapter_number(&self, novel_id: i64) -> Result<i32, DatabaseError> {
        chapter::get_last_chapter_number(&self.pool, novel_id).await
    }

    async fn add_chapter(
        &self,
        novel_id: i64,
        chapter: &ChapterInput,
    ) -> Result<Chapter, DatabaseError> {
        chapter::insert_chapter(&self.pool, novel_id, chapter).await
    }

    async fn update_chapter(
        &self,
        novel_id: i64,
        chapter_id: i64,
        chapter: &ChapterInput,
    ) -> Result<Chapter, DatabaseError> {
        chapter::update_chapter(&self.pool, novel_id, chapter_id, chapter).await
    }

    async fn get_chapter(&self, novel_id: i64, chapter_id: i64) -> Result<Chapter, DatabaseError> {
        chapter::get_chapter_by_id(&self.pool, novel_id, chapter_id).await
    }

    async fn increment_chapter_views(
        &self,
        novel_id: i64,
        chapter_id: i64,
        delta: i64,
    ) -> Result<(), DatabaseError> {
        chapter::increment_chapter_views(&self.pool, novel_id, chapter_id, delta).await
    }

    async fn upsert_daily_activity(
        &self,
        user_id: i64,
        date: NaiveDate,
        delta: i32,
    ) -> Result<(), DatabaseError> {
        reading_activity::upsert_daily_activity(&self.pool, user_id, date, delta).await
    }

    async fn get_activity(
        &self,
        user_id: i64,
        from: NaiveDate,
    ) -> Result<Vec<ReadingActivity>, DatabaseError> {
        reading_activity::get_activity(&self.pool, user_id, from).await
    }
}
