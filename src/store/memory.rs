use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::{
    db::error::DatabaseError,
    model::{
        Chapter, ChapterInput, ChapterSummary, Novel, NovelInput, ProfileUpdate, ReadingActivity,
        User,
    },
};

use super::Store;

/// In-process store. Every operation runs under one lock, which makes the
/// counter updates atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, (User, String)>,
    novels: BTreeMap<i64, Novel>,
    chapters: BTreeMap<i64, Chapter>,
    activity: HashMap<(i64, NaiveDate), i32>,
    last_user_id: i64,
    last_novel_id: i64,
    last_chapter_id: i64,
}

impl Inner {
    fn chapter_mut(&mut self, novel_id: i64, chapter_id: i64) -> Option<&mut Chapter> {
        self.chapters
            .get_mut(&chapter_id)
            .filter(|c| c.novel_id == novel_id)
    }

    fn last_chapter_number(&self, novel_id: i64) -> i32 {
        self.chapters
            .values()
            .filter(|c| c.novel_id == novel_id)
            .map(|c| c.chapter_number)
            .max()
            .unwrap_or(0)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, DatabaseError> {
        let inner = self.lock();
        Ok(inner
            .users
            .values()
            .find(|(user, _)| user.email == email)
            .cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let mut inner = self.lock();
        if inner.users.values().any(|(user, _)| user.email == email) {
            return Err(DatabaseError::Duplicate);
        }

        inner.last_user_id += 1;
        let user = User {
            id: inner.last_user_id,
            email: email.to_string(),
            username: None,
            age: None,
            interested_genres: Vec::new(),
            created_at: Utc::now(),
        };
        inner
            .users
            .insert(user.id, (user.clone(), password_hash.to_string()));

        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, DatabaseError> {
        let inner = self.lock();
        Ok(inner.users.get(&user_id).map(|(user, _)| user.clone()))
    }

    async fn update_profile(
        &self,
        user_id: i64,
        profile: &ProfileUpdate,
    ) -> Result<User, DatabaseError> {
        let mut inner = self.lock();
        let (user, _) = inner
            .users
            .get_mut(&user_id)
            .ok_or(DatabaseError::NotFound)?;

        user.username = Some(profile.username.clone());
        user.age = profile.age;
        user.interested_genres = profile.interested_genres.clone();

        Ok(user.clone())
    }

    async fn create_novel(
        &self,
        upload_by: i64,
        novel: &NovelInput,
    ) -> Result<Novel, DatabaseError> {
        let mut inner = self.lock();
        if !inner.users.contains_key(&upload_by) {
            return Err(DatabaseError::NotFound);
        }

        inner.last_novel_id += 1;
        let novel = Novel {
            id: inner.last_novel_id,
            title: novel.title.clone(),
            author: novel.author.clone(),
            genres: novel.genres.clone(),
            leading_character: novel.leading_character,
            story: novel.story.clone(),
            upload_by,
            views: 0,
            created_at: Utc::now(),
        };
        inner.novels.insert(novel.id, novel.clone());

        Ok(novel)
    }

    async fn update_novel(
        &self,
        novel_id: i64,
        novel: &NovelInput,
    ) -> Result<Novel, DatabaseError> {
        let mut inner = self.lock();
        let stored = inner
            .novels
            .get_mut(&novel_id)
            .ok_or(DatabaseError::NotFound)?;

        stored.title = novel.title.clone();
        stored.author = novel.author.clone();
        stored.genres = novel.genres.clone();
        stored.leading_character = novel.leading_character;
        stored.story = novel.story.clone();

        Ok(stored.clone())
    }

    async fn get_novel(&self, novel_id: i64) -> Result<Novel, DatabaseError> {
        let inner = self.lock();
        inner
            .novels
            .get(&novel_id)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }

    async fn list_popular_novels(
        &self,
        genre: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Novel>, DatabaseError> {
        let inner = self.lock();
        let mut novels: Vec<Novel> = inner
            .novels
            .values()
            .filter(|n| genre.is_none_or(|g| n.has_genre(g)))
            .cloned()
            .collect();
        novels.sort_by(|a, b| b.views.cmp(&a.views).then(a.id.cmp(&b.id)));
        novels.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(novels)
    }

    async fn list_novels_by_uploader(&self, user_id: i64) -> Result<Vec<Novel>, DatabaseError> {
        let inner = self.lock();
        Ok(inner
            .novels
            .values()
            .filter(|n| n.upload_by == user_id)
            .cloned()
            .collect())
    }

    async fn list_chapters(&self, novel_id: i64) -> Result<Vec<ChapterSummary>, DatabaseError> {
        let inner = self.lock();
        let mut chapters: Vec<ChapterSummary> = inner
            .chapters
            .values()
            .filter(|c| c.novel_id == novel_id)
            .map(ChapterSummary::from)
            .collect();
        chapters.sort_by_key(|c| c.chapter_number);

        Ok(chapters)
    }

    async fn last_chapter_number(&self, novel_id: i64) -> Result<i32, DatabaseError> {
        Ok(self.lock().last_chapter_number(novel_id))
    }

    async fn add_chapter(
        &self,
        novel_id: i64,
        chapter: &ChapterInput,
    ) -> Result<Chapter, DatabaseError> {
        let mut inner = self.lock();
        if !inner.novels.contains_key(&novel_id) {
            return Err(DatabaseError::NotFound);
        }

        inner.last_chapter_id += 1;
        let chapter = Chapter {
            id: inner.last_chapter_id,
            novel_id,
            chapter_number: inner.last_chapter_number(novel_id) + 1,
            title: chapter.title.clone(),
            content: chapter.content.clone(),
            views: 0,
            upload_date: Utc::now(),
        };
        inner.chapters.insert(chapter.id, chapter.clone());

        Ok(chapter)
    }

    async fn update_chapter(
        &self,
        novel_id: i64,
        chapter_id: i64,
        chapter: &ChapterInput,
    ) -> Result<Chapter, DatabaseError> {
        let mut inner = self.lock();
        let stored = inner
            .chapter_mut(novel_id, chapter_id)
            .ok_or(DatabaseError::NotFound)?;

        stored.title = chapter.title.clone();
        stored.content = chapter.content.clone();

        Ok(stored.clone())
    }

    async fn get_chapter(&self, novel_id: i64, chapter_id: i64) -> Result<Chapter, DatabaseError> {
        let inner = self.lock();
        inner
            .chapters
            .get(&chapter_id)
            .filter(|c| c.novel_id == novel_id)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }

    async fn increment_chapter_views(
        &self,
        novel_id: i64,
        chapter_id: i64,
        delta: i64,
    ) -> Result<(), DatabaseError> {
        let mut inner = self.lock();
        let chapter = inner
            .chapter_mut(novel_id, chapter_id)
            .ok_or(DatabaseError::NotFound)?;
        chapter.views += delta;

        if let Some(novel) = inner.novels.get_mut(&novel_id) {
            novel.views += delta;
        }

        Ok(())
    }

    async fn upsert_daily_activity(
        &self,
        user_id: i64,
        date: NaiveDate,
        delta: i32,
    ) -> Result<(), DatabaseError> {
        let mut inner = self.lock();
        *inner.activity.entry((user_id, date)).or_insert(0) += delta;

        Ok(())
    }

    async fn get_activity(
        &self,
        user_id: i64,
        from: NaiveDate,
    ) -> Result<Vec<ReadingActivity>, DatabaseError> {
        let inner = self.lock();
        let mut records: Vec<ReadingActivity> = inner
            .activity
            .iter()
            .filter(|((user, date), _)| *user == user_id && *date >= from)
            .map(|((user, date), chapters_read)| ReadingActivity {
                user_id: *user,
                date: *date,
                chapters_read: *chapters_read,
            })
            .collect();
        records.sort_by_key(|r| r.date);

        Ok(records)
    }
}
