use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{db::error::DatabaseError, store::Store};

use super::error::ReadingError;

/// Scroll position of the chapter's content area, in CSS pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    /// Ceiling absorbs sub-pixel offsets that would otherwise keep an exactly
    /// fitting viewport one fraction short of the bottom.
    pub fn reached_bottom(&self) -> bool {
        (self.scroll_top + self.client_height).ceil() >= self.scroll_height
    }
}

impl Validate for ScrollMetrics {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (field, value) in [
            ("scroll_top", self.scroll_top),
            ("client_height", self.client_height),
            ("scroll_height", self.scroll_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.add(
                    field,
                    ValidationError::new("measurement")
                        .with_message("Must be a finite, non-negative number".into()),
                );
            }
        }

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(())
    }
}

/// One visit of one reader to one chapter.
#[derive(Debug, Clone)]
pub struct ReadSession {
    pub id: Uuid,
    pub user_id: i64,
    pub novel_id: i64,
    pub chapter_id: i64,
    pub mounted_at: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    has_reached_bottom: bool,
}

impl ReadSession {
    fn new(user_id: i64, novel_id: i64, chapter_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            novel_id,
            chapter_id,
            mounted_at: now,
            last_seen: now,
            has_reached_bottom: false,
        }
    }

    pub fn has_reached_bottom(&self) -> bool {
        self.has_reached_bottom
    }

    /// Returns `true` only for the event that moves the session to the bottom.
    /// The flag never goes back.
    pub fn observe(&mut self, metrics: &ScrollMetrics, at: DateTime<Utc>) -> bool {
        self.last_seen = at;

        if self.has_reached_bottom || !metrics.reached_bottom() {
            return false;
        }

        self.has_reached_bottom = true;
        true
    }

    fn is_idle(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.last_seen > ttl
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    pub reached_bottom: bool,
    pub counted: bool,
}

/// Result of a scroll event. `completion` is the detached write task, present
/// only for the event that counted the read.
#[derive(Debug)]
pub struct Scrolled {
    pub outcome: ScrollOutcome,
    pub completion: Option<JoinHandle<()>>,
}

type Sessions = Arc<Mutex<HashMap<Uuid, ReadSession>>>;

/// Turns scroll events into at most one (view, activity) increment pair per
/// mounted session.
#[derive(Clone)]
pub struct ReadProgressTracker {
    store: Arc<dyn Store>,
    sessions: Sessions,
    session_ttl: TimeDelta,
}

impl ReadProgressTracker {
    pub fn new(store: Arc<dyn Store>, session_ttl: TimeDelta) -> Self {
        Self {
            store,
            sessions: Arc::default(),
            session_ttl,
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<Uuid, ReadSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions().len()
    }

    pub async fn mount(
        &self,
        user_id: i64,
        novel_id: i64,
        chapter_id: i64,
    ) -> Result<ActiveSession, ReadingError> {
        self.mount_at(user_id, novel_id, chapter_id, Utc::now()).await
    }

    #[tracing::instrument(name = "mount read session", skip(self, now))]
    pub async fn mount_at(
        &self,
        user_id: i64,
        novel_id: i64,
        chapter_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ActiveSession, ReadingError> {
        self.store
            .get_chapter(novel_id, chapter_id)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound => ReadingError::ChapterNotFound,
                other => ReadingError::ChapterLoad(other),
            })?;

        let session = ReadSession::new(user_id, novel_id, chapter_id, now);
        let id = session.id;

        {
            let mut sessions = self.sessions();
            let before = sessions.len();
            sessions.retain(|_, s| !s.is_idle(now, self.session_ttl));
            if sessions.len() < before {
                tracing::info!(released = before - sessions.len(), "Released idle read sessions");
            }
            sessions.insert(id, session);
        }

        Ok(ActiveSession {
            id,
            user_id,
            tracker: self.clone(),
            detached: false,
        })
    }

    pub fn scroll(
        &self,
        session_id: Uuid,
        user_id: i64,
        metrics: &ScrollMetrics,
    ) -> Result<Scrolled, ReadingError> {
        self.scroll_at(session_id, user_id, metrics, Utc::now())
    }

    /// Must run inside a tokio runtime: the counting event spawns the writes.
    pub fn scroll_at(
        &self,
        session_id: Uuid,
        user_id: i64,
        metrics: &ScrollMetrics,
        now: DateTime<Utc>,
    ) -> Result<Scrolled, ReadingError> {
        let (outcome, finished) = {
            let mut sessions = self.sessions();
            let session = sessions
                .get_mut(&session_id)
                .filter(|s| s.user_id == user_id)
                .ok_or(ReadingError::SessionNotFound)?;

            let counted = session.observe(metrics, now);
            let outcome = ScrollOutcome {
                reached_bottom: session.has_reached_bottom(),
                counted,
            };

            (outcome, counted.then(|| session.clone()))
        };

        let completion = finished.map(|session| self.record_completion(session, now.date_naive()));

        Ok(Scrolled {
            outcome,
            completion,
        })
    }

    /// Fire and forget. Failures are logged and never reach the reader.
    fn record_completion(&self, session: ReadSession, today: NaiveDate) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let span = tracing::info_span!(
            "record chapter completion",
            session_id = %session.id,
            user_id = session.user_id,
            novel_id = session.novel_id,
            chapter_id = session.chapter_id,
            date = %today,
        );

        tokio::spawn(
            async move {
                let (views, activity) = tokio::join!(
                    store.increment_chapter_views(session.novel_id, session.chapter_id, 1),
                    store.upsert_daily_activity(session.user_id, today, 1),
                );

                if let Err(error) = views.map_err(ReadingError::Write) {
                    tracing::error!(err.msg = %error, err.details = ?error, "Failed to increment chapter views");
                }
                if let Err(error) = activity.map_err(ReadingError::Write) {
                    tracing::error!(err.msg = %error, err.details = ?error, "Failed to record reading activity");
                }
            }
            .instrument(span),
        )
    }

    /// Ends a session on behalf of its reader. In-flight writes keep running.
    pub fn unmount(&self, session_id: Uuid, user_id: i64) -> Result<(), ReadingError> {
        let mut sessions = self.sessions();
        match sessions.get(&session_id) {
            Some(session) if session.user_id == user_id => {
                sessions.remove(&session_id);
                Ok(())
            }
            _ => Err(ReadingError::SessionNotFound),
        }
    }

    fn release(&self, session_id: Uuid) {
        self.sessions().remove(&session_id);
    }
}

/// Handle to a mounted session. Dropping it unmounts the session.
pub struct ActiveSession {
    id: Uuid,
    user_id: i64,
    tracker: ReadProgressTracker,
    detached: bool,
}

impl ActiveSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scroll(&self, metrics: &ScrollMetrics) -> Result<Scrolled, ReadingError> {
        self.tracker.scroll(self.id, self.user_id, metrics)
    }

    /// Keeps the session registered once the handle is gone, for clients that
    /// drive it across requests. It is released by
    /// [`ReadProgressTracker::unmount`] or by the idle sweep.
    pub fn detach(mut self) -> Uuid {
        self.detached = true;
        self.id
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        if !self.detached {
            self.tracker.release(self.id);
        }
    }
}
