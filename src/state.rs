use std::sync::Arc;

use chrono::TimeDelta;
use sqlx::postgres::PgPoolOptions;

use crate::{
    config::{Config, StoreKind},
    db::PgStore,
    reading::{ActivityAggregator, ReadProgressTracker},
    store::{MemoryStore, Store},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tracker: ReadProgressTracker,
    pub activity: Arc<ActivityAggregator>,
    pub config: Config,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub async fn init(config: Config) -> Result<Self, sqlx::Error> {
        let store: Arc<dyn Store> = match config.application.store {
            StoreKind::Postgres => {
                let pool = PgPoolOptions::new()
                    .min_connections(5)
                    .max_connections(30)
                    .connect_lazy_with(config.database.with_db());

                if config.application.run_migration {
                    tracing::warn!("Running database migrations...");
                    sqlx::migrate!("./migrations").run(&pool).await?;
                }

                Arc::new(PgStore::new(pool))
            }
            StoreKind::Memory => {
                tracing::warn!("Using in-memory store, data is lost on shutdown");

                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Self {
        let session_ttl = TimeDelta::minutes(config.reading.session_ttl_minutes);

        AppState {
            tracker: ReadProgressTracker::new(Arc::clone(&store), session_ttl),
            activity: Arc::new(ActivityAggregator::new(Arc::clone(&store))),
            store,
            config,
        }
    }
}
