use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{model::ReadingActivity, store::Store};

use super::error::ReadingError;

pub const WINDOW_DAYS: usize = 7;

/// One bar of the weekly reading chart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyBucket {
    /// Short weekday name, for display only.
    pub name: String,
    pub date: NaiveDate,
    pub reads: i32,
}

/// Chapters read per day over the last week, oldest day first, today last.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct DailySeries {
    buckets: [DailyBucket; WINDOW_DAYS],
}

impl DailySeries {
    pub fn buckets(&self) -> &[DailyBucket] {
        &self.buckets
    }

    pub fn total(&self) -> i32 {
        self.buckets.iter().map(|b| b.reads).sum()
    }
}

/// Calendar days `[today - 6, ..., today]`.
pub fn window(today: NaiveDate) -> [NaiveDate; WINDOW_DAYS] {
    std::array::from_fn(|i| today - Days::new((WINDOW_DAYS - 1 - i) as u64))
}

pub fn weekday_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

/// Days without a record count zero; records outside the window are ignored.
pub fn build_series(today: NaiveDate, records: &[ReadingActivity]) -> DailySeries {
    let buckets = window(today).map(|date| DailyBucket {
        name: weekday_label(date),
        date,
        reads: records
            .iter()
            .find(|r| r.date == date)
            .map(|r| r.chapters_read)
            .unwrap_or(0),
    });

    DailySeries { buckets }
}

pub struct ActivityAggregator {
    store: Arc<dyn Store>,
}

impl ActivityAggregator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn weekly(&self, user_id: i64) -> Result<DailySeries, ReadingError> {
        self.weekly_at(user_id, Utc::now().date_naive()).await
    }

    /// A failed fetch is an error, never an all-zero week.
    #[tracing::instrument(name = "aggregate weekly reading activity", skip(self))]
    pub async fn weekly_at(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<DailySeries, ReadingError> {
        let [from, ..] = window(today);

        let records = self
            .store
            .get_activity(user_id, from)
            .await
            .map_err(ReadingError::Fetch)?;

        Ok(build_series(today, &records))
    }
}
