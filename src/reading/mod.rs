//! Chapter read-completion tracking and the weekly reading chart.

pub mod activity;
pub mod error;
pub mod tracker;

pub use activity::{ActivityAggregator, DailyBucket, DailySeries};
pub use error::ReadingError;
pub use tracker::{ActiveSession, ReadProgressTracker, ScrollMetrics, ScrollOutcome, Scrolled};
