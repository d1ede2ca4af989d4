use chrono::NaiveDate;
use sqlx::PgPool;

use crate::model::ReadingActivity;

use super::error::DatabaseError;

#[tracing::instrument(name = "upsert daily reading activity", skip_all, fields(user_id = user_id, date = %date))]
pub async fn upsert_daily_activity(
    pool: &PgPool,
    user_id: i64,
    date: NaiveDate,
    delta: i32,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO reading_activity
            (user_id, date, chapters_read)
        VALUES
            ($1, $2, $3)
        ON CONFLICT (user_id, date)
        DO UPDATE SET
            chapters_read = reading_activity.chapters_read + EXCLUDED.chapters_read;
    "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(delta)
    .execute(pool)
    .await?;

    Ok(())
}

#[tracing::instrument(name = "get reading activity", skip_all, fields(user_id = user_id, from = %from))]
pub async fn get_activity(
    pool: &PgPool,
    user_id: i64,
    from: NaiveDate,
) -> Result<Vec<ReadingActivity>, DatabaseError> {
    let records = sqlx::query_as::<_, ReadingActivity>(
        r#"
        SELECT
            user_id, date, chapters_read
        FROM
            reading_activity
        WHERE
            user_id = $1 AND date >= $2
        ORDER BY date
    "#,
    )
    .bind(user_id)
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(records)
}
