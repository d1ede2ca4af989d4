use sqlx::PgPool;

use crate::model::{Chapter, ChapterInput, ChapterSummary};

use super::error::DatabaseError;

#[tracing::instrument(name = "get chapters of novel", skip_all, fields(novel_id = novel_id))]
pub async fn get_chapters(
    pool: &PgPool,
    novel_id: i64,
) -> Result<Vec<ChapterSummary>, DatabaseError> {
    let chapters = sqlx::query_as::<_, ChapterSummary>(
        r#"
        SELECT
            id, chapter_number, title, views, upload_date
        FROM
            chapters
        WHERE
            novel_id = $1
        ORDER BY chapter_number
    "#,
    )
    .bind(novel_id)
    .fetch_all(pool)
    .await?;

    Ok(chapters)
}

#[tracing::instrument(name = "get last chapter number", skip_all, fields(novel_id = novel_id))]
pub async fn get_last_chapter_number(pool: &PgPool, novel_id: i64) -> Result<i32, DatabaseError> {
    let last: Option<i32> = sqlx::query_scalar(
        r#"
        SELECT
            MAX(chapter_number)
        FROM
            chapters
        WHERE
            novel_id = $1
    "#,
    )
    .bind(novel_id)
    .fetch_one(pool)
    .await?;

    Ok(last.unwrap_or(0))
}

/// Numbered inside the insert; concurrent adds collide on the unique key
/// instead of sharing a number.
#[tracing::instrument(name = "insert chapter", skip_all, fields(novel_id = novel_id))]
pub async fn insert_chapter(
    pool: &PgPool,
    novel_id: i64,
    chapter: &ChapterInput,
) -> Result<Chapter, DatabaseError> {
    let chapter = sqlx::query_as::<_, Chapter>(
        r#"
        INSERT INTO chapters
            (novel_id, chapter_number, title, content)
        SELECT
            novels.id,
            COALESCE((SELECT MAX(chapter_number) FROM chapters WHERE novel_id = novels.id), 0) + 1,
            $2,
            $3
        FROM
            novels
        WHERE
            novels.id = $1
        RETURNING
            id, novel_id, chapter_number, title, content, views, upload_date;
    "#,
    )
    .bind(novel_id)
    .bind(&chapter.title)
    .bind(&chapter.content)
    .fetch_one(pool)
    .await?;

    Ok(chapter)
}

#[tracing::instrument(name = "update chapter", skip_all, fields(novel_id = novel_id, chapter_id = chapter_id))]
pub async fn update_chapter(
    pool: &PgPool,
    novel_id: i64,
    chapter_id: i64,
    chapter: &ChapterInput,
) -> Result<Chapter, DatabaseError> {
    let chapter = sqlx::query_as::<_, Chapter>(
        r#"
        UPDATE chapters
        SET
            title = $1,
            content = $2
        WHERE
            novel_id = $3 AND id = $4
        RETURNING
            id, novel_id, chapter_number, title, content, views, upload_date;
    "#,
    )
    .bind(&chapter.title)
    .bind(&chapter.content)
    .bind(novel_id)
    .bind(chapter_id)
    .fetch_one(pool)
    .await?;

    Ok(chapter)
}

#[tracing::instrument(name = "get chapter by id", skip_all, fields(novel_id = novel_id, chapter_id = chapter_id))]
pub async fn get_chapter_by_id(
    pool: &PgPool,
    novel_id: i64,
    chapter_id: i64,
) -> Result<Chapter, DatabaseError> {
    let chapter = sqlx::query_as::<_, Chapter>(
        r#"
        SELECT
            id, novel_id, chapter_number, title, content, views, upload_date
        FROM
            chapters
        WHERE
            novel_id = $1 AND id = $2
    "#,
    )
    .bind(novel_id)
    .bind(chapter_id)
    .fetch_one(pool)
    .await?;

    Ok(chapter)
}

#[tracing::instrument(name = "increment chapter views", skip_all, fields(novel_id = novel_id, chapter_id = chapter_id))]
pub async fn increment_chapter_views(
    pool: &PgPool,
    novel_id: i64,
    chapter_id: i64,
    delta: i64,
) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE chapters
        SET
            views = views + $1
        WHERE
            novel_id = $2 AND id = $3;
    "#,
    )
    .bind(delta)
    .bind(novel_id)
    .bind(chapter_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound);
    }

    sqlx::query(
        r#"
        UPDATE novels
        SET
            views = views + $1
        WHERE
            id = $2;
    "#,
    )
    .bind(delta)
    .bind(novel_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}
