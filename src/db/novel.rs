use sqlx::PgPool;

use crate::model::{Novel, NovelEntity, NovelInput};

use super::error::DatabaseError;

fn into_novel(entity: NovelEntity) -> Result<Novel, DatabaseError> {
    Novel::from_entity(entity).map_err(|e| DatabaseError::DatabaseError(sqlx::Error::Decode(e.into())))
}

fn into_novels(entities: Vec<NovelEntity>) -> Result<Vec<Novel>, DatabaseError> {
    entities.into_iter().map(into_novel).collect()
}

#[tracing::instrument(name = "create novel", skip_all, fields(upload_by = upload_by))]
pub async fn create_novel(
    pool: &PgPool,
    upload_by: i64,
    novel: &NovelInput,
) -> Result<Novel, DatabaseError> {
    let entity = sqlx::query_as::<_, NovelEntity>(
        r#"
        INSERT INTO novels
            (title, author, genres, leading_character, story, upload_by)
        VALUES
            ($1, $2, $3, $4, $5, $6)
        RETURNING
            id, title, author, genres, leading_character, story, upload_by, views, created_at;
    "#,
    )
    .bind(&novel.title)
    .bind(&novel.author)
    .bind(&novel.genres)
    .bind(novel.leading_character.as_str())
    .bind(&novel.story)
    .bind(upload_by)
    .fetch_one(pool)
    .await?;

    into_novel(entity)
}

#[tracing::instrument(name = "update novel", skip_all, fields(novel_id = novel_id))]
pub async fn update_novel(
    pool: &PgPool,
    novel_id: i64,
    novel: &NovelInput,
) -> Result<Novel, DatabaseError> {
    let entity = sqlx::query_as::<_, NovelEntity>(
        r#"
        UPDATE novels
        SET
            title = $1,
            author = $2,
            genres = $3,
            leading_character = $4,
            story = $5
        WHERE
            id = $6
        RETURNING
            id, title, author, genres, leading_character, story, upload_by, views, created_at;
    "#,
    )
    .bind(&novel.title)
    .bind(&novel.author)
    .bind(&novel.genres)
    .bind(novel.leading_character.as_str())
    .bind(&novel.story)
    .bind(novel_id)
    .fetch_one(pool)
    .await?;

    into_novel(entity)
}

#[tracing::instrument(name = "get novel by id", skip_all, fields(novel_id = novel_id))]
pub async fn get_novel_by_id(pool: &PgPool, novel_id: i64) -> Result<Novel, DatabaseError> {
    let entity = sqlx::query_as::<_, NovelEntity>(
        r#"
        SELECT
            id, title, author, genres, leading_character, story, upload_by, views, created_at
        FROM
            novels
        WHERE
            id = $1
    "#,
    )
    .bind(novel_id)
    .fetch_one(pool)
    .await?;

    into_novel(entity)
}

#[tracing::instrument(name = "get popular novels", skip_all, fields(genre = ?genre, limit = limit))]
pub async fn get_popular_novels(
    pool: &PgPool,
    genre: Option<&str>,
    limit: i64,
) -> Result<Vec<Novel>, DatabaseError> {
    let entities = sqlx::query_as::<_, NovelEntity>(
        r#"
        SELECT
            id, title, author, genres, leading_character, story, upload_by, views, created_at
        FROM
            novels
        WHERE
            $1::TEXT IS NULL OR $1 = ANY(genres)
        ORDER BY views DESC, id
        LIMIT $2
    "#,
    )
    .bind(genre)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    into_novels(entities)
}

#[tracing::instrument(name = "get novels by uploader", skip_all, fields(user_id = user_id))]
pub async fn get_novels_by_uploader(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<Novel>, DatabaseError> {
    let entities = sqlx::query_as::<_, NovelEntity>(
        r#"
        SELECT
            id, title, author, genres, leading_character, story, upload_by, views, created_at
        FROM
            novels
        WHERE
            upload_by = $1
        ORDER BY id
    "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    into_novels(entities)
}
