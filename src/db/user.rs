use sqlx::PgPool;

use crate::model::{ProfileUpdate, User};

use super::error::DatabaseError;

#[derive(sqlx::FromRow)]
struct UserCredential {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

#[tracing::instrument(name = "find user by email", skip_all, fields(email = email))]
pub async fn find_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<(User, String)>, DatabaseError> {
    let credential = sqlx::query_as::<_, UserCredential>(
        r#"
        SELECT
            id, email, password, username, age, interested_genres, created_at
        FROM
            users
        WHERE
            email = $1
    "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(credential.map(|c| (c.user, c.password)))
}

#[tracing::instrument(name = "create user", skip_all, fields(email = email))]
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users
            (email, password)
        VALUES
            ($1, $2)
        RETURNING
            id, email, username, age, interested_genres, created_at;
    "#,
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

#[tracing::instrument(name = "get user by id", skip_all, fields(user_id = user_id))]
pub async fn get_user_by_id_optional(
    pool: &PgPool,
    user_id: i64,
) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT
            id, email, username, age, interested_genres, created_at
        FROM
            users
        WHERE
            id = $1;
    "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

#[tracing::instrument(name = "update user profile", skip_all, fields(user_id = user_id))]
pub async fn update_profile(
    pool: &PgPool,
    user_id: i64,
    profile: &ProfileUpdate,
) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET
            username = $1,
            age = $2,
            interested_genres = $3
        WHERE
            id = $4
        RETURNING
            id, email, username, age, interested_genres, created_at;
    "#,
    )
    .bind(&profile.username)
    .bind(profile.age)
    .bind(&profile.interested_genres)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}
