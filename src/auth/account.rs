use anyhow::Context;
use secrecy::SecretString;

use crate::{
    error::Error, model::User, store::Store, telemetry::spawn_blocking_with_tracing,
};

use super::{compute_password_hash, error::AuthError, verify_password_hash};

/// Signs in with email and password. An unknown email registers a new
/// account when registration is open.
#[tracing::instrument(name = "login or register", skip_all, fields(email = %email, allow_registration = allow_registration))]
pub async fn login_or_register(
    store: &dyn Store,
    email: String,
    password: SecretString,
    allow_registration: bool,
) -> Result<User, Error> {
    if let Some((user, hashed_password)) = store.find_user_by_email(&email).await? {
        spawn_blocking_with_tracing(move || verify_password_hash(hashed_password, password))
            .await
            .context("verify password hash")
            .map_err(Error::Other)?
            .map_err(|_| Error::Auth(AuthError::IncorrectCredential))?;

        return Ok(user);
    }

    if !allow_registration {
        return Err(Error::Auth(AuthError::UserNotFound));
    }

    let password_hashed = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .context("compute password hash")
        .map_err(Error::Other)??;

    let user = store.create_user(&email, &password_hashed).await?;
    tracing::info!(user_id = user.id, "Registered new user");

    Ok(user)
}
