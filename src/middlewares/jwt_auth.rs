use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::{decode_jwt, error::AuthError},
    error::Error,
    state::SharedAppState,
};

/// Resolves the bearer token into the current [`crate::model::User`] and
/// stores it as a request extension.
#[tracing::instrument(name = "[MIDDLEWARE] jwt auth", skip_all, fields(user_id))]
pub async fn jwt_auth_middleware(
    State(app_state): State<SharedAppState>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    let auth_header = match req.headers().get(axum::http::header::AUTHORIZATION) {
        Some(header) => header
            .to_str()
            .map_err(|_| Error::Auth(AuthError::Unauthenticated))?,
        None => {
            return Err(Error::Auth(AuthError::Unauthenticated));
        }
    };

    let mut header = auth_header.split_whitespace();
    let (bearer, token) = match (header.next(), header.next()) {
        (Some(bearer), Some(token)) => (bearer, token),
        _ => {
            return Err(Error::Auth(AuthError::Unauthenticated));
        }
    };

    if !bearer.eq_ignore_ascii_case("bearer") {
        return Err(Error::Auth(AuthError::Unauthenticated));
    }

    let token_data = decode_jwt(token, &app_state.config.jwt)
        .map_err(|_| Error::Auth(AuthError::Unauthenticated))?;

    let user = match app_state
        .store
        .get_user_by_id(token_data.claims.user_id)
        .await?
    {
        Some(user) => Arc::new(user),
        None => {
            return Err(Error::Auth(AuthError::Unauthenticated));
        }
    };

    tracing::Span::current().record("user_id", user.id);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
