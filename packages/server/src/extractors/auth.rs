use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Verified admin identity extracted from the `Authorization: Bearer <token>`
/// header.
///
/// Add this as a handler parameter to gate the handler on admin login. The
/// admin surface has a single principal, so carrying the subject is all the
/// request needs.
pub struct AdminToken {
    pub subject: String,
}

impl<S> FromRequestParts<S> for AdminToken
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AdminToken {
            subject: claims.sub,
        })
    }
}
