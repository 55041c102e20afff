use axum::{extract::FromRequestParts, http::header};
use uuid::Uuid;

use crate::{auth::AuthError, error::AppError, models::Role, state::AppState};

/// Capability handed into every service call: who is acting and as what.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub account_id: Uuid,
    pub role: Role,
}

pub fn ensure_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::NotAuthorized);
    }
    Ok(())
}

pub fn ensure_driver(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Driver)
}

pub fn ensure_customer(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Customer)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthenticated)?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthenticated)?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::Unauthenticated);
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let identity = state.auth.identity(token).await.map_err(|err| match err {
            AuthError::InvalidToken => AppError::Unauthenticated,
            AuthError::Unavailable(reason) => {
                tracing::error!(%reason, "auth service unavailable");
                AppError::Internal(anyhow::anyhow!("auth service unavailable"))
            }
        })?;

        Ok(AuthUser {
            account_id: identity.account_id,
            role: identity.role,
        })
    }
}
