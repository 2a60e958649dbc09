//! Authentication middleware

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::roles,
    error::{AppError, AppResult},
    policy::Requester,
    services::AuthService,
    state::AppState,
};

/// Authenticated user extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == roles::ADMIN
    }

    /// The user as seen by the booking rules
    pub fn requester(&self) -> Requester {
        Requester {
            user_id: self.id,
            is_admin: self.is_admin(),
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Reject non-admin users
pub fn require_admin(user: &AuthenticatedUser) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Administrator privileges required".to_string(),
        ))
    }
}

/// Authentication middleware.
///
/// The role is taken from the stored account, not the token, so demotions and
/// deactivations apply to tokens already issued.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(auth_header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        debug!(path = %path, "Auth failed: No Authorization header");
        return Err(AppError::Unauthorized);
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        debug!(path = %path, "Auth failed: Invalid Authorization format (expected 'Bearer <token>')");
        return Err(AppError::Unauthorized);
    };

    let claims = AuthService::verify_token(token, &state.config().jwt.secret).map_err(|e| {
        debug!(path = %path, error = ?e, "Auth failed: Token verification failed");
        e
    })?;

    let user_id: i64 = claims.sub.parse().map_err(|e| {
        debug!(path = %path, sub = %claims.sub, error = ?e, "Auth failed: Invalid user ID in token");
        AppError::InvalidToken
    })?;

    let user = AuthService::get_user_by_id(state.db(), user_id)
        .await?
        .ok_or(AppError::InvalidToken)?;
    if !user.is_active {
        debug!(path = %path, user_id, "Auth failed: Account inactive");
        return Err(AppError::InactiveUser);
    }

    let authenticated = AuthenticatedUser {
        id: user.id,
        email: user.email,
        role: user.role,
    };

    debug!(path = %path, user_id, role = %authenticated.role, "User authenticated successfully");

    request.extensions_mut().insert(authenticated);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            id: 3,
            email: "ana@example.com".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&user("admin")).is_ok());
        assert!(matches!(
            require_admin(&user("user")),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_requester() {
        assert_eq!(
            user("admin").requester(),
            Requester { user_id: 3, is_admin: true }
        );
        assert!(!user("user").requester().is_admin);
    }
}
