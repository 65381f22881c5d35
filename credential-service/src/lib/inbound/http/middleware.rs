use auth::Role;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Reject access to a profile that belongs to someone else.
    ///
    /// Ownership is decided by account id; the username in the token may
    /// since have been released and taken by another account.
    pub fn ensure_owns(&self, profile_id: &UserId) -> Result<(), ApiError> {
        if self.user_id == *profile_id {
            Ok(())
        } else {
            tracing::warn!(
                caller = %self.user_id,
                target = %profile_id,
                "Profile access denied to non-owner"
            );
            Err(ApiError::Forbidden(
                "Profile belongs to another user".to_string(),
            ))
        }
    }
}

/// Middleware that validates bearer tokens and adds the caller to request extensions.
///
/// Tokens whose role claim is not a known [`Role`] fail to decode and are rejected.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        unauthorized("Invalid or expired token")
    })?;

    let user_id = UserId::from_string(&claims.uid).map_err(|e| {
        tracing::warn!("JWT carries malformed user id: {}", e);
        unauthorized("Invalid or expired token")
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        username: claims.sub,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        unauthorized("Invalid Authorization header format. Expected: Bearer <token>")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(user_id: UserId) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id,
            username: "alice1234".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_ensure_owns_same_id() {
        let id = UserId::new();
        assert!(caller(id).ensure_owns(&id).is_ok());
    }

    #[test]
    fn test_ensure_owns_other_id_is_forbidden() {
        let result = caller(UserId::new()).ensure_owns(&UserId::new());
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }
}
