use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Body message for every authentication failure. The reason is only logged.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Principal resolved from a valid bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

impl AuthUser {
    /// Check the principal may act on `username`.
    ///
    /// Without `enforce_user_ownership` any authenticated user may act on any account;
    /// mismatches are only logged.
    pub fn authorize_for(&self, username: &str, security: &SecurityConfig) -> Result<(), ApiError> {
        if self.username == username {
            return Ok(());
        }
        if security.enforce_user_ownership {
            warn!("User '{}' denied access to account '{}'", self.username, username);
            return Err(ApiError::forbidden(format!(
                "{} is not allowed to access {}",
                self.username, username
            )));
        }
        warn!("User '{}' acting on account '{}'", self.username, username);
        Ok(())
    }
}

/// JWT authentication middleware that validates tokens and resolves the principal
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Nothing below touches the store until the token itself checks out
    let token = extract_jwt_from_headers(request.headers()).map_err(reject)?;

    let claims = state.tokens.verify(&token).map_err(reject)?;

    let user = state
        .store
        .find_user_by_id(claims.uid)
        .await?
        .ok_or_else(|| reject(format!("user '{}' no longer exists", claims.sub)))?;

    request.extensions_mut().insert(AuthUser::from(user));

    Ok(next.run(request).await)
}

fn reject(reason: impl std::fmt::Display) -> ApiError {
    debug!("Authentication rejected: {}", reason);
    ApiError::unauthorized(UNAUTHORIZED_MESSAGE)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
