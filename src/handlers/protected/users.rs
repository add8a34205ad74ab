// handlers/protected/users.rs - account routes keyed by username

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::AccountService;
use crate::state::AppState;
use crate::validation::UserPayload;

/// GET /users/:Username
pub async fn user_get(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(username): Path<String>,
) -> ApiResult<User> {
    principal.authorize_for(&username, &state.config.security)?;

    state
        .store
        .find_user(&username)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("{} was not found", username)))
}

/// PUT /users/:Username - full replace of Username, Password, Email and Birthday
pub async fn user_put(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(username): Path<String>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<User> {
    principal.authorize_for(&username, &state.config.security)?;

    let Json(payload) = payload?;
    payload.check().map_err(ApiError::validation_failed)?;

    let user = AccountService::from_state(&state).replace(&username, payload).await?;
    info!("Updated user {} (now {})", username, user.username);
    Ok(ApiResponse::success(user))
}

/// DELETE /users/:Username - a missing user is a 400, not a 404
pub async fn user_delete(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(username): Path<String>,
) -> ApiResult<Value> {
    principal.authorize_for(&username, &state.config.security)?;

    match state.store.delete_user(&username).await? {
        Some(_) => {
            info!("Deleted user {}", username);
            Ok(ApiResponse::success(json!({ "message": format!("{} was deleted", username) })))
        }
        None => Err(ApiError::bad_request(format!("{} was not found", username))),
    }
}
