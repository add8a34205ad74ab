// handlers/protected/favorites.rs - favorite movie list of a user
//
// Movie ids are stored as given: no existence check, and adding twice lists it twice.

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// POST /users/:Username/movies/:MovieID
pub async fn favorite_post(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path((username, movie_id)): Path<(String, String)>,
) -> ApiResult<User> {
    principal.authorize_for(&username, &state.config.security)?;

    state
        .store
        .push_favorite(&username, &movie_id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("{} was not found", username)))
}

/// DELETE /users/:Username/movies/:MovieID - removes every occurrence
pub async fn favorite_delete(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path((username, movie_id)): Path<(String, String)>,
) -> ApiResult<User> {
    principal.authorize_for(&username, &state.config.security)?;

    state
        .store
        .pull_favorite(&username, &movie_id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("{} was not found", username)))
}
