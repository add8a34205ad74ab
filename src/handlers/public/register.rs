// handlers/public/register.rs - POST /users handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AccountService;
use crate::state::AppState;
use crate::validation::UserPayload;

/// POST /users - create an account
///
/// 422 with every failing field rule, 400 when the username is taken, 201 with the stored
/// record (never the password hash) otherwise.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<User> {
    let Json(payload) = payload?;
    payload.check().map_err(ApiError::validation_failed)?;

    let user = AccountService::from_state(&state).register(payload).await?;
    Ok(ApiResponse::created(user))
}
