// handlers/public/login.rs - POST /login handler

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::auth::{parse_basic_credentials, Credentials};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, UNAUTHORIZED_MESSAGE};
use crate::services::{AccountService, LoginResponse};
use crate::state::AppState;

/// Credentials sent as a JSON body or query string, used when no Authorization header is sent
#[derive(Debug, Default, Deserialize)]
pub struct LoginFields {
    #[serde(rename = "Username")]
    pub username: Option<String>,
    #[serde(rename = "Password")]
    pub password: Option<String>,
}

/// POST /login - exchange credentials for a signed token
///
/// Credentials come from `Authorization: Basic`, otherwise field by field from a JSON body
/// then the query string. Responds `{"user": <User>, "token": "<jwt>"}`. Every failure,
/// whether malformed credentials, an unknown user or a wrong password, is the same opaque 401.
pub async fn login_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LoginFields>,
    body: Result<Json<LoginFields>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    // An absent or unreadable body just means the credentials are elsewhere
    let body = body.map(|Json(fields)| fields).unwrap_or_default();
    let credentials = credentials_from_request(&headers, body, query)?;

    let response = AccountService::from_state(&state).login(&credentials).await?;
    info!("Issued token for {}", response.user.username);

    Ok(ApiResponse::success(response))
}

fn credentials_from_request(
    headers: &HeaderMap,
    body: LoginFields,
    query: LoginFields,
) -> Result<Credentials, ApiError> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        return value
            .to_str()
            .ok()
            .and_then(parse_basic_credentials)
            .ok_or_else(|| {
                debug!("Login rejected: unreadable basic credentials");
                ApiError::unauthorized(UNAUTHORIZED_MESSAGE)
            });
    }

    let username = body.username.or(query.username);
    let password = body.password.or(query.password);
    match (username, password) {
        (Some(username), Some(password)) if !username.is_empty() => Ok(Credentials { username, password }),
        _ => {
            debug!("Login rejected: no credentials supplied");
            Err(ApiError::unauthorized(UNAUTHORIZED_MESSAGE))
        }
    }
}
