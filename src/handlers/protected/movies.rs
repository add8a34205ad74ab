// handlers/protected/movies.rs - read-only catalog routes

use axum::extract::{Path, State};

use crate::database::models::{Director, Genre, Movie};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /movies - the whole catalog
pub async fn movies_list(State(state): State<AppState>) -> ApiResult<Vec<Movie>> {
    let movies = state.store.list_movies().await?;
    Ok(ApiResponse::success(movies))
}

/// GET /movies/:Title - exact title match
pub async fn movie_get(State(state): State<AppState>, Path(title): Path<String>) -> ApiResult<Movie> {
    state
        .store
        .find_movie_by_title(&title)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("{} was not found", title)))
}

/// GET /movies/genres/:Name - genre object of the first movie in that genre
pub async fn genre_get(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Genre> {
    state
        .store
        .find_movie_by_genre(&name)
        .await?
        .map(|movie| ApiResponse::success(movie.genre))
        .ok_or_else(|| ApiError::not_found(format!("{} was not found", name)))
}

/// GET /movies/directors/:Name - director object of the first movie they directed
pub async fn director_get(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Director> {
    state
        .store
        .find_movie_by_director(&name)
        .await?
        .map(|movie| ApiResponse::success(movie.director))
        .ok_or_else(|| ApiError::not_found(format!("{} was not found", name)))
}
