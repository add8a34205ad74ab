use std::any::Any;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{cors_layer, jwt_auth_middleware, origin_guard};
use crate::state::AppState;

/// The whole HTTP surface. Layers, outermost first: request tracing, panic recovery,
/// origin guard, CORS headers.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        .merge(public_routes())
        .merge(movie_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .fallback(not_found)
        .layer(cors)
        .layer(middleware::from_fn_with_state(state.clone(), origin_guard))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root_get))
        .route("/health", get(public::health_get))
        .route("/login", post(public::login_post))
        .route("/users", post(public::register_post))
}

fn movie_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/movies", get(protected::movies_list))
        .route("/movies/:Title", get(protected::movie_get))
        .route("/movies/genres/:Name", get(protected::genre_get))
        .route("/movies/directors/:Name", get(protected::director_get))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/users/:Username",
            get(protected::user_get)
                .put(protected::user_put)
                .delete(protected::user_delete),
        )
        .route(
            "/users/:Username/movies/:MovieID",
            post(protected::favorite_post).delete(protected::favorite_delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    ApiError::internal_server_error("Something broke!").into_response()
}
