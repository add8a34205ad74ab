//! Shared fixtures for in-crate router tests: memory-backed state, a call-counting store
//! and `oneshot` request helpers.


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::models::{Director, Genre, Movie, NewUser, User};
use crate::database::{DatabaseError, MemoryStore, Store};
use crate::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret";

/// Development preset with a fixed secret and the cheapest bcrypt cost
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_JWT_SECRET.to_string();
    config.security.bcrypt_cost = 4;
    config
}

pub fn sample_movies() -> Vec<Movie> {
    vec![
        movie("Alien", "Science Fiction", "Ridley Scott"),
        movie("Heat", "Crime", "Michael Mann"),
        movie("Blade Runner", "Science Fiction", "Ridley Scott"),
    ]
}

fn movie(title: &str, genre: &str, director: &str) -> Movie {
    Movie {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: format!("{} description", title),
        genre: Genre {
            name: genre.to_string(),
            description: format!("{} films", genre),
        },
        director: Director {
            name: director.to_string(),
            bio: format!("{} bio", director),
            birth: None,
            death: None,
        },
        actors: Vec::new(),
        year: None,
        image_path: String::new(),
        featured: false,
    }
}

pub fn state_with(config: AppConfig, store: Arc<dyn Store>) -> AppState {
    AppState::new(config, store).unwrap()
}

/// Router over a memory store seeded with [`sample_movies`]
pub fn test_app() -> Router {
    crate::app(state_with(test_config(), Arc::new(MemoryStore::with_movies(sample_movies()))))
}

pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

pub fn user_body(username: &str, password: &str) -> Value {
    json!({
        "Username": username,
        "Password": password,
        "Email": format!("{}@example.com", username),
        "Birthday": "1990-04-12"
    })
}

pub struct TestRequest {
    builder: axum::http::request::Builder,
    body: Body,
}

impl TestRequest {
    pub fn new(method: Method, uri: &str) -> Self {
        Self {
            builder: Request::builder().method(method).uri(uri),
            body: Body::empty(),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header(header::AUTHORIZATION.as_str(), &format!("Bearer {}", token))
    }

    pub fn json(mut self, body: &Value) -> Self {
        self.builder = self.builder.header(header::CONTENT_TYPE, "application/json");
        self.body = Body::from(body.to_string());
        self
    }

    pub fn raw(mut self, content_type: &str, body: &str) -> Self {
        self.builder = self.builder.header(header::CONTENT_TYPE, content_type);
        self.body = Body::from(body.to_string());
        self
    }

    pub fn build(self) -> Request<Body> {
        self.builder.body(self.body).unwrap()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or_else(|e| panic!("not JSON ({}): {}", e, self.text))
    }
}

pub async fn send(app: &Router, request: TestRequest) -> TestResponse {
    let response = app.clone().oneshot(request.build()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        text: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// Register `username` and return a bearer token for it
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let created = send(app, TestRequest::new(Method::POST, "/users").json(&user_body(username, password))).await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.text);

    let login = send(
        app,
        TestRequest::new(Method::POST, "/login").header("authorization", &basic_auth(username, password)),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK, "{}", login.text);
    login.json()["token"].as_str().unwrap().to_string()
}

/// Memory store that counts every call made through the `Store` trait
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) -> &MemoryStore {
        self.calls.fetch_add(1, Ordering::SeqCst);
        &self.inner
    }
}

#[async_trait]
impl Store for CountingStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.hit().health_check().await
    }
    async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError> {
        self.hit().list_movies().await
    }
    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, DatabaseError> {
        self.hit().find_movie_by_title(title).await
    }
    async fn find_movie_by_genre(&self, genre_name: &str) -> Result<Option<Movie>, DatabaseError> {
        self.hit().find_movie_by_genre(genre_name).await
    }
    async fn find_movie_by_director(&self, director_name: &str) -> Result<Option<Movie>, DatabaseError> {
        self.hit().find_movie_by_director(director_name).await
    }
    async fn insert_movie(&self, movie: Movie) -> Result<Movie, DatabaseError> {
        self.hit().insert_movie(movie).await
    }
    async fn find_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        self.hit().find_user(username).await
    }
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        self.hit().find_user_by_id(id).await
    }
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        self.hit().create_user(user).await
    }
    async fn replace_user(&self, username: &str, update: NewUser) -> Result<Option<User>, DatabaseError> {
        self.hit().replace_user(username, update).await
    }
    async fn push_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>, DatabaseError> {
        self.hit().push_favorite(username, movie_id).await
    }
    async fn pull_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>, DatabaseError> {
        self.hit().pull_favorite(username, movie_id).await
    }
    async fn delete_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        self.hit().delete_user(username).await
    }
}

/// Every call fails as if the pool were exhausted, or panics when `panic` is set
pub struct BrokenStore {
    pub panic: bool,
}

impl BrokenStore {
    fn fail<T>(&self) -> Result<T, DatabaseError> {
        if self.panic {
            panic!("store exploded");
        }
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl Store for BrokenStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.fail()
    }
    async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError> {
        self.fail()
    }
    async fn find_movie_by_title(&self, _: &str) -> Result<Option<Movie>, DatabaseError> {
        self.fail()
    }
    async fn find_movie_by_genre(&self, _: &str) -> Result<Option<Movie>, DatabaseError> {
        self.fail()
    }
    async fn find_movie_by_director(&self, _: &str) -> Result<Option<Movie>, DatabaseError> {
        self.fail()
    }
    async fn insert_movie(&self, _: Movie) -> Result<Movie, DatabaseError> {
        self.fail()
    }
    async fn find_user(&self, _: &str) -> Result<Option<User>, DatabaseError> {
        self.fail()
    }
    async fn find_user_by_id(&self, _: Uuid) -> Result<Option<User>, DatabaseError> {
        self.fail()
    }
    async fn create_user(&self, _: NewUser) -> Result<User, DatabaseError> {
        self.fail()
    }
    async fn replace_user(&self, _: &str, _: NewUser) -> Result<Option<User>, DatabaseError> {
        self.fail()
    }
    async fn push_favorite(&self, _: &str, _: &str) -> Result<Option<User>, DatabaseError> {
        self.fail()
    }
    async fn pull_favorite(&self, _: &str, _: &str) -> Result<Option<User>, DatabaseError> {
        self.fail()
    }
    async fn delete_user(&self, _: &str) -> Result<Option<User>, DatabaseError> {
        self.fail()
    }
}
