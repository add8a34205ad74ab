use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Movie, NewUser, User};

/// Persistence collaborator behind every handler.
///
/// Lookups that may miss return `Ok(None)`; only infrastructure problems and username
/// collisions are errors. Updates return the record as it is after the write.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Movies
    async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError>;
    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, DatabaseError>;
    async fn find_movie_by_genre(&self, genre_name: &str) -> Result<Option<Movie>, DatabaseError>;
    async fn find_movie_by_director(&self, director_name: &str) -> Result<Option<Movie>, DatabaseError>;
    async fn insert_movie(&self, movie: Movie) -> Result<Movie, DatabaseError>;

    // Users
    async fn find_user(&self, username: &str) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    /// Fails with [`DatabaseError::Duplicate`] when the username is taken
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    /// Full replace of the four mutable fields of the user named `username`
    async fn replace_user(&self, username: &str, update: NewUser) -> Result<Option<User>, DatabaseError>;
    /// Append without dedup
    async fn push_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>, DatabaseError>;
    /// Remove every occurrence
    async fn pull_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>, DatabaseError>;
    /// Returns the removed record
    async fn delete_user(&self, username: &str) -> Result<Option<User>, DatabaseError>;
}
