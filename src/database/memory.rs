use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Movie, NewUser, User};
use crate::database::store::Store;

/// In-process store used with `--in-memory` and by the test suites
#[derive(Default)]
pub struct MemoryStore {
    movies: RwLock<Vec<Movie>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(movies: Vec<Movie>) -> Self {
        Self {
            movies: RwLock::new(movies),
            users: RwLock::new(HashMap::new()),
        }
    }
}

fn find_by_username<'a>(users: &'a mut HashMap<Uuid, User>, username: &str) -> Option<&'a mut User> {
    users.values_mut().find(|u| u.username == username)
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError> {
        Ok(self.movies.read().await.clone())
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, DatabaseError> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.title == title).cloned())
    }

    async fn find_movie_by_genre(&self, genre_name: &str) -> Result<Option<Movie>, DatabaseError> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.genre.name == genre_name).cloned())
    }

    async fn find_movie_by_director(&self, director_name: &str) -> Result<Option<Movie>, DatabaseError> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.director.name == director_name).cloned())
    }

    async fn insert_movie(&self, movie: Movie) -> Result<Movie, DatabaseError> {
        let mut movies = self.movies.write().await;
        // Re-inserting keeps the original position
        match movies.iter_mut().find(|m| m.id == movie.id) {
            Some(existing) => *existing = movie.clone(),
            None => movies.push(movie.clone()),
        }
        Ok(movie)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::Duplicate(user.username));
        }
        let id = Uuid::new_v4();
        let user = user.into_user(id);
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn replace_user(&self, username: &str, update: NewUser) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        let taken = users
            .values()
            .any(|u| u.username == update.username && u.username != username);
        if taken {
            return Err(DatabaseError::Duplicate(update.username));
        }
        Ok(find_by_username(&mut users, username).map(|user| {
            user.replace_with(update);
            user.clone()
        }))
    }

    async fn push_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        Ok(find_by_username(&mut users, username).map(|user| {
            user.favorite_movies.push(movie_id.to_string());
            user.clone()
        }))
    }

    async fn pull_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        Ok(find_by_username(&mut users, username).map(|user| {
            user.favorite_movies.retain(|m| m != movie_id);
            user.clone()
        }))
    }

    async fn delete_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        let id = users.values().find(|u| u.username == username).map(|u| u.id);
        Ok(id.and_then(|id| users.remove(&id)))
    }
}
