use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Director, Genre, Movie, NewUser, User};
use crate::database::store::Store;

const MOVIE_COLUMNS: &str =
    "id, title, description, genre, director, actors, year, image_path, featured";
const MOVIE_ORDER: &str = "seq";
const USER_COLUMNS: &str = "id, username, password, email, birthday, favorite_movies";

#[derive(Debug, FromRow)]
struct MovieRow {
    id: Uuid,
    title: String,
    description: String,
    genre: Json<Genre>,
    director: Json<Director>,
    actors: Vec<String>,
    year: Option<i32>,
    image_path: String,
    featured: bool,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            title: row.title,
            description: row.description,
            genre: row.genre.0,
            director: row.director.0,
            actors: row.actors,
            year: row.year,
            image_path: row.image_path,
            featured: row.featured,
        }
    }
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_movie_where(&self, predicate: &str, value: &str) -> Result<Option<Movie>, DatabaseError> {
        let sql = first_movie_sql(predicate);
        let row = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Movie::from))
    }
}

/// First movie in insertion order, matching how the memory store scans
fn first_movie_sql(predicate: &str) -> String {
    format!(
        "SELECT {} FROM movies WHERE {} = $1 ORDER BY {} LIMIT 1",
        MOVIE_COLUMNS, predicate, MOVIE_ORDER
    )
}

/// A unique-index hit on users.username becomes a duplicate-username error
fn map_username_conflict(err: sqlx::Error, username: &str) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DatabaseError::Duplicate(username.to_string())
        }
        _ => DatabaseError::Sqlx(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError> {
        let sql = format!("SELECT {} FROM movies ORDER BY {}", MOVIE_COLUMNS, MOVIE_ORDER);
        let rows = sqlx::query_as::<_, MovieRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, DatabaseError> {
        self.find_movie_where("title", title).await
    }

    async fn find_movie_by_genre(&self, genre_name: &str) -> Result<Option<Movie>, DatabaseError> {
        self.find_movie_where("genre->>'Name'", genre_name).await
    }

    async fn find_movie_by_director(&self, director_name: &str) -> Result<Option<Movie>, DatabaseError> {
        self.find_movie_where("director->>'Name'", director_name).await
    }

    async fn insert_movie(&self, movie: Movie) -> Result<Movie, DatabaseError> {
        let sql = format!(
            "INSERT INTO movies ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title, description = EXCLUDED.description,
                genre = EXCLUDED.genre, director = EXCLUDED.director,
                actors = EXCLUDED.actors, year = EXCLUDED.year,
                image_path = EXCLUDED.image_path, featured = EXCLUDED.featured
             RETURNING {cols}",
            cols = MOVIE_COLUMNS
        );
        let row = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(movie.id)
            .bind(&movie.title)
            .bind(&movie.description)
            .bind(Json(&movie.genre))
            .bind(Json(&movie.director))
            .bind(&movie.actors)
            .bind(movie.year)
            .bind(&movie.image_path)
            .bind(movie.featured)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, username, password, email, birthday)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .bind(user.birthday)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_username_conflict(e, &user.username))
    }

    async fn replace_user(&self, username: &str, update: NewUser) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET username = $2, password = $3, email = $4, birthday = $5
             WHERE username = $1
             RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(&update.username)
            .bind(&update.password_hash)
            .bind(&update.email)
            .bind(update.birthday)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_username_conflict(e, &update.username))
    }

    async fn push_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET favorite_movies = array_append(favorite_movies, $2)
             WHERE username = $1
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn pull_favorite(&self, username: &str, movie_id: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET favorite_movies = array_remove(favorite_movies, $2)
             WHERE username = $1
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("DELETE FROM users WHERE username = $1 RETURNING {}", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
