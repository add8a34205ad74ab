use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Stored account. `password` holds the bcrypt hash and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password", skip_serializing, default)]
    pub password: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Birthday")]
    pub birthday: Option<NaiveDate>,
    #[serde(rename = "FavoriteMovies", default)]
    pub favorite_movies: Vec<String>,
}

/// The four fields a registration writes and a full-replace update overwrites
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

impl NewUser {
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            username: self.username,
            password: self.password_hash,
            email: self.email,
            birthday: self.birthday,
            favorite_movies: Vec::new(),
        }
    }
}

impl User {
    /// Overwrite the mutable fields, keeping identity and favorites
    pub fn replace_with(&mut self, update: NewUser) {
        self.username = update.username;
        self.password = update.password_hash;
        self.email = update.email;
        self.birthday = update.birthday;
    }
}
