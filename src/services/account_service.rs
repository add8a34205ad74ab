use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::{CredentialHasher, Credentials, HashError, JwtError, TokenIssuer};
use crate::database::models::{NewUser, User};
use crate::database::{DatabaseError, Store};
use crate::state::AppState;
use crate::validation::UserPayload;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("Incorrect username or password")]
    InvalidCredentials,
    #[error("{0} was not found")]
    NotFound(String),
    #[error(transparent)]
    Database(DatabaseError),
    #[error(transparent)]
    Hash(#[from] HashError),
    #[error(transparent)]
    Token(#[from] JwtError),
}

impl From<DatabaseError> for AccountError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Duplicate(username) => AccountError::AlreadyExists(username),
            other => AccountError::Database(other),
        }
    }
}

/// Body of a successful `POST /login`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// Registration, credential checks and full-replace updates.
/// Callers validate payloads before handing them over.
pub struct AccountService {
    store: Arc<dyn Store>,
    hasher: CredentialHasher,
    tokens: Arc<TokenIssuer>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, hasher: CredentialHasher, tokens: Arc<TokenIssuer>) -> Self {
        Self { store, hasher, tokens }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.hasher, state.tokens.clone())
    }

    pub async fn register(&self, payload: UserPayload) -> Result<User, AccountError> {
        if self.store.find_user(&payload.username).await?.is_some() {
            return Err(AccountError::AlreadyExists(payload.username));
        }

        let new_user = self.to_new_user(payload).await?;
        let user = self.store.create_user(new_user).await?;
        info!("Registered user {}", user.username);
        Ok(user)
    }

    /// Unknown user and wrong password are indistinguishable to the caller
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AccountError> {
        let Some(user) = self.store.find_user(&credentials.username).await? else {
            debug!("Login rejected: no user {}", credentials.username);
            return Err(AccountError::InvalidCredentials);
        };

        if !self.hasher.verify(&credentials.password, &user.password).await? {
            debug!("Login rejected: wrong password for {}", credentials.username);
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        Ok(LoginResponse { user, token })
    }

    /// Overwrite Username, Password (re-hashed), Email and Birthday of `username`
    pub async fn replace(&self, username: &str, payload: UserPayload) -> Result<User, AccountError> {
        let update = self.to_new_user(payload).await?;
        self.store
            .replace_user(username, update)
            .await?
            .ok_or_else(|| AccountError::NotFound(username.to_string()))
    }

    async fn to_new_user(&self, payload: UserPayload) -> Result<NewUser, AccountError> {
        let password_hash = self.hasher.hash(&payload.password).await?;
        Ok(NewUser {
            username: payload.username,
            password_hash,
            email: payload.email,
            birthday: payload.birthday,
        })
    }
}
