use std::sync::Arc;

use crate::auth::{CredentialHasher, JwtError, TokenIssuer};
use crate::config::AppConfig;
use crate::database::Store;

/// Everything a handler needs, built once in `main` and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenIssuer>,
    pub hasher: CredentialHasher,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, JwtError> {
        let tokens = TokenIssuer::from_config(&config.security)?;
        let hasher = CredentialHasher::new(config.security.bcrypt_cost);
        Ok(Self {
            config: Arc::new(config),
            store,
            tokens: Arc::new(tokens),
            hasher,
        })
    }
}
