#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use myflix_api::config::AppConfig;
use myflix_api::database::models::Movie;
use myflix_api::database::{MemoryStore, Store};
use myflix_api::{app, AppState};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Seed catalog, written the way a `--seed-movies` file would be
pub fn seed_movies() -> Result<Vec<Movie>> {
    let raw = json!([
        {
            "Title": "Alien",
            "Description": "A crew meets something in the dark.",
            "Genre": { "Name": "Science Fiction", "Description": "Speculative worlds" },
            "Director": { "Name": "Ridley Scott", "Bio": "English director", "Birth": "1937-11-30" },
            "Actors": ["Sigourney Weaver"],
            "Year": 1979,
            "Featured": true
        },
        {
            "Title": "Heat",
            "Genre": { "Name": "Crime", "Description": "Heists and the people chasing them" },
            "Director": { "Name": "Michael Mann", "Bio": "American director" }
        }
    ]);
    Ok(serde_json::from_value(raw)?)
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.server.host = "127.0.0.1".to_string();
    config.security.jwt_secret = "integration-secret".to_string();
    config.security.bcrypt_cost = 4;
    config
}

impl TestServer {
    /// Serve the app in-process on a free port, backed by a seeded memory store
    pub async fn start() -> Result<Self> {
        Self::start_with(test_config()).await
    }

    pub async fn start_with(mut config: AppConfig) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        config.server.port = port;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(MemoryStore::new());
        for movie in seed_movies()? {
            store.insert_movie(movie).await?;
        }

        let state = AppState::new(config, store)?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
            handle,
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<reqwest::Response> {
        let body = json!({
            "Username": username,
            "Password": password,
            "Email": format!("{}@example.com", username),
            "Birthday": "1988-02-29"
        });
        Ok(self.client.post(self.url("/users")).json(&body).send().await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/login"))
            .basic_auth(username, Some(password))
            .send()
            .await?)
    }

    /// Register then log in, returning the bearer token
    pub async fn token_for(&self, username: &str, password: &str) -> Result<String> {
        let created = self.register(username, password).await?;
        anyhow::ensure!(created.status() == StatusCode::CREATED, "register failed: {}", created.status());

        let body: Value = self.login(username, password).await?.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response had no token")
    }
}
