use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use myflix_api::config::AppConfig;
use myflix_api::database::models::Movie;
use myflix_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use myflix_api::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "myflix-api", version, about = "Movie catalog and user accounts over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Interface to bind
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// PostgreSQL connection string (falls back to CONNECTION_URI, then DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Keep everything in process memory instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,

    /// JSON array of movies to load at startup
    #[arg(long, value_name = "FILE")]
    seed_movies: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so PORT, CONNECTION_URI, JWT_SECRET etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("myflix_api=debug,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    config.validate().context("invalid configuration")?;
    info!("Starting myFlix API in {:?} mode", config.environment);

    let mut pool = None;
    let store: Arc<dyn Store> = if args.in_memory {
        info!("Using in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        let pg = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to PostgreSQL")?;
        pool = Some(pg.clone());
        Arc::new(PgStore::new(pg))
    };

    if let Some(path) = args.seed_movies {
        let loaded = seed_movies(store.as_ref(), &path).await?;
        info!("Seeded {} movies from {}", loaded, path.display());
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.server.host, config.server.port))?;

    let state = AppState::new(config, store).context("failed to initialise token signing")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("myFlix API listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pool) = pool {
        DatabaseManager::close(&pool).await;
    }
    info!("Server stopped");
    Ok(())
}

async fn seed_movies(store: &dyn Store, path: &Path) -> anyhow::Result<usize> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let movies: Vec<Movie> =
        serde_json::from_str(&raw).with_context(|| format!("{} is not a JSON array of movies", path.display()))?;

    let count = movies.len();
    for movie in movies {
        store.insert_movie(movie).await?;
    }
    Ok(count)
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
