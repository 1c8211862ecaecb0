use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use chirpy_api::auth::{AppState, AppStateInner};
use chirpy_api::routes;
use chirpy_api::service::Service;
use chirpy_db::Store;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "dev-secret-change-me", "secret"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirpy=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_default();
    if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
        eprintln!("FATAL: JWT_SECRET is unset or still a placeholder.");
        eprintln!("       Set it in your .env file and restart.");
        std::process::exit(1);
    }

    let polka_key = std::env::var("POLKA_KEY").unwrap_or_default();
    if polka_key.is_empty() {
        warn!("POLKA_KEY is unset; payment webhooks will be rejected");
    }

    let db_path: PathBuf = std::env::var("CHIRPY_DB_PATH")
        .unwrap_or_else(|_| "database.json".into())
        .into();
    let static_dir: PathBuf = std::env::var("CHIRPY_STATIC_DIR")
        .unwrap_or_else(|_| ".".into())
        .into();
    let host = std::env::var("CHIRPY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CHIRPY_PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()?;

    // Init store; failing here aborts startup
    let store = Arc::new(Store::open(&db_path)?);

    let service = Service::new(store, &jwt_secret);
    let state: AppState = Arc::new(AppStateInner::new(service, polka_key));

    let app = routes::router(state, &static_dir);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Chirpy listening on {}", addr);
    info!("Serving static files from {}", static_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
