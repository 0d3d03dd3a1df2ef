use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use verdant_api::auth::{AppState, AppStateInner};
use verdant_api::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verdant=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("VERDANT_DB_PATH").unwrap_or_else(|_| "verdant.db".into());
    let host = std::env::var("VERDANT_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("VERDANT_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let session_ttl_days: i64 = std::env::var("VERDANT_SESSION_TTL_DAYS")
        .unwrap_or_else(|_| "30".into())
        .parse()?;

    // Init database
    let db = verdant_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner { db, session_ttl_days });

    let app = routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Verdant server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
