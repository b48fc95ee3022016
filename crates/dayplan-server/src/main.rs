mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use dayplan_api::auth::{AppState, AppStateInner};
use dayplan_auth::TokenService;
use dayplan_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dayplan=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    let auth = config.auth()?;

    // Init database
    let db = Database::open(&config.db_path)?;
    info!("Database ready at {}", config.db_path.display());

    let tokens = TokenService::new(&auth)?;
    info!(
        "Tokens valid for {}h, admin user '{}'",
        tokens.ttl().num_hours(),
        auth.admin.username()
    );

    let state: AppState = Arc::new(AppStateInner {
        db,
        tokens,
        admin: auth.admin,
    });

    let app = dayplan_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    info!("Dayplan server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
