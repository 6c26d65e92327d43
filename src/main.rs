use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linkmint::{
    authorizer::{sqlite::SqliteApiKeyRegistry, AccessGateway},
    config::AppConfig,
    keygen::RandomKeyGenerator,
    service::LinkService,
    store::sqlite::SqliteLinkStore,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent — env vars may already be set)
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkmint=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env()?;
    tracing::info!("Starting linkmint on {}:{}", config.host, config.port);
    tracing::info!(
        "Region: {}, link table: {}",
        config.region,
        config.table_name
    );

    // Open SQLite connection pool, creating the file if it doesn't exist yet
    let db = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(
            config
                .database_url
                .parse::<sqlx::sqlite::SqliteConnectOptions>()?
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal),
        )
        .await?;

    // Prepare the link table and key registry before accepting traffic
    let store = SqliteLinkStore::new(db.clone(), &config.table_name)?;
    store.ensure_schema().await?;

    let registry = SqliteApiKeyRegistry::new(db);
    registry.ensure_schema().await?;
    tracing::info!("Database schema ready");

    // Build shared state
    let state = Arc::new(AppState {
        service: LinkService::new(Arc::new(store), Arc::new(RandomKeyGenerator)),
        gateway: AccessGateway::new(Arc::new(registry)),
        config,
    });

    let bind_addr = format!("{}:{}", state.config.host, state.config.port);
    let app = linkmint::router(state).layer(TraceLayer::new_for_http());

    // ── Serve ──────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
