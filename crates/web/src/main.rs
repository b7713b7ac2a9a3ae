use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use storage::{Database, InMemoryUserStore, UserStore};
use tracker::{LeetCodeClient, SyncContext, SyncOptions};
use web::{
    AppState, app, config::Config, cors_layer, features::admin::services::spawn_periodic_sync,
    middleware::auth::AdminTokens,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting LeetCode Leaderboard API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let admin_tokens = AdminTokens::from_comma_separated(&config.admin_tokens);
    if admin_tokens.is_empty() {
        bail!("No admin token configured");
    }

    let store = open_store(&config).await?;

    let provider = LeetCodeClient::new(config.graphql_url.clone())
        .context("Failed to build LeetCode client")?;
    tracing::info!("Fetching stats from {}", provider.endpoint());

    let sync = SyncContext::new(
        store,
        Arc::new(provider),
        SyncOptions {
            concurrency: config.sync_concurrency,
            min_interval: config.rate_limit_delay,
        },
    );

    if config.sync_interval_minutes > 0 {
        tracing::info!(
            "Scheduled sync every {} minute(s)",
            config.sync_interval_minutes
        );
        spawn_periodic_sync(
            sync.clone(),
            Duration::from_secs(config.sync_interval_minutes * 60),
        );
    }

    let router = app(
        AppState::new(sync),
        admin_tokens,
        cors_layer(&config.cors_origins),
    );

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, router).await?;

    Ok(())
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn UserStore>> {
    let Some(ref database_url) = config.database_url else {
        tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
        return Ok(Arc::new(InMemoryUserStore::new()));
    };

    tracing::info!(
        "Connecting to database at: {}",
        database_url.split('@').next_back().unwrap_or("unknown")
    );
    let db = Database::new(database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    Ok(Arc::new(db.user_store()))
}
