//! # Bookshelf API Server
//!
//! Serves the book, review and user catalogue over HTTP, with JWT-protected
//! writes and email/password registration.
//!
//! ## Startup
//!
//! 1. Load `.env` and configuration from the environment
//! 2. Connect to PostgreSQL and apply embedded migrations
//! 3. Seed sample data when `SEED_DATA=true` and the catalogue is empty
//! 4. Serve until Ctrl-C or SIGTERM, then drain and close the pool
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/bookshelf \
//! JWT_SECRET=change-me-to-a-long-random-secret-value \
//! cargo run -p bookshelf-api
//! ```

use bookshelf_api::{
    app::{build_router, AppState},
    config::Config,
};
use bookshelf_shared::{
    db::{migrations, pool, seed},
    repositories::UnitOfWork,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        "Bookshelf API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    migrations::ensure_database_exists(&config.database.url).await?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let status = migrations::get_migration_status(&db).await?;
    tracing::info!(
        applied = status.applied_migrations,
        latest = ?status.latest_version,
        "Database schema ready"
    );

    let uow = UnitOfWork::postgres(db.clone());

    if config.seed_data && seed::seed_if_empty(&uow).await? {
        tracing::info!("Sample data inserted");
    }

    let bind_address = config.bind_address();
    let state = AppState::new(config, uow, Some(db.clone()));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Installs the global subscriber; `LOG_FORMAT=json` selects JSON lines
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "bookshelf_api=debug,bookshelf_shared=debug,tower_http=info".into()
    });

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
