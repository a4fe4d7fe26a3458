//! BMI Tracker Backend
//!
//! Records body-mass-index readings for signed-in users and reports
//! system-wide statistics to administrators.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: Business logic
//! - Repositories: Data access
//! - Database: PostgreSQL with SQLx

use anyhow::Result;
use bmi_tracker_backend::{config, db, routes, services::UserService, state::AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting BMI Tracker Backend"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;

    info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    if config.admin.enabled {
        UserService::ensure_admin(&db_pool, &config.admin).await?;
    }

    let state = AppState::new(db_pool, config.clone());
    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "bmi_tracker_backend=info,tower_http=info".into()
        } else {
            "bmi_tracker_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Refuse to start in production with development credentials
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL contains localhost - ensure this is intentional for production");
    }

    let problems = config.production_problems();
    if !problems.is_empty() {
        for problem in &problems {
            error!("Configuration error: {}", problem);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
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
            Ok(mut sig) => {
                sig.recv().await;
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
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
