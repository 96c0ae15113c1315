use std::sync::Arc;
use trade_orders_api::database::{establish_connection_pool, has_pending_migrations};
use trade_orders_api::{create_router, AppConfig, AppState, OrderRepository, PgOrderRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trade_orders_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => fatal(format!("Invalid configuration: {}", e)),
    };

    tracing::info!("🗄️  Connecting to PostgreSQL at {}:{}...", config.database.host, config.database.port);

    // Pool creation blocks while it opens the first connection
    let database_url = config.database.url();
    let pool_size = config.database.pool_max_size;
    let pool = match tokio::task::spawn_blocking(move || {
        establish_connection_pool(&database_url, pool_size)
    })
    .await
    {
        Ok(Ok(pool)) => pool,
        Ok(Err(e)) => fatal(format!("Failed to connect to database: {}", e)),
        Err(e) => fatal(format!("Failed to connect to database: {}", e)),
    };

    warn_on_pending_migrations(&pool);

    let repository: AppState = Arc::new(PgOrderRepository::new(pool));
    let app = create_router(repository.clone());

    let addr = config.server.addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => fatal(format!("Failed to bind {}: {}", addr, e)),
    };

    tracing::info!("🚀 Trade Orders API running on http://{}", addr);
    tracing::info!("📊 Health check: http://{}/health", addr);
    tracing::info!("📚 Swagger UI: http://{}/docs", addr);
    tracing::info!("   POST /api/v1/orders");
    tracing::info!("   GET  /api/v1/orders");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("❌ Server error: {}", e);
    }

    if let Err(e) = repository.close().await {
        tracing::error!("❌ Failed to close order repository: {}", e);
    }

    tracing::info!("👋 Server stopped");
}

/// Startup failures stop the process immediately
fn fatal(message: String) -> ! {
    tracing::error!("❌ {}", message);
    std::process::exit(1);
}

fn warn_on_pending_migrations(pool: &trade_orders_api::database::DatabasePool) {
    let pending = pool
        .get_conn()
        .and_then(|mut conn| has_pending_migrations(&mut conn));

    match pending {
        Ok(true) => tracing::warn!("⚠️  Pending database migrations, run the `migrate` binary"),
        Ok(false) => tracing::debug!("Database schema is up to date"),
        Err(e) => tracing::warn!("⚠️  Could not check migration status: {}", e),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("🛑 Shutdown signal received");
}
