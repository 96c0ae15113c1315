use trade_orders_api::database::{establish_connection_pool, run_migrations};
use trade_orders_api::AppConfig;

/// Apply pending database migrations and exit
fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    if let Err(e) = migrate() {
        tracing::error!("❌ Migration failed: {}", e);
        std::process::exit(1);
    }
}

fn migrate() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let pool = establish_connection_pool(&config.database.url(), 1)?;
    let mut conn = pool.get_conn()?;

    let applied = run_migrations(&mut conn)?;
    if applied.is_empty() {
        tracing::info!("✅ Database schema already up to date");
    } else {
        for version in &applied {
            tracing::info!("   applied {}", version);
        }
        tracing::info!("✅ Migrations completed successfully ({} applied)", applied.len());
    }

    Ok(())
}
