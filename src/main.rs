use std::net::SocketAddr;

use dotenvy::dotenv;
use foodgram::config::{AppState, Config};
use foodgram::seeders;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::init().expect("Invalid configuration");
    tracing::info!("Starting Foodgram backend...");

    // 1. Database Connection
    let mut opts = ConnectOptions::new(cfg.database_url.clone());
    opts.sqlx_logging(false);
    let db = Database::connect(opts).await.expect("Failed to connect to database");
    tracing::info!("Database connected");

    // 2. Migrations
    if cfg.run_migrations {
        Migrator::up(&db, None).await.expect("Failed to apply migrations");
        tracing::info!("Migrations applied");
    }

    // 3. Seeding
    if let Err(e) = seeders::run_seeders(&db, &cfg).await {
        tracing::error!("Seeding failed: {}", e);
    }

    let addr: SocketAddr = format!("{}:{}", cfg.server_host, cfg.server_port)
        .parse()
        .expect("Invalid HOST/PORT");

    let state = AppState { db, config: cfg };
    let app = foodgram::app(state);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}
