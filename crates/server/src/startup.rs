use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::{init_logging, LogFormat, DEFAULT_FILTER};
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth};
use service::honor::{repo::seaorm::SeaOrmHonorRepository, HonorService};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the honor service over an open connection.
pub fn build_state(db: DatabaseConnection, cfg: &AppConfig) -> auth::ServerState {
    let repo = Arc::new(SeaOrmHonorRepository::new(db));
    auth::ServerState {
        honor: Arc::new(HonorService::new(repo)),
        auth: auth::ServerAuthConfig { jwt_secret: cfg.auth.jwt_secret.clone() },
        max_upload_bytes: cfg.server.max_upload_bytes,
    }
}

pub fn build_app(db: DatabaseConnection, cfg: &AppConfig) -> Router {
    routes::build_router(build_cors(), build_state(db, cfg))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}

/// Public entry: load config, connect, migrate and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    init_logging(LogFormat::parse(&cfg.logging.format), DEFAULT_FILTER);
    if cfg.auth.uses_dev_secret() {
        warn!(event = "dev_jwt_secret", "JWT_SECRET not set; signing with the built-in development secret");
    }

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        info!(event = "migrations_applied", "database schema up to date");
    }

    let app = build_app(db, &cfg);
    let addr: SocketAddr = cfg
        .server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))?;
    info!(%addr, "starting honor server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
