use std::{future::Future, net::SocketAddr};

use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use common::{env::ensure_env, utils::logging::init_logging_from_env};
use configs::AppConfig;
use service::{RetailDataService, StorageGateway};

use crate::{errors::StartupError, routes, state::AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the storage gateway and, when a database URL is configured, the
/// relational service. Migrations run before the service is handed out.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let conn = cfg.storage.connection().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    ensure_env(&conn.data_root).await.map_err(|e| StartupError::Storage(e.to_string()))?;
    let gateway = StorageGateway::connect(&cfg.storage)
        .await
        .map_err(|e| StartupError::Storage(e.to_string()))?;

    let retail = if cfg.database.is_enabled() {
        let db = models::db::connect_with_config(&cfg.database)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;
        info!("relational service enabled");
        Some(RetailDataService::new(db))
    } else {
        warn!("database.url not set; relational service disabled");
        None
    };

    Ok(AppState { gateway, retail })
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve(
    cfg: &AppConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), StartupError> {
    let state = build_state(cfg).await?;
    let app = routes::build_router(state, build_cors());

    let addr = bind_addr(cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {addr}: {e}")))?;
    info!(%addr, "starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(anyhow::Error::from)?;
    Ok(())
}

/// Public entry: load config, build the app and run until Ctrl+C.
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    serve(&cfg, shutdown_signal()).await
}
