use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::laboratory::{JsonFileLaboratoryRepository, LaboratoryService};

use crate::routes::{self, AppState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Bind address and storage path from config.toml, falling back to env vars
/// when no config file is present. A config file that omits the storage path
/// still picks up STORAGE_PATH via the configs crate's normalization.
fn load_runtime_config() -> anyhow::Result<(SocketAddr, String)> {
    let (host, port, storage_path) = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => (cfg.server.host, cfg.server.port, cfg.storage.path),
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            let storage_path = env::var("STORAGE_PATH")
                .unwrap_or_else(|_| "data/laboratories.json".to_string());
            (host, port, storage_path)
        }
    };
    let addr = format!("{}:{}", host, port).parse()?;
    Ok((addr, storage_path))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let (addr, storage_path) = load_runtime_config()?;
    let repo = JsonFileLaboratoryRepository::new(storage_path.as_str()).await?;
    let state = AppState {
        laboratories: Arc::new(LaboratoryService::new(Arc::new(repo))),
    };

    let cors = build_cors();
    let app: Router = routes::build_router(state, cors);

    info!(%addr, storage = %storage_path, "starting laboratory service");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
