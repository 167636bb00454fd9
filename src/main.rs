mod app;
mod config;
mod db;
mod device;
mod model;
mod routes;
mod schema;
mod state;

use std::sync::Arc;

use anyhow::Result;
use env_logger::Env;
use log::{info, warn};

use crate::config::Config;
use crate::device::{DeviceRegistry, DeviceScanner, Notifier};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    std::fs::create_dir_all(&config.upload_dir)?;
    db::init(&config.database_url)?;
    info!("database ready at {}", config.database_url);

    let registry = DeviceRegistry::new();
    let backend = device::platform_backend();
    if backend.is_none() {
        warn!("built without serial support; device notifications are disabled");
    }
    let scanner = Arc::new(DeviceScanner::new(backend, registry.clone()));
    if scanner.available() {
        let scanner = scanner.clone();
        tokio::spawn(async move {
            scanner.run().await;
        });
    }
    let notifier = Notifier::new(scanner, registry.clone());

    let state = AppState {
        config: config.clone(),
        registry,
        notifier,
    };

    let app = app::build_app(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
