// Module declarations
pub mod config;
pub mod error;
pub mod gateway;
pub mod logger;
pub mod pages;
pub mod pagination;
pub mod render;
pub mod router;
pub mod schedule;
pub mod server;

use config::AppConfig;
use gateway::{GatewayClient, JsonSource};
use server::WebServer;
use std::sync::Arc;

pub fn run() -> anyhow::Result<()> {
  logger::init_logger();

  let config = AppConfig::from_env()?;
  log::info!("Starting NontonAnime v{}", env!("CARGO_PKG_VERSION"));

  let runtime = tokio::runtime::Runtime::new()?;
  runtime.block_on(async move {
    let source: Arc<dyn JsonSource> = Arc::new(GatewayClient::new(config.gateway_url.clone()));
    WebServer::new(config, source).start().await
  })
}
