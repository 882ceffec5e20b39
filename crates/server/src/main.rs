use std::sync::Arc;

use anyhow::Result;
use doxify_server::api::run_api;
use doxify_server::config::loader::load_with_discovery;
use doxify_server::page::open_registry;
use doxify_server::supervisor::Supervisor;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_with_discovery()?;
    let addr = config.server.socket_addr().map_err(anyhow::Error::msg)?;
    let registry = Arc::new(open_registry(&config).await?);

    let mut supervisor = Supervisor::new();
    supervisor.spawn("api", move |shutdown| run_api(registry, addr, shutdown));
    supervisor.run().await
}
