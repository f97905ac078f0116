//! Headless entry point: loads the catalog and logs what an operator would see.

use anyhow::Context;

use marketdesk_client::{ClientConfig, OrderComposer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    marketdesk_observability::init();

    let config = ClientConfig::from_env().context("invalid client configuration")?;
    tracing::info!(
        base_url = %config.base_url,
        timeout_ms = config.timeout_ms,
        "starting order composer"
    );

    let composer = OrderComposer::from_config(&config).context("failed to build HTTP backend")?;
    composer.load_catalog().await;

    let snapshot = composer.snapshot();
    for article in &snapshot.candidates {
        tracing::info!(code = %article.code, label = %article.label(), "candidate article");
    }
    for seller in &snapshot.sellers {
        tracing::info!(id = %seller.id, description = %seller.description, "seller");
    }

    tracing::info!(
        candidates = snapshot.candidates.len(),
        sellers = snapshot.sellers.len(),
        "catalog ready"
    );
    Ok(())
}
