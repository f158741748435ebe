//! Salla webhook server binary.
//!
//! Usage: `salla-webhook-server [config.toml]`

use salla_webhook_server::{load_config, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1);
    let config = load_config(path.as_deref())?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level()?)
        .init();

    run(config).await
}
