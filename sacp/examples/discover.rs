//! Discovery example: list the first supported printer on the LAN

use std::time::Duration;

use sacp::{Discovery, DiscoveryConfig};

#[tokio::main]
async fn main() -> sacp::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let timeout = std::env::var("DISCOVER_TIMEOUT")
        .ok()
        .and_then(|secs| secs.parse().ok())
        .unwrap_or(5);

    let discovery =
        Discovery::new(DiscoveryConfig::default().with_timeout(Duration::from_secs(timeout)));

    let device = discovery.discover().await?;
    println!("✓ {}", device);
    println!("  discovered at {}", device.discovered_at);

    Ok(())
}
