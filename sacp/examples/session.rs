//! Session example: connect to a known printer and print its reply

use sacp::{Client, ClientConfig};

#[tokio::main]
async fn main() -> sacp::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    // Change to your printer IP
    let ip = std::env::var("PRINTER_IP").unwrap_or_else(|_| "192.168.1.50".to_string());

    let mut client = Client::new(ip, ClientConfig::default());

    let reply = client.connect().await?;
    println!("✓ Session reply: {}", reply);

    client.disconnect().await?;
    println!("✓ Disconnected");

    Ok(())
}
