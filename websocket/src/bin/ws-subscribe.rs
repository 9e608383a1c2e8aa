//! Follows `Sensors/101` over a WebSocket.

use anyhow::{Context, Result};
use clap::Parser;
use harper_ws::{StreamEnd, connect, subscriber::follow};
use sensor_core::{cli::SubscribeCli, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = SubscribeCli::parse();
    let topic = cli.harper.resource();
    let url = cli.harper.ws_url(topic);
    let ws = connect(&url)
        .await
        .with_context(|| format!("failed to connect to {url}"))?;
    println!("Connected to Harper WebSocket");

    let end = follow(ws, topic).await.context("websocket stream failed")?;
    if let StreamEnd::Closed { .. } = end {
        println!("Connection closed");
    }
    Ok(())
}
