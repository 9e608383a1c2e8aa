//! Sends one JSON literal over a WebSocket and closes.
//!
//! ```bash
//! ws-publish-test '{"temp":72.5,"location":"test-lab"}'
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use futures_util::SinkExt;
use harper_ws::{connect, publisher::WsPublisher};
use sensor_core::{cli::OneShotCli, publish::Publisher, telemetry::init_tracing};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = OneShotCli::parse();
    let payload = cli.payload()?;
    let url = cli.harper.ws_url(cli.harper.resource());
    let mut ws = connect(&url)
        .await
        .with_context(|| format!("failed to connect to {url}"))?;
    println!("Connected to Harper WebSocket");

    let sent = WsPublisher::new(&mut ws).publish(&payload).await?;
    println!("Published: {sent}");

    if let Err(error) = ws.close(None).await {
        debug!(%error, "close handshake failed");
    }
    Ok(())
}
