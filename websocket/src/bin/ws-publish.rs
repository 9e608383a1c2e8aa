//! Publishes sensor readings over a WebSocket to `Sensors/101`.
//!
//! ```bash
//! ws-publish                                    # generated readings every 5 seconds
//! ws-publish '{"temp":72.5,"location":"test"}'  # one array-wrapped write
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use futures_util::SinkExt;
use harper_ws::{
    StreamEnd, connect,
    publisher::{BRIDGE_LINGER, REPLY_WAIT, WsPublisher, await_reply, publish_continuously},
};
use sensor_core::{cli::PublishCli, publish::Publisher, telemetry::init_tracing};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = PublishCli::parse();
    let one_shot = cli.one_shot()?;
    let url = cli.harper.ws_url(cli.harper.resource());
    let mut ws = connect(&url)
        .await
        .with_context(|| format!("failed to connect to {url}"))?;
    println!("Connected to Harper WebSocket");

    match one_shot {
        Some(payload) => {
            let mut publisher = WsPublisher::new(&mut ws);
            let sent = publisher.publish(&payload).await?;
            println!("Published: {sent}");

            if let Some(reply) = await_reply(&mut ws, REPLY_WAIT).await {
                debug!(?reply, "harper replied");
            }
            tokio::time::sleep(BRIDGE_LINGER).await;
            if let Err(error) = ws.close(None).await {
                debug!(%error, "close handshake failed");
            }
        }
        None => {
            println!("Publishing every 5 seconds... (Ctrl+C to stop)\n");
            match publish_continuously(ws).await {
                StreamEnd::Interrupted => println!("\nStopping publisher..."),
                closed => {
                    if let Some(line) = closed.describe() {
                        println!("{line}");
                    }
                }
            }
        }
    }

    Ok(())
}
