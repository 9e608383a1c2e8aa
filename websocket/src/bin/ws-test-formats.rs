//! Sends each known envelope shape to the `Sensors/` collection, one
//! connection per shape, and prints whatever Harper answers.
//!
//! Watch Harper's own log for how each shape was handled.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use harper_ws::{
    connect,
    formats::{Format, formats},
};
use sensor_core::{
    config::{HarperArgs, SENSOR_COLLECTION},
    telemetry::init_tracing,
};
use tokio::time::{Instant, sleep, timeout_at};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

const SEND_DELAY: Duration = Duration::from_millis(100);
const RESPONSE_WINDOW: Duration = Duration::from_secs(1);
const PAUSE_BETWEEN: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    harper: HarperArgs,

    /// Only send the format with this 1-based number.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=15))]
    only: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let resource = cli.harper.resource_or(SENSOR_COLLECTION);
    let url = cli.harper.ws_url(resource);

    println!("=== WebSocket Message Format Tester ===");
    println!("{}", banner_target(resource));
    println!("Watch Harper console for any trace logs\n");

    let formats = formats();
    let total = formats.len();
    for (index, format) in formats.iter().enumerate() {
        let number = index + 1;
        if cli.only.is_some_and(|only| usize::from(only) != number) {
            continue;
        }

        println!("\n=== Testing format {number}/{total}: {} ===", format.name);
        println!("Payload: {}", serde_json::to_string_pretty(&format.data)?);

        if let Err(err) = probe(&url, format).await {
            eprintln!("Error: {err:#}");
        }
        sleep(PAUSE_BETWEEN).await;
    }

    println!("\n=== All formats tested ===");
    Ok(())
}

fn banner_target(resource: &str) -> String {
    format!("Testing different message formats against /{resource}")
}

async fn probe(url: &str, format: &Format) -> Result<()> {
    let mut ws = connect(url).await?;
    println!("Connected");

    sleep(SEND_DELAY).await;
    ws.send(Message::text(serde_json::to_string(&format.data)?)).await?;
    println!("Sent");

    let deadline = Instant::now() + RESPONSE_WINDOW;
    while let Ok(Some(message)) = timeout_at(deadline, ws.next()).await {
        match message {
            Ok(Message::Text(text)) => println!("RESPONSE: {}", text.as_str()),
            Ok(Message::Binary(bytes)) => println!("RESPONSE: {}", String::from_utf8_lossy(&bytes)),
            Ok(Message::Close(frame)) => {
                debug!(?frame, "server closed first");
                break;
            }
            Ok(_) => {}
            Err(error) => {
                warn!(%error, "read failed");
                break;
            }
        }
    }

    if let Err(error) = ws.close(None).await {
        debug!(%error, "close handshake failed");
    }
    println!("Closed");
    Ok(())
}
