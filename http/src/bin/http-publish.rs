//! Publishes sensor readings with HTTP PUT.
//!
//! ```bash
//! http-publish                                    # generated readings every 5 seconds
//! http-publish '{"temp":72.5,"location":"test"}'  # one PUT of the given payload
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use harper_http::HttpPublisher;
use sensor_core::{cli::PublishCli, publish::PublishLoop, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = PublishCli::parse();
    let one_shot = cli.one_shot()?;
    let url = cli.harper.http_url(cli.harper.resource());
    let mut publisher = HttpPublisher::new(url).context("failed to build HTTP client")?;

    println!("Connected to Harper (HTTP)");
    match one_shot {
        Some(payload) => {
            publisher.put(&payload).await?;
            println!("Published: {payload}");
        }
        None => {
            println!("Publishing every 5 seconds... (Ctrl+C to stop)\n");
            PublishLoop::generated()
                .run_until_ctrl_c(&mut publisher)
                .await;
            println!("\nStopping publisher...");
        }
    }

    Ok(())
}
