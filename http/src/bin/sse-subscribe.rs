//! Prints every update to the sensor record pushed over Server-Sent Events.

use anyhow::Result;
use clap::Parser;
use harper_http::subscriber::follow;
use sensor_core::{cli::SubscribeCli, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = SubscribeCli::parse();
    let topic = cli.harper.resource();
    let url = cli.harper.http_url(topic);

    follow(&url, topic).await?;
    Ok(())
}
