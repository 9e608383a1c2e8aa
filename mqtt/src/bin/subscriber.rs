//! First-generation MQTT subscriber on the lowercase `sensors/101` topic.

use anyhow::Result;
use clap::Parser;
use harper_mqtt::{ConnectOptions, subscriber::follow};
use sensor_core::{cli::SubscribeCli, config::LEGACY_SENSOR_RESOURCE, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = SubscribeCli::parse();
    let topic = cli.harper.resource_or(LEGACY_SENSOR_RESOURCE);
    follow(ConnectOptions::from_args(&cli.harper), topic).await?;
    Ok(())
}
