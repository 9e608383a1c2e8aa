//! Prints every update published to the sensor topic.

use anyhow::Result;
use clap::Parser;
use harper_mqtt::{ConnectOptions, subscriber::follow};
use sensor_core::{cli::SubscribeCli, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = SubscribeCli::parse();
    follow(ConnectOptions::from_args(&cli.harper), cli.harper.resource()).await?;
    Ok(())
}
