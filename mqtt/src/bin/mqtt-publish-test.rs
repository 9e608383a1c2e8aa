//! Publishes one retained payload given on the command line.
//!
//! ```bash
//! mqtt-publish-test '{"temp":72.5,"location":"test-lab"}'
//! ```

use anyhow::Result;
use clap::Parser;
use harper_mqtt::{ConnectOptions, MqttSession};
use sensor_core::{cli::OneShotCli, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = OneShotCli::parse();
    let payload = cli.payload()?;
    let topic = cli.harper.resource();

    let mut session = MqttSession::connect(ConnectOptions::from_args(&cli.harper)).await?;
    println!("Connected to MQTT broker");

    let result = session.publish_confirmed(topic, payload.as_str(), true).await;
    session.disconnect().await;
    result?;
    println!("Published: {payload}");

    Ok(())
}
