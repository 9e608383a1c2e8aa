//! First-generation MQTT publisher on the lowercase `sensors/101` topic.
//!
//! Each flag unlocks the next step of the walkthrough:
//!
//! ```bash
//! publisher                 # one reading, not stored by Harper
//! publisher --persist       # one reading, retained so Harper upserts the record
//! publisher --continuous    # a retained reading every 5 seconds
//! ```

use anyhow::Result;
use clap::Parser;
use harper_mqtt::{ConnectOptions, MqttPublisher, MqttSession};
use sensor_core::{
    Payload,
    config::{HarperArgs, LEGACY_SENSOR_RESOURCE},
    publish::PublishLoop,
    telemetry::init_tracing,
};

#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    harper: HarperArgs,

    /// Retain the reading so Harper stores it as the record's value.
    #[arg(long)]
    persist: bool,

    /// Publish retained readings every 5 seconds until Ctrl-C.
    #[arg(long)]
    continuous: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let topic = cli.harper.resource_or(LEGACY_SENSOR_RESOURCE);

    let mut session = MqttSession::connect(ConnectOptions::from_args(&cli.harper)).await?;
    println!("Connected to MQTT broker");

    if cli.continuous {
        println!("Publishing every 5 seconds... (Ctrl+C to stop)");
        let mut publisher = MqttPublisher::new(&session, topic, true);
        PublishLoop::generated()
            .run_until_ctrl_c(&mut publisher)
            .await;
        println!("\nStopping publisher...");
        session.disconnect().await;
        return Ok(());
    }

    let payload = Payload::generate()?;
    let result = session
        .publish_confirmed(topic, payload.as_str(), cli.persist)
        .await;
    session.disconnect().await;
    result?;
    println!("Published: {payload}");

    Ok(())
}
