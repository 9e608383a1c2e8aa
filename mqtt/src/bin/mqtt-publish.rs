//! Publishes sensor readings to Harper's MQTT broker.
//!
//! ```bash
//! mqtt-publish                                    # generated readings every 5 seconds
//! mqtt-publish '{"temp":72.5,"location":"test"}'  # one publish of the given payload
//! MQTT_RETAIN=false mqtt-publish                  # ephemeral messages, nothing stored
//! ```

use anyhow::Result;
use clap::Parser;
use harper_mqtt::{ConnectOptions, MqttPublisher, MqttSession};
use sensor_core::{
    cli::PublishCli, config::retain_from_env, publish::PublishLoop, telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = PublishCli::parse();
    let one_shot = cli.one_shot()?;
    let retain = retain_from_env();
    let topic = cli.harper.resource();

    let mut session = MqttSession::connect(ConnectOptions::from_args(&cli.harper)).await?;
    println!("Connected to MQTT broker");

    match one_shot {
        Some(payload) => {
            let result = session
                .publish_confirmed(topic, payload.as_str(), retain)
                .await;
            session.disconnect().await;
            result?;
            println!("Published: {payload} (retain: {retain})");
        }
        None => {
            println!("Publishing every 5 seconds (retain: {retain})... (Ctrl+C to stop)\n");
            let mut publisher = MqttPublisher::new(&session, topic, retain);
            PublishLoop::generated()
                .run_until_ctrl_c(&mut publisher)
                .await;
            println!("\nStopping publisher...");
            session.disconnect().await;
        }
    }

    Ok(())
}
