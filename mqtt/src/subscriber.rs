use rumqttc::QoS;
use sensor_core::{
    render::{Envelope, print_update},
    signal,
};
use tokio::select;

use crate::{
    error::MqttError,
    session::{ConnectOptions, MqttSession},
};

/// Subscribes to `topic` and prints every message until Ctrl-C.
///
/// Harper replays the retained record first, then live updates. A dropped
/// connection ends the subscription with an error.
pub async fn follow(options: ConnectOptions, topic: &str) -> Result<(), MqttError> {
    let mut session = MqttSession::connect(options).await?;
    println!("Connected to MQTT broker");

    if let Err(err) = session.subscribe(topic, QoS::AtLeastOnce).await {
        session.disconnect().await;
        return Err(err);
    }
    println!("Subscribed to: {topic}");
    println!("Listening for messages...\n");

    let shutdown = signal::ctrl_c();
    tokio::pin!(shutdown);

    let outcome = loop {
        select! {
            _ = &mut shutdown => {
                println!("\nStopping subscriber...");
                break Ok(());
            }
            message = session.next_message() => match message {
                Ok(publish) => {
                    let body = String::from_utf8_lossy(&publish.payload);
                    print_update(&publish.topic, &body, Envelope::Bare);
                }
                Err(err) => {
                    println!("Unexpected disconnection: {err}");
                    break Err(err);
                }
            }
        }
    };

    session.disconnect().await;
    outcome
}
