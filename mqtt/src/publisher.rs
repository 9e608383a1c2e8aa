use sensor_core::{Payload, publish::Publisher};

use crate::{error::MqttError, session::MqttSession};

/// Publishes every payload to one topic with a fixed retain flag.
///
/// Success means rumqttc queued the QoS 1 publish; acknowledgements are not
/// awaited between ticks.
pub struct MqttPublisher<'a> {
    session: &'a MqttSession,
    topic: &'a str,
    retain: bool,
}

impl<'a> MqttPublisher<'a> {
    pub fn new(session: &'a MqttSession, topic: &'a str, retain: bool) -> Self {
        Self {
            session,
            topic,
            retain,
        }
    }
}

impl Publisher for MqttPublisher<'_> {
    type Error = MqttError;

    async fn publish(&mut self, payload: &Payload) -> Result<String, MqttError> {
        self.session
            .publish(self.topic, payload.as_str(), self.retain)
            .await?;
        Ok(payload.to_string())
    }
}
