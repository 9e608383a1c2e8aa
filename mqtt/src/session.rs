use std::{collections::VecDeque, time::Duration};

use nanoid::nanoid;
use rumqttc::{
    AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet, Publish, QoS,
    SubAck, SubscribeReasonCode,
};
use sensor_core::config::HarperArgs;
use tokio::{sync::mpsc, task::JoinHandle, time::timeout};
use tracing::{debug, info, trace, warn};

use crate::error::MqttError;

pub const KEEP_ALIVE: Duration = Duration::from_secs(60);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const ACK_TIMEOUT: Duration = Duration::from_secs(10);
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const CHANNEL_CAPACITY: usize = 64;
const CLIENT_ID_PREFIX: &str = "harper-sensors";
const DRIVER_STOPPED: &str = "event loop stopped";

#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive: Duration,
}

impl ConnectOptions {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            client_id: format!("{CLIENT_ID_PREFIX}-{}", nanoid!(10)),
            keep_alive: KEEP_ALIVE,
        }
    }

    pub fn from_args(args: &HarperArgs) -> Self {
        let (host, port) = args.mqtt_addr();
        Self::new(host, port)
    }

    fn mqtt_options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options.set_keep_alive(self.keep_alive);
        options
    }
}

/// Broker traffic the driver task forwards to the session.
#[derive(Debug)]
enum SessionEvent {
    Message(Publish),
    PubAck(u16),
    SubAck(SubAck),
    Disconnected(String),
}

/// One connection to the broker.
///
/// The rumqttc event loop lives in a driver task spawned once the broker has
/// acknowledged the connection; everything else goes through the client
/// handle and the event channel.
pub struct MqttSession {
    client: AsyncClient,
    events: mpsc::Receiver<SessionEvent>,
    pending: VecDeque<Publish>,
    driver: JoinHandle<()>,
}

impl MqttSession {
    /// Connects and waits for CONNACK. Refusals and network errors are
    /// returned, never retried.
    pub async fn connect(options: ConnectOptions) -> Result<Self, MqttError> {
        let (client, mut event_loop) = AsyncClient::new(options.mqtt_options(), CHANNEL_CAPACITY);

        timeout(CONNECT_TIMEOUT, wait_for_connack(&mut event_loop))
            .await
            .map_err(|_| MqttError::Timeout(CONNECT_TIMEOUT, "CONNACK"))??;
        info!(
            host = %options.host,
            port = options.port,
            client_id = %options.client_id,
            "connected to broker"
        );

        let (tx, events) = mpsc::channel(CHANNEL_CAPACITY);
        let driver = tokio::spawn(drive(event_loop, tx));

        Ok(Self {
            client,
            events,
            pending: VecDeque::new(),
            driver,
        })
    }

    /// Queues a QoS 1 publish. Returns once rumqttc has accepted the request.
    pub async fn publish(&self, topic: &str, payload: &str, retain: bool) -> Result<(), MqttError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, retain, payload.as_bytes().to_vec())
            .await?;
        debug!(%topic, retain, "publish queued");
        Ok(())
    }

    /// Publishes and waits for the broker's PUBACK.
    pub async fn publish_confirmed(
        &mut self,
        topic: &str,
        payload: &str,
        retain: bool,
    ) -> Result<u16, MqttError> {
        self.publish(topic, payload, retain).await?;
        self.wait_for(ACK_TIMEOUT, "PUBACK", |event| match event {
            SessionEvent::PubAck(pkid) => Some(Ok(pkid)),
            _ => None,
        })
        .await
    }

    pub async fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), MqttError> {
        self.client.subscribe(topic, qos).await?;
        let suback = self
            .wait_for(ACK_TIMEOUT, "SUBACK", |event| match event {
                SessionEvent::SubAck(suback) => Some(Ok(suback)),
                _ => None,
            })
            .await?;

        let rejected = suback
            .return_codes
            .iter()
            .any(|code| matches!(code, SubscribeReasonCode::Failure));
        if rejected {
            return Err(MqttError::SubscribeRejected(topic.to_string()));
        }
        info!(%topic, "subscribed");
        Ok(())
    }

    /// Next message from the broker.
    ///
    /// The driver only stops on its own when the connection drops, so a closed
    /// channel is reported as a disconnect even if the reason was lost.
    pub async fn next_message(&mut self) -> Result<Publish, MqttError> {
        if let Some(publish) = self.pending.pop_front() {
            return Ok(publish);
        }

        loop {
            match self.events.recv().await {
                Some(SessionEvent::Message(publish)) => return Ok(publish),
                Some(SessionEvent::Disconnected(reason)) => {
                    return Err(MqttError::Disconnected(reason));
                }
                Some(event) => trace!(?event, "ignoring broker event"),
                None => return Err(MqttError::Disconnected(DRIVER_STOPPED.into())),
            }
        }
    }

    /// Sends DISCONNECT and gives the driver a moment to flush it.
    pub async fn disconnect(self) {
        if let Err(error) = self.client.disconnect().await {
            debug!(%error, "disconnect request failed");
        }
        if timeout(DISCONNECT_TIMEOUT, self.driver).await.is_err() {
            warn!("driver did not stop after disconnect");
        }
    }

    async fn wait_for<T>(
        &mut self,
        limit: Duration,
        what: &'static str,
        mut accept: impl FnMut(SessionEvent) -> Option<Result<T, MqttError>>,
    ) -> Result<T, MqttError> {
        let events = &mut self.events;
        let pending = &mut self.pending;

        let wait = async {
            loop {
                let event = match events.recv().await {
                    Some(SessionEvent::Message(publish)) => {
                        pending.push_back(publish);
                        continue;
                    }
                    Some(SessionEvent::Disconnected(reason)) => {
                        return Err(MqttError::Disconnected(reason));
                    }
                    Some(event) => event,
                    None => return Err(MqttError::Disconnected(DRIVER_STOPPED.into())),
                };
                if let Some(result) = accept(event) {
                    return result;
                }
            }
        };

        timeout(limit, wait)
            .await
            .map_err(|_| MqttError::Timeout(limit, what))?
    }
}

async fn wait_for_connack(event_loop: &mut EventLoop) -> Result<(), MqttError> {
    loop {
        match event_loop.poll().await? {
            Event::Incoming(Packet::ConnAck(connack)) => {
                if connack.code == ConnectReturnCode::Success {
                    return Ok(());
                }
                return Err(MqttError::Refused(connack.code));
            }
            event => trace!(?event, "event before CONNACK"),
        }
    }
}

async fn drive(mut event_loop: EventLoop, events: mpsc::Sender<SessionEvent>) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if events.send(SessionEvent::Message(publish)).await.is_err() {
                    break;
                }
            }
            Ok(Event::Incoming(Packet::PubAck(puback))) => {
                // Nobody waits on acks in continuous mode; drop them when full.
                let _ = events.try_send(SessionEvent::PubAck(puback.pkid));
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                if events.send(SessionEvent::SubAck(suback)).await.is_err() {
                    break;
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                debug!("disconnect sent");
                break;
            }
            Ok(event) => trace!(?event, "broker event"),
            Err(error) => {
                warn!(%error, "broker connection lost");
                let _ = events.try_send(SessionEvent::Disconnected(error.to_string()));
                break;
            }
        }
    }
}
