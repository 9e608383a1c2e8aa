use std::time::Duration;

use rumqttc::{ClientError, ConnectReturnCode, ConnectionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MqttError {
    #[error("connection failed: {0}")]
    Connection(#[from] ConnectionError),
    #[error("broker refused connection: {0:?}")]
    Refused(ConnectReturnCode),
    #[error("request could not be queued: {0}")]
    Client(#[from] ClientError),
    #[error("timed out after {0:?} waiting for {1}")]
    Timeout(Duration, &'static str),
    #[error("subscription to {0} rejected by broker")]
    SubscribeRejected(String),
    #[error("disconnected from broker: {0}")]
    Disconnected(String),
}
