use std::fmt;

use serde_json::value::RawValue;
use thiserror::Error;

use crate::reading::SensorReading;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Validated JSON text ready to go on the wire.
///
/// Literals passed on the command line are kept exactly as typed; only their
/// validity is checked. Generated readings are serialized once, compactly.
#[derive(Debug, Clone)]
pub struct Payload(Box<RawValue>);

impl Payload {
    pub fn parse(literal: &str) -> Result<Self, PayloadError> {
        RawValue::from_string(literal.trim().to_string())
            .map(Self)
            .map_err(PayloadError::InvalidJson)
    }

    pub fn from_reading(reading: &SensorReading) -> Result<Self, PayloadError> {
        serde_json::value::to_raw_value(reading)
            .map(Self)
            .map_err(PayloadError::Encode)
    }

    /// Generates a fresh warehouse reading.
    pub fn generate() -> Result<Self, PayloadError> {
        Self::from_reading(&SensorReading::generate())
    }

    pub fn as_str(&self) -> &str {
        self.0.get()
    }

    /// The payload as a one-element JSON array, the shape Harper's WebSocket
    /// endpoint accepts for writes.
    pub fn wrapped_in_array(&self) -> Result<String, PayloadError> {
        serde_json::to_string(&[&*self.0]).map_err(PayloadError::Encode)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
