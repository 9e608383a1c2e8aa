//! Console rendering for subscribers.
//!
//! Harper pushes record changes over WebSocket and SSE wrapped in a change
//! envelope whose `value` field holds the record. MQTT delivers the record
//! itself. Either way, a message that is not JSON, or lacks a field, is shown
//! raw rather than dropped.

use chrono::Local;
use serde_json::Value;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// How a transport packages records on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// The message body is the record.
    Bare,
    /// The record may sit under a `value` key; fall back to the whole body.
    ChangeEvent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Reading { temp: String, location: String },
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    Update(Update),
    /// Valid JSON that does not carry a reading. Printed raw, worth a warning.
    MissingField {
        field: &'static str,
        raw: String,
    },
}

pub fn interpret(body: &str, envelope: Envelope) -> Interpretation {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return Interpretation::Update(Update::Raw(body.to_string()));
    };

    let record = match envelope {
        Envelope::ChangeEvent => parsed.get("value").unwrap_or(&parsed),
        Envelope::Bare => &parsed,
    };

    let Some(temp) = record.get("temp") else {
        return Interpretation::MissingField {
            field: "temp",
            raw: body.to_string(),
        };
    };
    let Some(location) = record.get("location") else {
        return Interpretation::MissingField {
            field: "location",
            raw: body.to_string(),
        };
    };

    Interpretation::Update(Update::Reading {
        temp: display_scalar(temp),
        location: display_scalar(location),
    })
}

impl Interpretation {
    pub fn into_update(self) -> Update {
        match self {
            Interpretation::Update(update) => update,
            Interpretation::MissingField { raw, .. } => Update::Raw(raw),
        }
    }
}

// Strings print without their JSON quotes.
fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Formats one update block, including the trailing blank line.
pub fn render(topic: &str, update: &Update, timestamp: &str) -> String {
    match update {
        Update::Reading { temp, location } => format!(
            "[{timestamp}] Update on {topic}:\n  Temperature: {temp}°F\n  Location: {location}\n"
        ),
        Update::Raw(raw) => format!("[{timestamp}] Update on {topic}: {raw}\n"),
    }
}

pub fn local_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Interprets and prints a received message, warning about JSON that carries
/// no reading.
pub fn print_update(topic: &str, body: &str, envelope: Envelope) {
    let interpretation = interpret(body, envelope);
    if let Interpretation::MissingField { field, .. } = &interpretation {
        tracing::warn!(%topic, field, "error processing message: missing field");
    }
    println!(
        "{}",
        render(topic, &interpretation.into_update(), &local_timestamp())
    );
}
