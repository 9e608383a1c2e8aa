//! Envelope shapes tried against the `Sensors/` collection to find which
//! ones Harper accepts as a write over WebSocket.

use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct Format {
    pub name: &'static str,
    pub data: Value,
}

impl Format {
    fn new(name: &'static str, data: Value) -> Self {
        Self { name, data }
    }
}

pub fn formats() -> Vec<Format> {
    vec![
        Format::new("Plain JSON", json!({"temp": 70.0, "location": "warehouse"})),
        Format::new(
            "Plain JSON with ID",
            json!({"id": "101", "temp": 75.0, "location": "warehouse"}),
        ),
        Format::new(
            "HTTP-like (method/body)",
            json!({"method": "PUT", "body": {"temp": 80.0, "location": "warehouse"}}),
        ),
        Format::new(
            "HTTP-like (method/headers/body)",
            json!({
                "method": "PUT",
                "headers": {"Content-Type": "application/json"},
                "body": {"temp": 80.5, "location": "warehouse"}
            }),
        ),
        Format::new(
            "HTTP-like (method/path/body)",
            json!({
                "method": "PUT",
                "path": "/Sensors/101",
                "body": {"temp": 85.0, "location": "warehouse"}
            }),
        ),
        Format::new(
            "Type/Value wrapper",
            json!({"type": "put", "value": {"temp": 85.5, "location": "warehouse"}}),
        ),
        Format::new(
            "Type/ID/Value wrapper",
            json!({"type": "put", "id": "101", "value": {"temp": 90.0, "location": "warehouse"}}),
        ),
        Format::new(
            "Action/Data",
            json!({"action": "put", "data": {"temp": 90.5, "location": "warehouse"}}),
        ),
        Format::new(
            "Operation format",
            json!({
                "operation": "update",
                "table": "Sensors",
                "id": "101",
                "data": {"temp": 95.5, "location": "warehouse"}
            }),
        ),
        Format::new(
            "Transaction format",
            json!({
                "operation": "update",
                "schema": "data",
                "table": "Sensors",
                "records": [{"id": "101", "temp": 75.5, "location": "warehouse"}]
            }),
        ),
        Format::new(
            "HDB_TRANSACTION wrapper",
            json!({
                "type": "HDB_TRANSACTION",
                "transaction": {
                    "operation": "update",
                    "schema": "data",
                    "table": "Sensors",
                    "records": [{"id": "101", "temp": 75.5, "location": "warehouse"}]
                }
            }),
        ),
        Format::new(
            "Request format",
            json!({
                "request": "PUT",
                "resource": "/Sensors/101",
                "payload": {"temp": 75.5, "location": "warehouse"}
            }),
        ),
        Format::new(
            "URL command",
            json!({
                "url": "/Sensors/101",
                "method": "PUT",
                "data": {"temp": 75.5, "location": "warehouse"}
            }),
        ),
        Format::new(
            "RESTful command",
            json!({
                "verb": "PUT",
                "uri": "/Sensors/101",
                "body": {"temp": 75.5, "location": "warehouse"}
            }),
        ),
        Format::new(
            "Message with metadata",
            json!({
                "metadata": {"method": "PUT", "resource": "/Sensors/101"},
                "payload": {"temp": 75.5, "location": "warehouse"}
            }),
        ),
    ]
}
