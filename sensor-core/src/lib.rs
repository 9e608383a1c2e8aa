//! Shared building blocks for the Harper sensor clients.
//!
//! Every transport crate in the workspace is a handful of small binaries that
//! publish or subscribe to the same sensor record. This crate holds the pieces
//! they have in common:
//!
//! - [`reading`] models a sensor sample and generates synthetic ones.
//! - [`payload`] validates JSON literals from the command line and keeps them
//!   byte-for-byte, so one-shot publishes send exactly what the user typed.
//! - [`render`] turns received messages into console output, unwrapping
//!   change envelopes where the transport uses them.
//! - [`cli`] defines the command lines shared by publishers and subscribers.
//! - [`config`] holds the endpoint flags shared by every binary plus the
//!   `MQTT_RETAIN` lookup.
//! - [`publish`] runs the fixed-interval publish loop until shutdown.
//! - [`signal`] wraps Ctrl-C handling.
//! - [`telemetry`] installs the tracing subscriber.

pub mod cli;
pub mod config;
pub mod payload;
pub mod publish;
pub mod reading;
pub mod render;
pub mod signal;
pub mod telemetry;

pub use payload::{Payload, PayloadError};
pub use reading::SensorReading;
