//! HTTP clients for Harper's REST interface.
//!
//! - [`publisher`] writes readings with `PUT /Sensors/101`.
//! - [`sse`] decodes a `text/event-stream` body into events.
//! - [`subscriber`] follows the same record as a Server-Sent Events stream.

pub mod publisher;
pub mod sse;
pub mod subscriber;

pub use publisher::{HttpPublisher, PutError};
