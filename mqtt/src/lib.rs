//! MQTT clients for Harper's broker.
//!
//! Harper maps topics onto table records, so `Sensors/101` is record 101 of
//! the `Sensors` table and a retained publish upserts it.
//!
//! - [`session`] owns the broker connection. A driver task polls the rumqttc
//!   event loop and hands broker events to the caller over a channel.
//! - [`publisher`] adapts a session to the shared publish loop.
//! - [`subscriber`] prints every message on a topic until interrupted.

pub mod error;
pub mod publisher;
pub mod session;
pub mod subscriber;

pub use error::MqttError;
pub use publisher::MqttPublisher;
pub use session::{ConnectOptions, MqttSession};
