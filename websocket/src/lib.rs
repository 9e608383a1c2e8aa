//! WebSocket clients for Harper's resource endpoint.
//!
//! A WebSocket opened on `/Sensors/101` both accepts writes (a JSON array of
//! records) and streams changes to the record back as change envelopes.
//!
//! - [`publisher`] sends array-wrapped readings, once or on the shared loop.
//! - [`subscriber`] prints every change until interrupted or closed.
//! - [`formats`] is the table of envelope shapes the format probe sends.

pub mod formats;
pub mod publisher;
pub mod subscriber;

use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, protocol::CloseFrame},
};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a WebSocket session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEnd {
    Interrupted,
    Closed { code: Option<u16>, reason: String },
}

impl StreamEnd {
    pub fn closed(frame: Option<CloseFrame>) -> Self {
        match frame {
            Some(frame) => StreamEnd::Closed {
                code: Some(u16::from(frame.code)),
                reason: frame.reason.as_str().to_string(),
            },
            None => StreamEnd::Closed {
                code: None,
                reason: String::new(),
            },
        }
    }

    /// Console line for a server-side close; `None` for Ctrl-C.
    pub fn describe(&self) -> Option<String> {
        match self {
            StreamEnd::Interrupted => None,
            StreamEnd::Closed { code, reason } => {
                let code = code.map_or_else(|| "none".to_string(), |code| code.to_string());
                let reason = if reason.is_empty() {
                    "No reason provided"
                } else {
                    reason
                };
                Some(format!("Connection closed. Code: {code}, Reason: {reason}"))
            }
        }
    }
}

pub async fn connect(url: &str) -> Result<WsStream, tungstenite::Error> {
    let (stream, response) = connect_async(url).await?;
    tracing::debug!(%url, status = %response.status(), "websocket open");
    Ok(stream)
}
