use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use sensor_core::{
    Payload, PayloadError,
    publish::{PublishLoop, Publisher},
    signal,
};
use thiserror::Error;
use tokio::{select, time::timeout};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, warn};

use crate::{StreamEnd, WsStream};

/// How long a one-shot publish waits for Harper to answer.
pub const REPLY_WAIT: Duration = Duration::from_secs(3);
/// Time left for Harper to bridge the write to its other transports before
/// the connection closes.
pub const BRIDGE_LINGER: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum WsError {
    #[error(transparent)]
    Encode(#[from] PayloadError),

    #[error("send failed: {0}")]
    Send(#[from] tungstenite::Error),
}

/// Writes readings to a Harper record as single-element JSON arrays.
pub struct WsPublisher<S> {
    sink: S,
}

impl<S> WsPublisher<S>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S> Publisher for WsPublisher<S>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    type Error = WsError;

    async fn publish(&mut self, payload: &Payload) -> Result<String, WsError> {
        let text = payload.wrapped_in_array()?;
        self.sink.send(Message::text(text.clone())).await?;
        Ok(text)
    }
}

/// Waits up to `limit` for any frame from the server.
pub async fn await_reply<S>(stream: &mut S, limit: Duration) -> Option<Message>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    match timeout(limit, stream.next()).await {
        Ok(Some(Ok(message))) => Some(message),
        Ok(Some(Err(error))) => {
            debug!(%error, "no reply");
            None
        }
        Ok(None) | Err(_) => None,
    }
}

/// Publishes generated readings until Ctrl-C or until the server closes the
/// connection, then closes our side.
pub async fn publish_continuously(ws: WsStream) -> StreamEnd {
    let (sink, mut incoming) = ws.split();
    let mut publisher = WsPublisher::new(sink);
    let mut end = StreamEnd::Interrupted;

    let shutdown = async {
        select! {
            _ = signal::ctrl_c() => {}
            closed = server_close(&mut incoming) => end = closed,
        }
    };
    PublishLoop::generated()
        .run_until(&mut publisher, shutdown)
        .await;

    if end == StreamEnd::Interrupted {
        let mut sink = publisher.into_inner();
        if let Err(error) = sink.close().await {
            debug!(%error, "close handshake failed");
        }
    }
    end
}

// Drains the read half, which only carries echoes while publishing.
async fn server_close<S>(incoming: &mut S) -> StreamEnd
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(message) = incoming.next().await {
        match message {
            Ok(Message::Close(frame)) => return StreamEnd::closed(frame),
            Ok(message) => debug!(len = message.len(), "server frame while publishing"),
            Err(error) => {
                warn!(%error, "websocket read failed");
                break;
            }
        }
    }
    StreamEnd::closed(None)
}
