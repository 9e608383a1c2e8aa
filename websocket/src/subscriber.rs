use futures_util::{SinkExt, StreamExt};
use sensor_core::{
    render::{Envelope, print_update},
    signal,
};
use tokio::select;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, trace};

use crate::{StreamEnd, WsStream};

/// Prints every change Harper pushes for `topic` until Ctrl-C or until the
/// server closes the socket.
///
/// The first message is the record's current state, sent as soon as the
/// socket opens.
pub async fn follow(mut ws: WsStream, topic: &str) -> Result<StreamEnd, tungstenite::Error> {
    println!("Subscribed to: {topic}");
    println!("Listening for messages...\n");

    let shutdown = signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        select! {
            _ = &mut shutdown => {
                println!("\nStopping subscriber...");
                if let Err(error) = ws.close(None).await {
                    debug!(%error, "close handshake failed");
                }
                return Ok(StreamEnd::Interrupted);
            }
            message = ws.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    print_update(topic, text.as_str(), Envelope::ChangeEvent);
                }
                Some(Ok(Message::Binary(bytes))) => {
                    print_update(topic, &String::from_utf8_lossy(&bytes), Envelope::ChangeEvent);
                }
                Some(Ok(Message::Close(frame))) => return Ok(StreamEnd::closed(frame)),
                Some(Ok(other)) => trace!(?other, "control frame"),
                Some(Err(error)) => return Err(error),
                None => return Ok(StreamEnd::closed(None)),
            },
        }
    }
}
