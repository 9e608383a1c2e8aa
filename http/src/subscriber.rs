use anyhow::{Context, Result};
use futures_util::StreamExt;
use reqwest::{Client, header::ACCEPT};
use sensor_core::{
    render::{Envelope, print_update},
    signal,
};
use tokio::select;
use tracing::{debug, info};

use crate::sse::SseDecoder;

const EVENT_STREAM: &str = "text/event-stream";

/// Why the subscription ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    Interrupted,
    ClosedByServer,
}

/// Follows `url` as an event stream, printing each event under `topic`.
///
/// Harper sends the current record right after connecting and every change
/// after that, each wrapped in a change envelope.
pub async fn follow(url: &str, topic: &str) -> Result<StreamEnd> {
    let response = Client::new()
        .get(url)
        .header(ACCEPT, EVENT_STREAM)
        .send()
        .await
        .with_context(|| format!("failed to connect to {url}"))?
        .error_for_status()
        .with_context(|| format!("{url} refused the event stream"))?;

    info!(%url, "event stream open");
    println!("Connected to Harper SSE");
    println!("Subscribed to: {topic}");
    println!("Listening for messages...\n");

    let body = response.bytes_stream();
    let shutdown = signal::ctrl_c();
    tokio::pin!(body, shutdown);
    let mut decoder = SseDecoder::new();

    loop {
        select! {
            _ = &mut shutdown => {
                println!("\nStopping subscriber...");
                return Ok(StreamEnd::Interrupted);
            }
            chunk = body.next() => {
                let Some(chunk) = chunk else {
                    println!("Stream closed by server");
                    return Ok(StreamEnd::ClosedByServer);
                };
                let chunk = chunk.context("event stream failed")?;
                for event in decoder.push(&chunk) {
                    debug!(event = ?event.event, id = ?event.id, "event received");
                    print_update(topic, &event.data, Envelope::ChangeEvent);
                }
            }
        }
    }
}
