//! A Harper stand-in serving WebSocket upgrades on the sensor record and the
//! sensor collection.

#![allow(dead_code)]

mod running;

use std::{net::SocketAddr, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    http::Uri,
    response::Response,
    routing::get,
};
use tokio::{net::TcpListener, sync::mpsc};

pub use running::Running;

/// What the stand-in does with a connection.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Echo every text frame back.
    Echo,
    /// Close with 1000 "done" after the first text frame.
    CloseAfterFirst,
    /// Push these frames right after the upgrade, then close with 1000 "bye".
    Push(Vec<&'static str>),
    /// Push these frames right after the upgrade and stay open.
    PushAndHold(Vec<&'static str>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub path: String,
    pub text: String,
}

#[derive(Clone)]
struct Harper {
    behavior: Behavior,
    received: mpsc::UnboundedSender<Received>,
    closes: mpsc::UnboundedSender<()>,
}

pub struct FakeHarper {
    pub addr: SocketAddr,
    pub received: mpsc::UnboundedReceiver<Received>,
    /// One entry per close frame a client sent.
    pub closes: mpsc::UnboundedReceiver<()>,
}

impl FakeHarper {
    pub async fn spawn(behavior: Behavior) -> Result<Self> {
        let (tx, received) = mpsc::unbounded_channel();
        let (closes_tx, closes) = mpsc::unbounded_channel();
        let app = Router::new()
            .route("/Sensors/101", get(upgrade))
            .route("/Sensors/", get(upgrade))
            .with_state(Harper {
                behavior,
                received: tx,
                closes: closes_tx,
            });

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self {
            addr,
            received,
            closes,
        })
    }

    pub async fn next_message(&mut self, within: Duration) -> Result<Received> {
        tokio::time::timeout(within, self.received.recv())
            .await
            .context("nothing reached harper")?
            .context("harper stopped")
    }

    pub async fn next_close(&mut self, within: Duration) -> Result<()> {
        tokio::time::timeout(within, self.closes.recv())
            .await
            .context("no close frame reached harper")?
            .context("harper stopped")
    }
}

async fn upgrade(ws: WebSocketUpgrade, uri: Uri, State(harper): State<Harper>) -> Response {
    let path = uri.path().to_string();
    ws.on_upgrade(move |socket| serve(socket, path, harper))
}

async fn serve(mut socket: WebSocket, path: String, harper: Harper) {
    if let Behavior::Push(frames) | Behavior::PushAndHold(frames) = &harper.behavior {
        for frame in frames {
            if socket.send(Message::Text(frame.to_string())).await.is_err() {
                return;
            }
        }
        if let Behavior::Push(_) = harper.behavior {
            let _ = socket.send(close_frame("bye")).await;
            return;
        }
    }

    while let Some(Ok(message)) = socket.recv().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => {
                let _ = harper.closes.send(());
                return;
            }
            _ => continue,
        };
        let _ = harper.received.send(Received {
            path: path.clone(),
            text: text.clone(),
        });
        match harper.behavior {
            Behavior::Echo => {
                let _ = socket.send(Message::Text(text)).await;
            }
            Behavior::CloseAfterFirst => {
                let _ = socket.send(close_frame("done")).await;
                return;
            }
            Behavior::Push(_) | Behavior::PushAndHold(_) => {}
        }
    }
}

fn close_frame(reason: &'static str) -> Message {
    Message::Close(Some(CloseFrame {
        code: 1000,
        reason: reason.into(),
    }))
}

/// A port nothing listens on.
pub async fn closed_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    Ok(listener.local_addr()?.port())
}
