//! Just enough of an MQTT 3.1.1 broker to stand in for Harper: it accepts a
//! connection, acknowledges publishes and subscriptions, and can push canned
//! messages to a subscriber before hanging up.

#![allow(dead_code)]

mod running;

use std::{net::SocketAddr, time::Duration};

use anyhow::{Context, Result, bail};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::mpsc,
};

pub use running::Running;

const CONNECT: u8 = 1;
const PUBLISH: u8 = 3;
const SUBSCRIBE: u8 = 8;
const PINGREQ: u8 = 12;
const DISCONNECT: u8 = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedPublish {
    pub topic: String,
    pub qos: u8,
    pub retain: bool,
    pub payload: String,
}

pub struct FakeBroker {
    pub addr: SocketAddr,
    pub publishes: mpsc::UnboundedReceiver<ReceivedPublish>,
    pub disconnects: mpsc::UnboundedReceiver<()>,
}

#[derive(Clone)]
struct Session {
    outgoing: Vec<(&'static str, &'static str)>,
    hang_up_after_subscribe: bool,
    publishes: mpsc::UnboundedSender<ReceivedPublish>,
    disconnects: mpsc::UnboundedSender<()>,
}

impl FakeBroker {
    /// Starts a broker that pushes `outgoing` (topic, payload) pairs right
    /// after acknowledging a subscription, then closes that connection.
    pub async fn spawn(outgoing: Vec<(&'static str, &'static str)>) -> Result<Self> {
        Self::start(outgoing, true).await
    }

    /// Like [`FakeBroker::spawn`], but subscribers stay connected after the
    /// canned messages.
    pub async fn spawn_persistent(outgoing: Vec<(&'static str, &'static str)>) -> Result<Self> {
        Self::start(outgoing, false).await
    }

    async fn start(
        outgoing: Vec<(&'static str, &'static str)>,
        hang_up_after_subscribe: bool,
    ) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (publishes_tx, publishes) = mpsc::unbounded_channel();
        let (disconnects_tx, disconnects) = mpsc::unbounded_channel();
        let session = Session {
            outgoing,
            hang_up_after_subscribe,
            publishes: publishes_tx,
            disconnects: disconnects_tx,
        };

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let session = session.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, session).await;
                });
            }
        });

        Ok(Self {
            addr,
            publishes,
            disconnects,
        })
    }

    /// Waits for a client to send DISCONNECT.
    pub async fn next_disconnect(&mut self, within: Duration) -> Result<()> {
        tokio::time::timeout(within, self.disconnects.recv())
            .await
            .context("no DISCONNECT reached the broker")?
            .context("broker stopped")
    }

    pub async fn next_publish(&mut self, within: Duration) -> Result<ReceivedPublish> {
        tokio::time::timeout(within, self.publishes.recv())
            .await
            .context("no publish reached the broker")?
            .context("broker stopped")
    }
}

async fn serve(mut stream: TcpStream, session: Session) -> Result<()> {
    while let Some((header, body)) = read_packet(&mut stream).await? {
        match header >> 4 {
            CONNECT => stream.write_all(&[0x20, 0x02, 0x00, 0x00]).await?,
            PUBLISH => {
                let qos = (header >> 1) & 0x03;
                let retain = header & 0x01 == 0x01;
                let topic_len = u16::from_be_bytes([body[0], body[1]]) as usize;
                let topic = String::from_utf8(body[2..2 + topic_len].to_vec())?;
                let mut offset = 2 + topic_len;
                if qos > 0 {
                    let pkid = [body[offset], body[offset + 1]];
                    stream.write_all(&[0x40, 0x02, pkid[0], pkid[1]]).await?;
                    offset += 2;
                }
                let payload = String::from_utf8(body[offset..].to_vec())?;
                let _ = session.publishes.send(ReceivedPublish {
                    topic,
                    qos,
                    retain,
                    payload,
                });
            }
            SUBSCRIBE => {
                stream
                    .write_all(&[0x90, 0x03, body[0], body[1], 0x01])
                    .await?;
                for (topic, payload) in &session.outgoing {
                    stream.write_all(&encode_publish(topic, payload)).await?;
                }
                stream.flush().await?;
                if session.hang_up_after_subscribe {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    return Ok(());
                }
            }
            PINGREQ => stream.write_all(&[0xD0, 0x00]).await?,
            DISCONNECT => {
                let _ = session.disconnects.send(());
                return Ok(());
            }
            other => bail!("unexpected packet type {other}"),
        }
    }
    Ok(())
}

async fn read_packet(stream: &mut TcpStream) -> Result<Option<(u8, Vec<u8>)>> {
    let header = match stream.read_u8().await {
        Ok(byte) => byte,
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let mut remaining = 0usize;
    let mut shift = 0;
    loop {
        let byte = stream.read_u8().await?;
        remaining |= ((byte & 0x7F) as usize) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
        if shift > 21 {
            bail!("malformed remaining length");
        }
    }

    let mut body = vec![0; remaining];
    stream.read_exact(&mut body).await?;
    Ok(Some((header, body)))
}

fn encode_publish(topic: &str, payload: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&(topic.len() as u16).to_be_bytes());
    body.extend_from_slice(topic.as_bytes());
    body.extend_from_slice(payload.as_bytes());

    let mut packet = vec![0x30];
    let mut remaining = body.len();
    loop {
        let mut byte = (remaining % 128) as u8;
        remaining /= 128;
        if remaining > 0 {
            byte |= 0x80;
        }
        packet.push(byte);
        if remaining == 0 {
            break;
        }
    }
    packet.extend_from_slice(&body);
    packet
}

/// A port nothing listens on.
pub async fn closed_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}
