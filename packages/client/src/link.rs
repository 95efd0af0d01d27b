//! WebSocket link to the race server.
//!
//! Used directly during the connection handshake (welcome and clock sync),
//! then split into read and write halves for the interactive session.
//! Messages that arrive during the handshake but are not part of it are
//! kept and handed over with the stream.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use keyrace_shared::protocol::{ClientMessage, ServerMessage};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::{clock_sync::TimeExchange, error::ClientError};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct ServerLink {
    stream: WsStream,
    pending: VecDeque<ServerMessage>,
}

impl ServerLink {
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
        tracing::info!("Connected to {}", url);
        Ok(Self {
            stream,
            pending: VecDeque::new(),
        })
    }

    pub async fn send(&mut self, message: &ClientMessage) -> Result<(), ClientError> {
        let json = message
            .to_json()
            .map_err(|e| ClientError::Protocol(e.to_string()))?;
        self.stream
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| ClientError::ConnectionError(e.to_string()))
    }

    /// Next server message, including ones set aside during the handshake
    pub async fn recv(&mut self) -> Result<ServerMessage, ClientError> {
        match self.pending.pop_front() {
            Some(message) => Ok(message),
            None => self.read_message().await,
        }
    }

    /// Wait for `session:welcome` and return `(playerId, serverTime)`
    pub async fn recv_welcome(&mut self) -> Result<(String, i64), ClientError> {
        loop {
            match self.read_message().await? {
                ServerMessage::Welcome {
                    player_id,
                    server_time,
                } => return Ok((player_id, server_time)),
                other => self.pending.push_back(other),
            }
        }
    }

    /// Hand over the stream together with the messages set aside so far
    pub fn into_parts(self) -> (WsStream, Vec<ServerMessage>) {
        (self.stream, self.pending.into_iter().collect())
    }

    async fn read_message(&mut self) -> Result<ServerMessage, ClientError> {
        loop {
            let frame = self
                .stream
                .next()
                .await
                .ok_or_else(|| ClientError::ConnectionError("Connection closed".to_string()))?
                .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
            match frame {
                Message::Text(text) => return parse_server_message(text.as_str()),
                Message::Close(_) => {
                    return Err(ClientError::ConnectionError(
                        "Server closed the connection".to_string(),
                    ));
                }
                _ => {}
            }
        }
    }
}

#[async_trait]
impl TimeExchange for ServerLink {
    async fn send_request(&mut self, client_sent: i64) -> Result<(), ClientError> {
        self.send(&ClientMessage::TimeRequest { client_sent }).await
    }

    async fn recv_response(&mut self) -> Result<(i64, i64), ClientError> {
        loop {
            match self.read_message().await? {
                ServerMessage::TimeResponse {
                    client_sent,
                    server_time,
                } => return Ok((client_sent, server_time)),
                other => self.pending.push_back(other),
            }
        }
    }
}

pub fn parse_server_message(text: &str) -> Result<ServerMessage, ClientError> {
    ServerMessage::parse(text).map_err(|e| ClientError::Protocol(format!("{}: {}", e, text)))
}
