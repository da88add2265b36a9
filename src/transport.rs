//! WebSocket transport.
//!
//! DESIGN
//! ======
//! `connect` dials the endpoint once and splits the socket:
//! - Outbound: an unbounded channel drained by a writer task. Sending is
//!   fire-and-forget; `send_text` only reports whether the channel is open.
//! - Inbound: the read half mapped to `TransportEvent`s. Text frames pass
//!   through in delivery order; binary, ping and pong frames are dropped;
//!   a close frame or read error becomes `Closed`.
//!
//! There is no retry. A failed handshake is returned to the caller, and a
//! closed connection stays closed.
//!
//! `Connection::from_parts` assembles a connection from any channel and event
//! stream, which is how sessions are driven without a socket.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::pin::Pin;

use futures_util::{SinkExt, Stream, StreamExt, future};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, warn};

use crate::error::ClientError;

/// Why a connection ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CloseReason {
    /// The client closed or disposed the session.
    ClientClosed,
    /// The peer sent a close frame.
    PeerClosed { code: Option<u16>, reason: String },
    /// Reading from the socket failed.
    Error(String),
    /// The inbound stream ended without a close frame.
    StreamEnded,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    Text(String),
    Closed(CloseReason),
}

pub type InboundStream = Pin<Box<dyn Stream<Item = TransportEvent> + Send>>;

/// One open connection: outbound queue plus inbound event stream.
pub struct Connection {
    outbound: Option<mpsc::UnboundedSender<String>>,
    inbound: InboundStream,
    writer: Option<JoinHandle<()>>,
}

impl Connection {
    /// Assemble a connection from an outbound channel and an inbound stream.
    pub fn from_parts(
        outbound: mpsc::UnboundedSender<String>,
        inbound: impl Stream<Item = TransportEvent> + Send + 'static,
    ) -> Self {
        Self { outbound: Some(outbound), inbound: Box::pin(inbound), writer: None }
    }

    /// Queue one text frame. Returns `false` if the connection is closed.
    pub fn send_text(&self, text: String) -> bool {
        match &self.outbound {
            Some(tx) => tx.send(text).is_ok(),
            None => false,
        }
    }

    /// Wait for the next inbound event. Cancel-safe.
    pub async fn next_event(&mut self) -> TransportEvent {
        match self.inbound.next().await {
            Some(event) => event,
            None => TransportEvent::Closed(CloseReason::StreamEnded),
        }
    }

    /// Stop accepting sends, flush queued frames and send a close frame.
    pub async fn close(&mut self) {
        self.outbound = None;
        if let Some(writer) = self.writer.take() {
            if let Err(error) = writer.await {
                warn!(error = %error, "ws: writer task failed");
            }
        }
    }
}

/// Open one WebSocket connection to `url`.
///
/// # Errors
///
/// Returns [`ClientError::WsConnect`] if the handshake fails.
pub async fn connect(url: &str) -> Result<Connection, ClientError> {
    let (stream, _) = connect_async(url)
        .await
        .map_err(|error| ClientError::WsConnect(Box::new(error)))?;
    info!(%url, "ws: connected");

    let (mut sink, source) = stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if let Err(error) = sink.send(Message::Text(text.into())).await {
                warn!(error = %error, "ws: send failed");
                return;
            }
        }
        if let Err(error) = sink.close().await {
            debug!(error = %error, "ws: close after drain failed");
        }
    });

    let inbound = source.filter_map(|message| future::ready(inbound_event(message)));

    Ok(Connection { outbound: Some(tx), inbound: Box::pin(inbound), writer: Some(writer) })
}

fn inbound_event(message: Result<Message, WsError>) -> Option<TransportEvent> {
    match message {
        Ok(Message::Text(text)) => Some(TransportEvent::Text(text.as_str().to_owned())),
        Ok(Message::Close(frame)) => {
            let (code, reason) = match frame {
                Some(frame) => (Some(u16::from(frame.code)), frame.reason.as_str().to_owned()),
                None => (None, String::new()),
            };
            Some(TransportEvent::Closed(CloseReason::PeerClosed { code, reason }))
        }
        Ok(Message::Binary(_) | Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => None,
        Err(error) => Some(TransportEvent::Closed(CloseReason::Error(error.to_string()))),
    }
}
