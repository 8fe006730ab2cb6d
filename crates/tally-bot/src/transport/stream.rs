//! Reconnecting WebSocket client
//!
//! A background task owns the socket. It emits [`TransportEvent::Opened`]
//! after every successful connection and reconnects after a fixed delay on
//! error or close. Commands queued while disconnected are discarded when the
//! next connection opens; the agent re-sends what it needs on `Opened`.
//!
//! The command queue is unbounded so the agent never waits on the socket
//! while the transport waits on the agent to take events.

use crate::protocol::ClientMessage;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Channel buffer size for inbound events
const EVENT_BUFFER_SIZE: usize = 256;

/// Error type for transport operations
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Events delivered to the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A connection was (re)established
    Opened,
    /// A text frame arrived
    Message(String),
    /// The connection failed; a reconnect follows
    Error(String),
    /// The server closed the connection; a reconnect follows
    Closed,
}

/// Agent-side ends of a running transport
#[derive(Debug)]
pub struct TransportHandle {
    pub commands: mpsc::UnboundedSender<ClientMessage>,
    pub events: mpsc::Receiver<TransportEvent>,
    pub task: JoinHandle<()>,
}

/// How a single connection ended
enum ConnectionEnd {
    /// Server closed or the stream ended
    Closed,
    /// The agent dropped its side; stop for good
    Shutdown,
}

/// Reconnecting streaming client
pub struct StreamTransport;

impl StreamTransport {
    /// Start the background connection task
    ///
    /// The task stops once the agent drops the command sender or the event
    /// receiver.
    pub fn spawn(url: String, reconnect_delay: Duration) -> TransportHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER_SIZE);

        let task = tokio::spawn(Self::connection_loop(
            url,
            reconnect_delay,
            command_rx,
            event_tx,
        ));

        TransportHandle {
            commands: command_tx,
            events: event_rx,
            task,
        }
    }

    /// Background reconnect loop
    async fn connection_loop(
        url: String,
        reconnect_delay: Duration,
        mut command_rx: mpsc::UnboundedReceiver<ClientMessage>,
        event_tx: mpsc::Sender<TransportEvent>,
    ) {
        loop {
            let event = match Self::run_connection(&url, &mut command_rx, &event_tx).await {
                Ok(ConnectionEnd::Shutdown) => {
                    tracing::info!("Stream transport shutting down");
                    break;
                }
                Ok(ConnectionEnd::Closed) => {
                    tracing::warn!("Stream connection closed, reconnecting...");
                    TransportEvent::Closed
                }
                Err(e) => {
                    tracing::error!(error = %e, "Stream connection error, reconnecting...");
                    TransportEvent::Error(e.to_string())
                }
            };

            if event_tx.send(event).await.is_err() {
                break;
            }

            tokio::time::sleep(reconnect_delay).await;
        }
    }

    /// Run one connection until error, close or shutdown
    async fn run_connection(
        url: &str,
        command_rx: &mut mpsc::UnboundedReceiver<ClientMessage>,
        event_tx: &mpsc::Sender<TransportEvent>,
    ) -> Result<ConnectionEnd, TransportError> {
        let (socket, _response) = connect_async(url).await?;
        let (mut sink, mut stream) = socket.split();

        let mut stale = 0usize;
        loop {
            match command_rx.try_recv() {
                Ok(_) => stale += 1,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(ConnectionEnd::Shutdown),
            }
        }
        if stale > 0 {
            tracing::debug!(discarded = stale, "Dropped commands queued while disconnected");
        }

        tracing::info!("Stream connection opened");
        if event_tx.send(TransportEvent::Opened).await.is_err() {
            return Ok(ConnectionEnd::Shutdown);
        }

        loop {
            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if event_tx.send(TransportEvent::Message(text)).await.is_err() {
                                let _ = sink.close().await;
                                return Ok(ConnectionEnd::Shutdown);
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            sink.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            tracing::debug!(frame = ?frame, "Server closed stream");
                            return Ok(ConnectionEnd::Closed);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e.into()),
                        None => return Ok(ConnectionEnd::Closed),
                    }
                }

                cmd = command_rx.recv() => {
                    match cmd {
                        Some(cmd) => {
                            tracing::trace!(command = %cmd, "Sending command");
                            sink.send(Message::Text(cmd.to_json()?)).await?;
                        }
                        None => {
                            let _ = sink.close().await;
                            return Ok(ConnectionEnd::Shutdown);
                        }
                    }
                }
            }
        }
    }
}
