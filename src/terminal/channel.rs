// ABOUTME: Duplex text channel abstraction plus the WebSocket implementation
// The channel only moves frames; lifecycle decisions live in the connection manager

use crate::terminal::error::ReplError;
use crate::terminal::protocol::ChannelEvent;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite};
use tracing::{debug, error, info, trace, warn};

/// A text channel whose events are reported asynchronously as [`ChannelEvent`]s.
///
/// `open` only starts establishment; success or failure arrives later as
/// `Opened` or `Closed`. Implementations must report exactly one `Closed`
/// per `open`, and every `open` starts a fresh event stream: anything still
/// queued from an earlier connection is discarded.
pub trait Channel {
    fn open(&mut self, url: &str) -> Result<(), ReplError>;

    fn send_text(&mut self, text: &str) -> Result<(), ReplError>;

    fn close(&mut self);

    /// Next queued event of the current connection, without waiting
    fn try_next_event(&mut self) -> Option<ChannelEvent>;
}

#[derive(Default)]
pub struct WebSocketChannel {
    /// Events of the current connection only
    events: Option<mpsc::UnboundedReceiver<ChannelEvent>>,

    /// Outbound frames for the running connection, if any
    outgoing: Option<mpsc::UnboundedSender<tungstenite::Message>>,

    /// Task handle for the connection
    connection_handle: Option<JoinHandle<()>>,
}

impl WebSocketChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the next event of the current connection.
    /// `None` once the connection task is gone and its events are drained.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        self.events.as_mut()?.recv().await
    }

    /// Handle a single WebSocket connection from handshake to close
    async fn connection_handler(
        url: String,
        mut outgoing_rx: mpsc::UnboundedReceiver<tungstenite::Message>,
        events: mpsc::UnboundedSender<ChannelEvent>,
    ) {
        info!("Connecting to console stream at {}", url);

        let (ws_stream, response) = match connect_async(url.as_str()).await {
            Ok(connected) => connected,
            Err(e) => {
                error!("WebSocket handshake failed: {}", e);
                let message = e.to_string();
                if message.contains("refused") {
                    error!("Connection refused - is the console server running?");
                } else if message.contains("timeout") || message.contains("timed out") {
                    error!("Connection timeout - is the port accessible?");
                } else if message.contains("lookup") {
                    error!("DNS/hostname lookup failed - check the URL: {}", url);
                }
                let _ = events.send(ChannelEvent::closed(message));
                return;
            }
        };

        debug!("WebSocket response status: {:?}", response.status());
        if events.send(ChannelEvent::Opened).is_err() {
            debug!("Event receiver dropped before open was reported");
            return;
        }

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        let reason = loop {
            tokio::select! {
                outgoing = outgoing_rx.recv() => match outgoing {
                    Some(msg) => {
                        if let Err(e) = ws_sender.send(msg).await {
                            error!("Failed to send WebSocket message: {}", e);
                            break Some(e.to_string());
                        }
                    }
                    None => {
                        // Every sender dropped: local close
                        let _ = ws_sender.close().await;
                        break Some("closed locally".to_string());
                    }
                },

                incoming = ws_receiver.next() => match incoming {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        trace!("Received {} bytes", text.len());
                        if events.send(ChannelEvent::Data(text)).is_err() {
                            break Some("event receiver dropped".to_string());
                        }
                    }
                    Some(Ok(tungstenite::Message::Binary(bytes))) => match String::from_utf8(bytes) {
                        Ok(text) => {
                            if events.send(ChannelEvent::Data(text)).is_err() {
                                break Some("event receiver dropped".to_string());
                            }
                        }
                        Err(_) => warn!("Dropping non UTF-8 binary frame"),
                    },
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        info!("WebSocket closed by server");
                        break frame.map(|f| f.reason.into_owned()).filter(|r| !r.is_empty());
                    }
                    Some(Ok(_)) => {
                        // Ping, Pong and raw frames carry nothing to display
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break Some(e.to_string());
                    }
                    None => break None,
                },
            }
        };

        let _ = events.send(ChannelEvent::Closed { reason });
    }
}

impl Channel for WebSocketChannel {
    fn open(&mut self, url: &str) -> Result<(), ReplError> {
        if let Some(handle) = self.connection_handle.take() {
            handle.abort();
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ReplError::ChannelStart(e.to_string()))?;

        // Replacing the receiver drops whatever the previous connection left queued
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        self.events = Some(events_rx);
        self.outgoing = Some(outgoing_tx);
        self.connection_handle = Some(runtime.spawn(Self::connection_handler(
            url.to_string(),
            outgoing_rx,
            events_tx,
        )));
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> Result<(), ReplError> {
        let outgoing = self.outgoing.as_ref().ok_or(ReplError::ChannelGone)?;
        outgoing
            .send(tungstenite::Message::Text(text.to_string()))
            .map_err(|_| ReplError::ChannelGone)
    }

    fn close(&mut self) {
        // Dropping the sender makes the connection task close the socket
        if self.outgoing.take().is_some() {
            debug!("Local close requested");
        }
    }

    fn try_next_event(&mut self) -> Option<ChannelEvent> {
        self.events.as_mut()?.try_recv().ok()
    }
}

impl Drop for WebSocketChannel {
    fn drop(&mut self) {
        if let Some(handle) = self.connection_handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_before_open_reports_channel_gone() {
        let mut channel = WebSocketChannel::new();
        assert!(matches!(
            channel.send_text("hello"),
            Err(ReplError::ChannelGone)
        ));
    }

    #[tokio::test]
    async fn refused_connection_reports_single_close() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut channel = WebSocketChannel::new();
        assert_eq!(channel.try_next_event(), None);
        channel.open(&format!("ws://127.0.0.1:{port}/stdoutstream")).unwrap();

        let event = channel.next_event().await.unwrap();
        assert!(event.is_closed(), "expected close, got {event:?}");
        assert_eq!(channel.next_event().await, None);
    }
}
