// ABOUTME: Connection manager owning one duplex channel and its lifecycle state machine
// Lifecycle per open() is Connecting -> Open -> Closed or Connecting -> Closed

use crate::config::EndpointConfig;
use crate::terminal::channel::Channel;
use crate::terminal::error::ReplError;
use crate::terminal::protocol::{ChannelEvent, ConnectionState, Handshake};
use tracing::{debug, error, info, warn};

pub struct ConnectionManager<C> {
    channel: C,
    endpoint: EndpointConfig,

    /// Sent once after each successful open (half-duplex only)
    handshake: Option<Handshake>,
    handshake_sent: bool,

    state: ConnectionState,
}

impl<C: Channel> ConnectionManager<C> {
    /// A manager that starts out `Closed` until [`open`](Self::open) is called
    pub fn new(channel: C, endpoint: EndpointConfig, handshake: Option<Handshake>) -> Self {
        Self {
            channel,
            endpoint,
            handshake,
            handshake_sent: false,
            state: ConnectionState::Closed,
        }
    }

    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    pub const fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    pub const fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Next event queued by the current connection
    pub fn next_event(&mut self) -> Option<ChannelEvent> {
        self.channel.try_next_event()
    }

    /// Start establishing the channel. Failures surface only as `Closed`.
    pub fn open(&mut self) -> Result<(), ReplError> {
        if self.state != ConnectionState::Closed {
            return Err(ReplError::AlreadyActive(self.state));
        }

        let url = self.endpoint.url();
        info!("Opening console channel to {}", url);
        self.state = ConnectionState::Connecting;
        self.handshake_sent = false;

        if let Err(e) = self.channel.open(&url) {
            error!("Failed to start channel to {}: {}", url, e);
            self.state = ConnectionState::Closed;
        }
        Ok(())
    }

    /// Apply one channel event. Returns the inbound fragment to display, if any.
    pub fn handle_event(&mut self, event: ChannelEvent) -> Option<String> {
        match event {
            ChannelEvent::Opened => {
                if self.state != ConnectionState::Connecting {
                    debug!("Ignoring open event in state {}", self.state);
                    return None;
                }
                self.state = ConnectionState::Open;
                info!("Console channel open");
                self.send_handshake();
                None
            }
            ChannelEvent::Data(fragment) => {
                if self.state.is_open() {
                    Some(fragment)
                } else {
                    debug!("Dropping {} bytes received while {}", fragment.len(), self.state);
                    None
                }
            }
            ChannelEvent::Closed { reason } => {
                if self.state == ConnectionState::Closed {
                    debug!("Ignoring duplicate close");
                    return None;
                }
                match reason {
                    Some(reason) => info!("Console channel closed: {}", reason),
                    None => info!("Console channel closed"),
                }
                self.state = ConnectionState::Closed;
                None
            }
        }
    }

    /// Transmit `text` verbatim. Nothing is queued when the channel is not open.
    pub fn send(&mut self, text: &str) -> Result<(), ReplError> {
        if !self.state.is_open() {
            return Err(ReplError::NotOpen(self.state));
        }
        self.channel.send_text(text)
    }

    /// Explicit local close
    pub fn close(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        self.channel.close();
        self.state = ConnectionState::Closed;
        info!("Console channel closed locally");
    }

    fn send_handshake(&mut self) {
        if self.handshake_sent {
            return;
        }
        let Some(handshake) = &self.handshake else {
            return;
        };
        // Attempted once per open, success or not
        self.handshake_sent = true;

        let payload = match handshake.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                error!("{}", ReplError::from(e));
                return;
            }
        };

        info!(
            "Connected, attaching to namespace {} experiment {}",
            handshake.experiment_namespace, handshake.experiment_id
        );
        if let Err(e) = self.channel.send_text(&payload) {
            warn!("Handshake was not delivered: {}", e);
        }
    }
}
