// ABOUTME: Error types for the console channel and connection state machine
// None of these cross the widget boundary; the widget logs them and moves on

use thiserror::Error;

use crate::terminal::protocol::ConnectionState;

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("Channel is not open (state: {0})")]
    NotOpen(ConnectionState),

    #[error("Channel already active (state: {0})")]
    AlreadyActive(ConnectionState),

    #[error("Channel is gone")]
    ChannelGone,

    #[error("Channel failed to start: {0}")]
    ChannelStart(String),

    #[error("Handshake encoding failed: {0}")]
    Handshake(#[from] serde_json::Error),
}
