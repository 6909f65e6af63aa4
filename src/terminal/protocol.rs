// ABOUTME: Wire-level types for the console channel: lifecycle state, channel events, handshake
// Inbound frames are raw text, so the only structured message is the handshake

use serde::{Deserialize, Serialize};

// ============================================
// Connection State
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Channel Events
// ============================================

/// Everything a channel can report, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The handshake with the remote end completed.
    Opened,
    /// One inbound text frame, untouched.
    Data(String),
    /// The channel is gone: remote close, network failure, failed establishment or local close.
    Closed { reason: Option<String> },
}

impl ChannelEvent {
    pub fn closed(reason: impl Into<String>) -> Self {
        Self::Closed {
            reason: Some(reason.into()),
        }
    }

    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}

// ============================================
// Handshake
// ============================================

/// Sent once right after a half-duplex channel opens to pick the log stream to attach to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handshake {
    pub experiment_namespace: String,
    pub experiment_id: String,
}

impl Handshake {
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            experiment_namespace: namespace.into(),
            experiment_id: id.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
