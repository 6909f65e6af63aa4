// ABOUTME: Terminal module for the console channel and its connection lifecycle
// Provides a WebSocket-backed duplex text channel behind a testable state machine

pub mod channel;
pub mod connection;
pub mod error;
pub mod protocol;

pub use channel::{Channel, WebSocketChannel};
pub use connection::ConnectionManager;
pub use error::ReplError;
pub use protocol::{ChannelEvent, ConnectionState, Handshake};
