// ABOUTME: Streaming console widget: half-duplex log display or full-duplex line editing

pub mod widget;

pub use crate::config::ReplMode;
pub use widget::ReplWidget;
