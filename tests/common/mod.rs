// ABOUTME: Shared fake channel for driving the console without a network

#![allow(dead_code)]

use std::collections::VecDeque;
use ws_repl::config::{ReplConfig, ReplMode};
use ws_repl::repl::ReplWidget;
use ws_repl::terminal::{Channel, ChannelEvent, ReplError};

/// Records traffic and behaves like a real channel towards its events:
/// `close` queues the connection's `Closed`, `open` starts a fresh queue.
#[derive(Debug, Default)]
pub struct FakeChannel {
    pub opened: Vec<String>,
    pub sent: Vec<String>,
    pub closes: usize,
    pub pending: VecDeque<ChannelEvent>,
}

impl FakeChannel {
    /// Queue an event as if the current connection produced it
    pub fn push(&mut self, event: ChannelEvent) {
        self.pending.push_back(event);
    }
}

impl Channel for FakeChannel {
    fn open(&mut self, url: &str) -> Result<(), ReplError> {
        self.opened.push(url.to_string());
        self.pending.clear();
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> Result<(), ReplError> {
        self.sent.push(text.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.closes += 1;
        self.pending.push_back(ChannelEvent::closed("closed locally"));
    }

    fn try_next_event(&mut self) -> Option<ChannelEvent> {
        self.pending.pop_front()
    }
}

pub fn config(mode: ReplMode, capacity: usize) -> ReplConfig {
    ReplConfig {
        mode,
        capacity,
        experiment_namespace: "default".to_string(),
        experiment_id: "mnist_20190101".to_string(),
        ..ReplConfig::default()
    }
}

pub fn widget(mode: ReplMode, capacity: usize) -> ReplWidget<FakeChannel> {
    ReplWidget::new(&config(mode, capacity), FakeChannel::default()).unwrap()
}

pub fn sent(widget: &ReplWidget<FakeChannel>) -> &[String] {
    &widget.connection().channel().sent
}
