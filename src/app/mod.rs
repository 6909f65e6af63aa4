// ABOUTME: Application state for the console binary: one widget plus its channel events

pub mod events;

pub use events::{EventHandler, ReplInput};

use crate::repl::ReplWidget;
use crate::terminal::Channel;
use crossterm::event::KeyEvent;
use tracing::debug;

pub struct App<C> {
    pub widget: ReplWidget<C>,
    pub title: String,
    pub should_quit: bool,
}

impl<C: Channel> App<C> {
    pub fn new(widget: ReplWidget<C>, title: String) -> Self {
        Self {
            widget,
            title,
            should_quit: false,
        }
    }

    /// Apply every channel event queued since the last tick, in arrival order.
    /// Returns how many were applied.
    pub fn tick(&mut self) -> usize {
        let applied = self.widget.poll_events();
        if applied > 0 {
            debug!("Applied {} channel events", applied);
        }
        applied
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if let Some(input) = EventHandler::handle_key_event(key_event, self.widget.mode()) {
            if EventHandler::process_input(input, &mut self.widget) {
                self.should_quit = true;
            }
        }
    }
}
