// ABOUTME: Console widget instance composing the connection manager with the transcript
// All entry points are synchronous and re-render before returning

use crate::config::{ConfigError, ReplConfig, ReplMode};
use crate::terminal::{Channel, ChannelEvent, ConnectionManager, ConnectionState, Handshake};
use crate::transcript::{LineRole, OutputPane, Renderer, Transcript, TranscriptLine};
use tracing::{debug, trace, warn};

pub struct ReplWidget<C> {
    mode: ReplMode,
    connection: ConnectionManager<C>,
    transcript: Transcript,
    renderer: Renderer,

    send_color: String,
    reply_color: String,
    open_background: String,
    closed_background: String,

    pane: OutputPane,
}

impl<C: Channel> ReplWidget<C> {
    /// Build a widget from a resolved config. Invalid configs never produce a widget.
    pub fn new(config: &ReplConfig, channel: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let (handshake, separator) = match config.mode {
            ReplMode::HalfDuplex => (
                Some(Handshake::new(
                    config.experiment_namespace.clone(),
                    config.experiment_id.clone(),
                )),
                "",
            ),
            ReplMode::FullDuplex => (None, "\n"),
        };

        let mut widget = Self {
            mode: config.mode,
            connection: ConnectionManager::new(channel, config.effective_endpoint(), handshake),
            transcript: Transcript::new(config.capacity),
            renderer: Renderer::new(config.style.cursor.clone(), separator),
            send_color: config.style.send_color.clone(),
            reply_color: config.style.reply_color.clone(),
            open_background: config.style.open_background.clone(),
            closed_background: config.style.closed_background.clone(),
            pane: OutputPane {
                markup: String::new(),
                background: config.style.closed_background.clone(),
                scroll_pinned: false,
            },
        };

        if widget.mode == ReplMode::FullDuplex {
            widget.open_input_line();
        }
        widget.render(false);
        Ok(widget)
    }

    pub const fn mode(&self) -> ReplMode {
        self.mode
    }

    pub const fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub const fn pane(&self) -> &OutputPane {
        &self.pane
    }

    pub fn cursor(&self) -> &str {
        self.renderer.cursor()
    }

    pub const fn connection(&self) -> &ConnectionManager<C> {
        &self.connection
    }

    /// Start connecting. A widget that is already connecting or open is left alone.
    pub fn open(&mut self) {
        if let Err(e) = self.connection.open() {
            warn!("{}", e);
        }
        self.render(false);
    }

    /// Explicit local close
    pub fn close(&mut self) {
        self.connection.close();
        self.render(false);
    }

    /// Exposed so hosts and tests can drive a channel directly
    pub fn channel_mut(&mut self) -> &mut C {
        self.connection.channel_mut()
    }

    /// Apply every event the current connection has queued, in arrival order.
    /// Returns how many were applied.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.connection.next_event() {
            self.handle_channel_event(event);
            applied += 1;
        }
        applied
    }

    /// Feed one channel event through the state machine and display any data it carries
    pub fn handle_channel_event(&mut self, event: ChannelEvent) {
        match self.connection.handle_event(event) {
            Some(fragment) => self.ingest(&fragment),
            None => self.render(false),
        }
    }

    /// Display one inbound fragment
    pub fn ingest(&mut self, fragment: &str) {
        trace!("Ingesting {} bytes", fragment.len());
        let reply = TranscriptLine::new(LineRole::Received, self.reply_color.clone(), fragment);
        match self.mode {
            ReplMode::HalfDuplex => {
                self.transcript.push(reply);
            }
            ReplMode::FullDuplex => {
                // The reply takes the place of the line being composed
                self.transcript.replace_current(reply);
                self.open_input_line();
            }
        }
        self.render(true);
    }

    /// Typed character, echoed locally and not transmitted
    pub fn on_character(&mut self, c: char) {
        if self.mode != ReplMode::FullDuplex {
            debug!("Ignoring keystroke in half-duplex mode");
            return;
        }
        self.transcript.push_char(c);
        self.render(true);
    }

    pub fn on_backspace(&mut self) {
        if self.mode != ReplMode::FullDuplex {
            return;
        }
        if self.transcript.pop_char() {
            self.render(true);
        }
    }

    /// Seal the current line, open a fresh one and send the line as typed
    pub fn on_submit(&mut self) {
        if self.mode != ReplMode::FullDuplex {
            return;
        }
        let line = self.transcript.current().map(TranscriptLine::text).unwrap_or_default();
        self.open_input_line();
        self.render(true);

        if let Err(e) = self.connection.send(&line) {
            warn!("Dropped outbound line: {}", e);
        }
    }

    fn open_input_line(&mut self) {
        self.transcript
            .push(TranscriptLine::new(LineRole::Sent, self.send_color.clone(), ""));
    }

    fn background(&self) -> &str {
        if self.connection.state().is_open() {
            &self.open_background
        } else {
            &self.closed_background
        }
    }

    fn render(&mut self, new_content: bool) {
        self.pane.markup = self.renderer.render(&self.transcript);
        self.pane.background = self.background().to_string();
        if new_content {
            self.pane.scroll_pinned = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::ReplError;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct NullChannel;

    impl Channel for NullChannel {
        fn open(&mut self, _url: &str) -> Result<(), ReplError> {
            Ok(())
        }

        fn send_text(&mut self, _text: &str) -> Result<(), ReplError> {
            Ok(())
        }

        fn close(&mut self) {}

        fn try_next_event(&mut self) -> Option<ChannelEvent> {
            None
        }
    }

    fn widget(mode: ReplMode, capacity: usize) -> ReplWidget<NullChannel> {
        let config = ReplConfig {
            mode,
            capacity,
            ..ReplConfig::default()
        };
        ReplWidget::new(&config, NullChannel).unwrap()
    }

    #[test]
    fn starts_closed_with_cursor_only() {
        let widget = widget(ReplMode::HalfDuplex, 3);
        assert_eq!(widget.state(), ConnectionState::Closed);
        assert_eq!(widget.pane().markup, "\n$ ");
        assert_eq!(widget.pane().background, "#933");
        assert!(!widget.pane().scroll_pinned);
    }

    #[test]
    fn background_follows_state() {
        let mut widget = widget(ReplMode::HalfDuplex, 3);
        widget.open();
        assert_eq!(widget.pane().background, "#933");
        widget.handle_channel_event(ChannelEvent::Opened);
        assert_eq!(widget.pane().background, "#0a0a0a");
        widget.handle_channel_event(ChannelEvent::Closed { reason: None });
        assert_eq!(widget.pane().background, "#933");
    }

    #[test]
    fn keystrokes_ignored_in_half_duplex() {
        let mut widget = widget(ReplMode::HalfDuplex, 3);
        widget.on_character('x');
        widget.on_submit();
        assert!(widget.transcript().is_empty());
    }

    #[test]
    fn full_duplex_capacity_is_enforced() {
        let mut widget = widget(ReplMode::FullDuplex, 2);
        for c in ['a', 'b', 'c'] {
            widget.on_character(c);
            widget.on_submit();
        }
        assert_eq!(widget.transcript().texts(), vec!["c", ""]);
    }

    #[test]
    fn received_markup_is_escaped() {
        let mut widget = widget(ReplMode::HalfDuplex, 3);
        widget.ingest("<img src=x onerror=\"boom\">");
        assert!(!widget.pane().markup.contains("<img"));
        assert!(widget.pane().markup.contains("&lt;img src=x onerror=&quot;boom&quot;&gt;"));
        assert!(widget.pane().scroll_pinned);
    }
}
