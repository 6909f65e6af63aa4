// ABOUTME: Console view drawing the output pane (pinned to bottom) and, in full-duplex, the input pane

use crate::config::ReplMode;
use crate::repl::ReplWidget;
use crate::terminal::{Channel, ConnectionState};
use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use std::str::FromStr;

/// Parse a CSS-ish color (`white`, `#0a0a0a`, `#933`). Unknown values fall back to the terminal default.
pub fn parse_color(value: &str) -> Color {
    let value = value.trim();
    let expanded = match value.strip_prefix('#') {
        Some(hex) if hex.len() == 3 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            let doubled: String = hex.chars().flat_map(|c| [c, c]).collect();
            format!("#{doubled}")
        }
        _ => value.to_string(),
    };
    Color::from_str(&expanded).unwrap_or(Color::Reset)
}

/// Transcript as terminal lines. Line breaks inside fragments are honoured;
/// full-duplex lines are additionally separated from each other.
pub fn transcript_lines<C: Channel>(widget: &ReplWidget<C>) -> Vec<Line<'static>> {
    let separate = widget.mode() == ReplMode::FullDuplex;
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();

    for (i, line) in widget.transcript().lines().enumerate() {
        if separate && i > 0 {
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
        let style = Style::default().fg(parse_color(line.color()));
        let text = line.text().replace('\r', "");
        for (j, part) in text.split('\n').enumerate() {
            if j > 0 {
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
            if !part.is_empty() {
                spans.push(Span::styled(part.to_string(), style));
            }
        }
    }
    lines.push(Line::from(spans));
    lines.push(Line::from(widget.cursor().to_string()));
    lines
}

pub struct ConsoleViewComponent;

impl ConsoleViewComponent {
    pub const fn new() -> Self {
        Self
    }

    pub fn render<C: Channel>(&self, frame: &mut Frame, area: Rect, widget: &ReplWidget<C>, title: &str) {
        if widget.mode() == ReplMode::FullDuplex {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(3),    // Output pane
                    Constraint::Length(3), // Input pane
                ])
                .split(area);
            self.render_output(frame, chunks[0], widget, title);
            self.render_input(frame, chunks[1], widget);
        } else {
            self.render_output(frame, area, widget, title);
        }
    }

    fn render_output<C: Channel>(&self, frame: &mut Frame, area: Rect, widget: &ReplWidget<C>, title: &str) {
        let pane = widget.pane();
        let state_color = match widget.state() {
            ConnectionState::Open => Color::Green,
            ConnectionState::Connecting => Color::Yellow,
            ConnectionState::Closed => Color::Red,
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} [{}] ", title, widget.state()))
            .title_style(Style::default().fg(state_color))
            .border_style(Style::default().fg(Color::Gray))
            .style(Style::default().bg(parse_color(&pane.background)));

        let lines = transcript_lines(widget);
        let visible = usize::from(area.height.saturating_sub(2));
        let offset = if pane.scroll_pinned {
            lines.len().saturating_sub(visible)
        } else {
            0
        };

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0)),
            area,
        );
    }

    fn render_input<C: Channel>(&self, frame: &mut Frame, area: Rect, widget: &ReplWidget<C>) {
        let current = widget
            .transcript()
            .current()
            .map(|line| line.text())
            .unwrap_or_default();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Input [Enter]send [Esc]quit ")
            .border_style(Style::default().fg(Color::Gray));

        frame.render_widget(
            Paragraph::new(format!("{}{}", widget.cursor(), current)).block(block),
            area,
        );
    }
}

impl Default for ConsoleViewComponent {
    fn default() -> Self {
        Self::new()
    }
}
