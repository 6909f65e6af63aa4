// ABOUTME: Keyboard handling that maps terminal key events onto console inputs

use crate::config::ReplMode;
use crate::repl::ReplWidget;
use crate::terminal::Channel;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplInput {
    Character(char),
    Backspace,
    Submit,
    Quit,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, mode: ReplMode) -> Option<ReplInput> {
        if key_event.kind == KeyEventKind::Release {
            return None;
        }

        let control = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Char('c' | 'd') if control => Some(ReplInput::Quit),
            KeyCode::Esc => Some(ReplInput::Quit),
            _ if mode == ReplMode::HalfDuplex => match key_event.code {
                KeyCode::Char('q') => Some(ReplInput::Quit),
                _ => None,
            },
            KeyCode::Char(_) if control => None,
            KeyCode::Char(c) => Some(ReplInput::Character(c)),
            KeyCode::Tab => Some(ReplInput::Character('\t')),
            KeyCode::Backspace => Some(ReplInput::Backspace),
            KeyCode::Enter => Some(ReplInput::Submit),
            _ => None,
        }
    }

    /// Apply an input to the widget. Returns true when the console should exit.
    pub fn process_input<C: Channel>(input: ReplInput, widget: &mut ReplWidget<C>) -> bool {
        match input {
            ReplInput::Character(c) => widget.on_character(c),
            ReplInput::Backspace => widget.on_backspace(),
            ReplInput::Submit => widget.on_submit(),
            ReplInput::Quit => return true,
        }
        false
    }
}
