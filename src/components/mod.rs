// ABOUTME: UI components for the console TUI

pub mod console_view;

pub use console_view::{parse_color, transcript_lines, ConsoleViewComponent};
