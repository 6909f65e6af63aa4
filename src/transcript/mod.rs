// ABOUTME: Bounded transcript store and its HTML rendering

pub mod buffer;
pub mod escape;
pub mod renderer;

pub use buffer::{LineRole, Transcript, TranscriptLine};
pub use escape::{escape_html, unescape_html};
pub use renderer::{OutputPane, Renderer};
