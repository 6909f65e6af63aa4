// ABOUTME: Pure markup rendering of the transcript for the output pane

use crate::transcript::buffer::Transcript;
use crate::transcript::escape::escape_html;

/// What the output pane shows after a render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPane {
    pub markup: String,
    pub background: String,
    /// Scroll position forced to the bottom by the last content change
    pub scroll_pinned: bool,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    cursor: String,
    separator: &'static str,
}

impl Renderer {
    /// `separator` goes between lines: streamed chunks carry their own newlines,
    /// composed lines do not.
    pub fn new(cursor: impl Into<String>, separator: &'static str) -> Self {
        Self {
            cursor: cursor.into(),
            separator,
        }
    }

    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Every line as a colored span, joined, followed by the cursor on its own line.
    /// Same transcript in, same bytes out.
    pub fn render(&self, transcript: &Transcript) -> String {
        let mut markup = String::new();
        for (i, line) in transcript.lines().enumerate() {
            if i > 0 {
                markup.push_str(self.separator);
            }
            markup.push_str("<span style=\"color:");
            markup.push_str(&escape_html(line.color()));
            markup.push_str("\">");
            markup.push_str(line.content());
            markup.push_str("</span>");
        }
        markup.push('\n');
        markup.push_str(&escape_html(&self.cursor));
        markup
    }
}
