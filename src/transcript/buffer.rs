// ABOUTME: Bounded transcript of display lines with FIFO eviction
// Only the last line may change; everything before it is sealed

use crate::transcript::escape::{escape_html, unescape_html};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Sent,
    Received,
}

/// One display line. `content` is stored HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    content: String,
    role: LineRole,
    color: String,
}

impl TranscriptLine {
    pub fn new(role: LineRole, color: impl Into<String>, raw: &str) -> Self {
        Self {
            content: escape_html(raw),
            role,
            color: color.into(),
        }
    }

    /// Escaped content, safe to drop into markup
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content as originally typed or received
    pub fn text(&self) -> String {
        unescape_html(&self.content)
    }

    pub const fn role(&self) -> LineRole {
        self.role
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    fn push_char(&mut self, c: char) {
        let mut raw = self.text();
        raw.push(c);
        self.content = escape_html(&raw);
    }

    fn pop_char(&mut self) -> bool {
        let mut raw = self.text();
        let popped = raw.pop().is_some();
        if popped {
            self.content = escape_html(&raw);
        }
        popped
    }
}

#[derive(Debug, Clone)]
pub struct Transcript {
    lines: VecDeque<TranscriptLine>,
    capacity: usize,
}

impl Transcript {
    /// `capacity` is clamped to at least one line
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &TranscriptLine> + ExactSizeIterator {
        self.lines.iter()
    }

    /// The open line, if any
    pub fn current(&self) -> Option<&TranscriptLine> {
        self.lines.back()
    }

    /// Append a line, evicting the oldest first when full. Returns whether a line was evicted.
    pub fn push(&mut self, line: TranscriptLine) -> bool {
        let evicted = self.lines.len() >= self.capacity;
        if evicted {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
        evicted
    }

    /// Replace the open line in place, or append if the transcript is empty
    pub fn replace_current(&mut self, line: TranscriptLine) {
        match self.lines.back_mut() {
            Some(current) => *current = line,
            None => {
                self.push(line);
            }
        }
    }

    /// Append a character to the open line. No-op on an empty transcript.
    pub fn push_char(&mut self, c: char) -> bool {
        match self.lines.back_mut() {
            Some(line) => {
                line.push_char(c);
                true
            }
            None => false,
        }
    }

    /// Remove the last character of the open line. Returns false when there was nothing to remove.
    pub fn pop_char(&mut self) -> bool {
        self.lines.back_mut().is_some_and(TranscriptLine::pop_char)
    }

    /// Decoded text of every retained line, oldest first
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(TranscriptLine::text).collect()
    }
}
