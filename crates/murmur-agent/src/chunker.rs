// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splits one long reply into short chat messages.
//!
//! Paragraphs (separated by `'\n'`) are word-wrapped to a maximum line
//! width, then lines are grouped into chunks of at most `max_lines`.
//! Lengths are counted in characters, not bytes.

use murmur_config::model::DeliveryConfig;

/// Reply splitter with fixed limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageChunker {
    max_lines: usize,
    max_chars_per_line: usize,
}

impl Default for MessageChunker {
    fn default() -> Self {
        Self::new(3, 100)
    }
}

impl MessageChunker {
    /// Limits below 1 are raised to 1.
    pub fn new(max_lines: usize, max_chars_per_line: usize) -> Self {
        Self {
            max_lines: max_lines.max(1),
            max_chars_per_line: max_chars_per_line.max(1),
        }
    }

    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self::new(config.max_lines, config.max_chars_per_line)
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn max_chars_per_line(&self) -> usize {
        self.max_chars_per_line
    }

    /// Split `text` into ordered chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        group_lines(&self.wrap(text), self.max_lines)
    }

    /// The wrapped line sequence `split` groups into chunks.
    ///
    /// Rejoining the chunks reproduces these lines exactly, except that a
    /// group of `max_lines` lines that are all blank is not emitted.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            wrap_paragraph(paragraph, self.max_chars_per_line, &mut lines);
        }
        lines
    }
}

/// Split with explicit limits.
pub fn split(text: &str, max_lines: usize, max_chars_per_line: usize) -> Vec<String> {
    MessageChunker::new(max_lines, max_chars_per_line).split(text)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Greedy word wrap.
///
/// A paragraph that already fits is kept verbatim. Otherwise words are
/// repacked with single spaces; a word longer than `max` becomes its own line.
fn wrap_paragraph(paragraph: &str, max: usize, out: &mut Vec<String>) {
    if char_len(paragraph) <= max {
        out.push(paragraph.to_string());
        return;
    }

    let mut line = String::new();
    let mut line_len = 0;
    for word in paragraph.split_whitespace() {
        let word_len = char_len(word);
        if line.is_empty() {
            line.push_str(word);
            line_len = word_len;
        } else if line_len + 1 + word_len <= max {
            line.push(' ');
            line.push_str(word);
            line_len += 1 + word_len;
        } else {
            out.push(std::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
        }
    }
    if !line.is_empty() {
        out.push(line);
    }
}

/// Groups lines into chunks of at most `max_lines`, dropping chunks that
/// would carry only whitespace.
fn group_lines(lines: &[String], max_lines: usize) -> Vec<String> {
    lines
        .chunks(max_lines)
        .map(|group| group.join("\n"))
        .filter(|chunk| !chunk.trim().is_empty())
        .collect()
}
