//! Greedy word wrapping against a proportional width function

use crate::document::FontDescriptor;
use crate::measure::TextMeasurer;
use smallvec::{smallvec, SmallVec};
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;

/// Wrapped lines of one paragraph; most paragraphs are short
pub type WrappedLines = SmallVec<[String; 4]>;

/// Split text on explicit line breaks (`\n`, `\r\n` or a lone `\r`)
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let normalized: Cow<'_, str> = if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    };
    normalized.split('\n').map(str::to_string).collect()
}

/// Line breaker bound to one font, size and content width
pub struct LineBreaker<'a> {
    measurer: &'a mut TextMeasurer,
    font: &'a FontDescriptor,
    font_size: f32,
    max_width: f32,
}

impl<'a> LineBreaker<'a> {
    pub fn new(
        measurer: &'a mut TextMeasurer,
        font: &'a FontDescriptor,
        font_size: f32,
        max_width: f32,
    ) -> Self {
        Self {
            measurer,
            font,
            font_size,
            max_width,
        }
    }

    fn width(&mut self, text: &str) -> f32 {
        self.measurer.measure_width(text, self.font, self.font_size)
    }

    /// Wrap one paragraph (text without explicit line breaks) into lines.
    ///
    /// A blank paragraph gives exactly one empty line; no paragraph ever
    /// gives zero lines.
    pub fn wrap_paragraph(&mut self, paragraph: &str) -> WrappedLines {
        if paragraph.trim().is_empty() {
            return smallvec![String::new()];
        }

        let mut lines = WrappedLines::new();
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            // Too wide for any line: flush and break by characters
            if self.width(word) > self.max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut chunks = self.break_long_word(word);
                current = chunks.pop().unwrap_or_default();
                lines.extend(chunks);
                continue;
            }

            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if self.width(&candidate) <= self.max_width {
                current = candidate;
            } else {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = word.to_string();
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        if lines.is_empty() {
            lines.push(String::new());
        }

        lines
    }

    /// Break a word into maximal chunks that each fit the content width.
    ///
    /// Packs whole grapheme clusters and never inserts a hyphen, so the
    /// chunks concatenate back to `word`. Each chunk holds at least one
    /// cluster, even when that cluster alone is wider than the line.
    pub fn break_long_word(&mut self, word: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut chunk = String::new();

        for grapheme in word.graphemes(true) {
            chunk.push_str(grapheme);
            if chunk.len() > grapheme.len() && self.width(&chunk) > self.max_width {
                chunk.truncate(chunk.len() - grapheme.len());
                chunks.push(std::mem::replace(&mut chunk, grapheme.to_string()));
            }
        }

        if !chunk.is_empty() {
            chunks.push(chunk);
        }

        chunks
    }
}
