//! Render-ready page output

use crate::document::PageStyle;
use serde::Serialize;

/// One placed line of text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasLine {
    pub text: String,
    /// Always the left margin
    pub x: f32,
    /// Top margin plus the line's index on its page times the line pitch
    pub y: f32,
    pub font_size: f32,
}

/// A single notebook page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasPage {
    /// 1-based, contiguous
    pub page_number: usize,
    pub lines: Vec<CanvasLine>,
    pub style: PageStyle,
}

impl CanvasPage {
    pub fn new(page_number: usize, style: PageStyle) -> Self {
        Self {
            page_number,
            lines: Vec::new(),
            style,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Complete layout output
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub pages: Vec<CanvasPage>,
    /// Always `pages.len()`
    pub total_pages: usize,
    /// Wrapped lines plus inter-answer spacers
    pub total_lines: usize,
}

impl LayoutResult {
    pub fn new(pages: Vec<CanvasPage>, total_lines: usize) -> Self {
        Self {
            total_pages: pages.len(),
            pages,
            total_lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get a page by its 1-based number
    pub fn page(&self, page_number: usize) -> Option<&CanvasPage> {
        page_number
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
    }

    /// All placed lines in reading order
    pub fn lines(&self) -> impl Iterator<Item = &CanvasLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }
}
