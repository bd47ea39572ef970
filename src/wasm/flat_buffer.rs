//! Flat buffer protocol for zero-copy layout transfer
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x4E424C59 = "NBLY" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     page_count
//! [3]     total_lines
//! [4]     text_buffer_len
//! [5..]   page data...
//!
//! Per-page:
//!   page_number (1-based)
//!   style (0 = ruled, 1 = lined, 2 = unruled)
//!   line_count
//!   per-line: [text_offset, text_len, text_utf16_offset, text_utf16_len]
//!     text_offset/text_len: byte offsets in text_data (UTF-8)
//!     text_utf16_offset/text_utf16_len: offsets for JS substring (after single decode)
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! Per-line: [x, y, font_size]
//! ```

use crate::render::LayoutResult;

/// Magic number for format validation: "NBLY" (NoteBook LaYout)
pub const MAGIC: u32 = 0x4E42_4C59;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 5;

/// Number of u32 values per page header
pub const U32_PER_PAGE: usize = 3;

/// Number of u32 values per line
/// [text_offset, text_len, text_utf16_offset, text_utf16_len]
pub const U32_PER_LINE: usize = 4;

/// Number of f32 values per line
/// [x, y, font_size]
pub const F32_PER_LINE: usize = 3;

/// Layout buffer for zero-copy WASM transfer
pub struct LayoutBuffer {
    /// Integer data (header, counts, offsets)
    pub u32_data: Vec<u32>,
    /// Float data (positions, sizes)
    pub f32_data: Vec<f32>,
    /// UTF-8 text buffer
    pub text_data: Vec<u8>,

    // Track cumulative UTF-16 offset for efficient JS decoding
    utf16_text_offset: usize,
}

impl Default for LayoutBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutBuffer {
    pub fn new() -> Self {
        Self {
            u32_data: Vec::with_capacity(1024),
            f32_data: Vec::with_capacity(1024),
            text_data: Vec::with_capacity(4096),
            utf16_text_offset: 0,
        }
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
        self.text_data.clear();
        self.utf16_text_offset = 0;
    }

    /// Pre-allocate buffers so pointers handed to JS stay valid while writing.
    ///
    /// Existing allocations are reused when they are already large enough.
    pub fn prepare(&mut self, u32_needed: usize, f32_needed: usize, text_needed: usize) {
        let u32_target = u32_needed + 32;
        let f32_target = f32_needed + 32;
        let text_target = text_needed + 256;

        if self.u32_data.capacity() < u32_target {
            self.u32_data = Vec::with_capacity(u32_target);
        } else {
            self.u32_data.clear();
        }

        if self.f32_data.capacity() < f32_target {
            self.f32_data = Vec::with_capacity(f32_target);
        } else {
            self.f32_data.clear();
        }

        if self.text_data.capacity() < text_target {
            self.text_data = Vec::with_capacity(text_target);
        } else {
            self.text_data.clear();
        }

        self.utf16_text_offset = 0;
    }

    pub fn write_header(&mut self, page_count: u32, total_lines: u32) {
        self.u32_data.push(MAGIC); // [0] magic number
        self.u32_data.push(SCHEMA_VERSION); // [1] schema version
        self.u32_data.push(page_count); // [2] page_count
        self.u32_data.push(total_lines); // [3] total_lines
        self.u32_data.push(0); // [4] text_buffer_len (placeholder)
    }

    /// Write page header, returns index where line_count should be written
    pub fn begin_page(&mut self, page_number: usize, style: u32) -> usize {
        self.u32_data.push(page_number as u32);
        self.u32_data.push(style);
        let line_count_idx = self.u32_data.len();
        self.u32_data.push(0); // line_count placeholder
        line_count_idx
    }

    /// Update line count for a page
    pub fn set_line_count(&mut self, idx: usize, count: u32) {
        if idx < self.u32_data.len() {
            self.u32_data[idx] = count;
        }
    }

    /// Write a text line
    pub fn write_line(&mut self, x: f32, y: f32, font_size: f32, text: &str) {
        let text_offset = self.text_data.len() as u32;
        self.text_data.extend_from_slice(text.as_bytes());
        let text_len = text.len() as u32;

        let text_utf16_offset = self.utf16_text_offset as u32;
        let text_utf16_len = text.chars().map(char::len_utf16).sum::<usize>() as u32;
        self.utf16_text_offset += text_utf16_len as usize;

        debug_assert!(
            (text_offset as u64) + (text_len as u64) <= u32::MAX as u64,
            "Text offset + length overflow: {} + {} > u32::MAX",
            text_offset,
            text_len
        );

        self.u32_data.push(text_offset);
        self.u32_data.push(text_len);
        self.u32_data.push(text_utf16_offset);
        self.u32_data.push(text_utf16_len);

        self.f32_data.push(x);
        self.f32_data.push(y);
        self.f32_data.push(font_size);
    }

    /// Synchronize the header with the written data. Must be called after
    /// all pages and lines are written.
    pub fn finalize(&mut self) {
        if self.u32_data.len() < HEADER_SIZE {
            return;
        }

        self.u32_data[4] = self.text_data.len() as u32;

        #[cfg(debug_assertions)]
        self.validate_text_offsets();
    }

    /// Validate that all text offsets are within bounds (debug builds only)
    #[cfg(debug_assertions)]
    fn validate_text_offsets(&self) {
        let page_count = self.u32_data[2] as usize;
        let text_len = self.text_data.len();
        let mut idx = HEADER_SIZE;

        for page_idx in 0..page_count {
            if idx + U32_PER_PAGE > self.u32_data.len() {
                break;
            }
            let line_count = self.u32_data[idx + 2] as usize;
            idx += U32_PER_PAGE;

            for line_idx in 0..line_count {
                if idx + U32_PER_LINE > self.u32_data.len() {
                    break;
                }
                let text_offset = self.u32_data[idx] as usize;
                let text_length = self.u32_data[idx + 1] as usize;
                debug_assert!(
                    text_offset + text_length <= text_len,
                    "Invalid text range for page {}, line {}: offset {} + length {} > text buffer size {}",
                    page_idx,
                    line_idx,
                    text_offset,
                    text_length,
                    text_len
                );
                idx += U32_PER_LINE;
            }
        }
    }

    /// Encode a whole layout, replacing any previous contents
    pub fn encode(&mut self, layout: &LayoutResult) {
        let page_count = layout.pages.len();
        let line_count = layout.total_lines;
        let text_needed = layout.lines().map(|l| l.text.len()).sum();

        self.prepare(
            HEADER_SIZE + page_count * U32_PER_PAGE + line_count * U32_PER_LINE,
            line_count * F32_PER_LINE,
            text_needed,
        );
        self.write_header(page_count as u32, line_count as u32);

        for page in &layout.pages {
            let line_count_idx = self.begin_page(page.page_number, page.style.code());
            for line in &page.lines {
                self.write_line(line.x, line.y, line.font_size, &line.text);
            }
            self.set_line_count(line_count_idx, page.lines.len() as u32);
        }

        self.finalize();
    }

    // Accessors for WASM
    // Return u32 instead of usize for explicit WASM contract (wasm32 linear memory uses u32 offsets)

    pub fn u32_ptr(&self) -> u32 {
        self.u32_data.as_ptr() as usize as u32
    }

    pub fn u32_len(&self) -> u32 {
        self.u32_data.len() as u32
    }

    pub fn f32_ptr(&self) -> u32 {
        self.f32_data.as_ptr() as usize as u32
    }

    pub fn f32_len(&self) -> u32 {
        self.f32_data.len() as u32
    }

    pub fn text_ptr(&self) -> u32 {
        self.text_data.as_ptr() as usize as u32
    }

    pub fn text_len(&self) -> u32 {
        self.text_data.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageStyle;
    use crate::render::{CanvasLine, CanvasPage};

    fn line(text: &str, y: f32) -> CanvasLine {
        CanvasLine {
            text: text.to_string(),
            x: 96.0,
            y,
            font_size: 18.0,
        }
    }

    fn two_page_layout() -> LayoutResult {
        let mut first = CanvasPage::new(1, PageStyle::Lined);
        first.lines.push(line("Hello", 96.0));
        first.lines.push(line("", 128.0));
        let mut second = CanvasPage::new(2, PageStyle::Lined);
        second.lines.push(line("World", 96.0));
        LayoutResult::new(vec![first, second], 3)
    }

    #[test]
    fn test_layout_buffer_basic() {
        let mut buf = LayoutBuffer::new();
        buf.write_header(1, 1);

        let line_idx = buf.begin_page(1, PageStyle::Ruled.code());
        buf.write_line(96.0, 96.0, 18.0, "Hello");
        buf.set_line_count(line_idx, 1);
        buf.finalize();

        assert_eq!(buf.u32_data[0], MAGIC);
        assert_eq!(buf.u32_data[1], SCHEMA_VERSION);
        assert_eq!(buf.u32_data[2], 1); // page_count
        assert_eq!(buf.u32_data[3], 1); // total_lines
        assert_eq!(buf.u32_data[4], 5); // text_buffer_len
        assert_eq!(buf.text_data, b"Hello");
        assert_eq!(buf.f32_data, [96.0, 96.0, 18.0]);
    }

    #[test]
    fn test_encode_layout() {
        let mut buf = LayoutBuffer::new();
        buf.encode(&two_page_layout());

        assert_eq!(&buf.u32_data[..HEADER_SIZE], &[MAGIC, SCHEMA_VERSION, 2, 3, 10]);

        // First page header
        let page = HEADER_SIZE;
        assert_eq!(&buf.u32_data[page..page + U32_PER_PAGE], &[1, 1, 2]);

        // Blank spacer line has zero length at the running offset
        let blank = page + U32_PER_PAGE + U32_PER_LINE;
        assert_eq!(&buf.u32_data[blank..blank + U32_PER_LINE], &[5, 0, 5, 0]);

        // Second page starts after two lines
        let second = page + U32_PER_PAGE + 2 * U32_PER_LINE;
        assert_eq!(&buf.u32_data[second..second + U32_PER_PAGE], &[2, 1, 1]);
        assert_eq!(buf.u32_data.len(), second + U32_PER_PAGE + U32_PER_LINE);

        assert_eq!(buf.f32_data.len(), 3 * F32_PER_LINE);
        assert_eq!(buf.f32_data[4], 128.0);
        assert_eq!(buf.text_data, b"HelloWorld");
    }

    #[test]
    fn test_encode_empty_layout() {
        let mut buf = LayoutBuffer::new();
        buf.encode(&LayoutResult::default());

        assert_eq!(buf.u32_data, [MAGIC, SCHEMA_VERSION, 0, 0, 0]);
        assert!(buf.f32_data.is_empty());
        assert!(buf.text_data.is_empty());
    }

    #[test]
    fn test_reencode_resets_offsets() {
        let mut buf = LayoutBuffer::new();
        buf.encode(&two_page_layout());
        buf.encode(&two_page_layout());

        assert_eq!(buf.u32_data[2], 2);
        assert_eq!(buf.text_data, b"HelloWorld");
        // First line again starts at utf16 offset 0
        assert_eq!(buf.u32_data[HEADER_SIZE + U32_PER_PAGE + 2], 0);
    }

    #[test]
    fn test_prepare_prevents_reallocation() {
        let mut buf = LayoutBuffer::new();
        let line_count = 200;
        let page_count = 8;
        let text = "Hello, World! This is a test line with some text.";

        buf.prepare(
            HEADER_SIZE + page_count * U32_PER_PAGE + line_count * U32_PER_LINE,
            line_count * F32_PER_LINE,
            line_count * text.len(),
        );
        let u32_capacity = buf.u32_data.capacity();
        let f32_capacity = buf.f32_data.capacity();
        let text_capacity = buf.text_data.capacity();

        buf.write_header(page_count as u32, line_count as u32);
        for p in 0..page_count {
            let line_idx = buf.begin_page(p + 1, 0);
            for i in 0..line_count / page_count {
                buf.write_line(96.0, 96.0 + i as f32 * 32.0, 18.0, text);
            }
            buf.set_line_count(line_idx, (line_count / page_count) as u32);
        }
        buf.finalize();

        assert_eq!(buf.u32_data.capacity(), u32_capacity, "u32_data was reallocated");
        assert_eq!(buf.f32_data.capacity(), f32_capacity, "f32_data was reallocated");
        assert_eq!(buf.text_data.capacity(), text_capacity, "text_data was reallocated");
    }

    #[test]
    fn test_utf16_offsets_for_batch_decode() {
        let mut buf = LayoutBuffer::new();
        buf.write_header(1, 3);

        let line_count_idx = buf.begin_page(1, 0);
        buf.write_line(0.0, 0.0, 18.0, "Hello World");
        // "Test 😀 emoji" = 5 + 2 + 6 UTF-16 units
        buf.write_line(0.0, 20.0, 18.0, "Test 😀 emoji");
        // 10 chars, each 1 UTF-16 unit
        buf.write_line(0.0, 40.0, 18.0, "Привет мир");
        buf.set_line_count(line_count_idx, 3);
        buf.finalize();

        let first = HEADER_SIZE + U32_PER_PAGE;
        assert_eq!(buf.u32_data[first + 2], 0, "Line 1 utf16 offset");
        assert_eq!(buf.u32_data[first + 3], 11, "Line 1 utf16 len");

        assert_eq!(buf.u32_data[first + U32_PER_LINE + 2], 11, "Line 2 utf16 offset");
        assert_eq!(buf.u32_data[first + U32_PER_LINE + 3], 13, "Line 2 utf16 len");

        assert_eq!(buf.u32_data[first + U32_PER_LINE * 2 + 2], 24, "Line 3 utf16 offset");
        assert_eq!(buf.u32_data[first + U32_PER_LINE * 2 + 3], 10, "Line 3 utf16 len");
        // Byte length differs from UTF-16 length for Cyrillic
        assert_eq!(buf.u32_data[first + U32_PER_LINE * 2 + 1], 19, "Line 3 byte len");

        assert_eq!(buf.utf16_text_offset, 34);
    }
}
