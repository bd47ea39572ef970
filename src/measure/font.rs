//! Pre-baked character width tables

use crate::measure::source::{MeasureSource, VerticalMetrics};
use rustc_hash::FxHashMap;

/// Advance widths for Helvetica, ASCII 32..=126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Width table for one font, in em units (multiplied by pixel size at lookup)
#[derive(Debug, Clone)]
pub struct WidthTable {
    /// Width of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Width for everything outside the table
    pub default_width: f32,
    /// Ascent as a fraction of the font size
    pub ascent: f32,
    /// Descent as a fraction of the font size
    pub descent: f32,
}

impl Default for WidthTable {
    fn default() -> Self {
        Self::monospace(0.6)
    }
}

impl WidthTable {
    pub fn new(char_widths: Vec<f32>, default_width: f32, ascent: f32, descent: f32) -> Self {
        Self {
            char_widths,
            default_width,
            ascent,
            descent,
        }
    }

    /// Every printable character advances by `advance` em
    pub fn monospace(advance: f32) -> Self {
        let mut char_widths = vec![advance; 128];
        for (c, w) in char_widths.iter_mut().enumerate().take(32) {
            if c != b'\t' as usize {
                *w = 0.0;
            }
        }
        char_widths[b'\t' as usize] = advance * 4.0;
        Self::new(char_widths, advance, 0.8, 0.2)
    }

    /// Proportional sans-serif metrics
    pub fn helvetica() -> Self {
        let mut char_widths = vec![0.0; 128];
        for (i, w) in HELVETICA_WIDTHS.iter().enumerate() {
            char_widths[32 + i] = *w as f32 / 1000.0;
        }
        char_widths[b'\t' as usize] = char_widths[b' ' as usize] * 4.0;
        Self::new(char_widths, 0.556, 0.718, 0.207)
    }

    /// Get width of a character in em
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        if c.is_control() {
            return 0.0;
        }
        self.default_width
    }

    /// Width of a whole string at `size` pixels
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.width(c)).sum::<f32>() * size
    }
}

/// Library of width tables keyed by family name
#[derive(Debug, Clone, Default)]
pub struct TableSource {
    tables: FxHashMap<String, WidthTable>,
    /// Used for families that were never registered
    fallback: Option<WidthTable>,
}

impl TableSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source answering for every family with the same table
    pub fn uniform(table: WidthTable) -> Self {
        Self {
            tables: FxHashMap::default(),
            fallback: Some(table),
        }
    }

    /// Register a table for a family (case-insensitive)
    pub fn insert(&mut self, family: &str, table: WidthTable) {
        self.tables.insert(family.to_lowercase(), table);
    }

    pub fn with_family(mut self, family: &str, table: WidthTable) -> Self {
        self.insert(family, table);
        self
    }

    pub fn set_fallback(&mut self, table: Option<WidthTable>) {
        self.fallback = table;
    }

    /// Get the table for a family
    pub fn get(&self, family: &str) -> Option<&WidthTable> {
        self.tables
            .get(&family.to_lowercase())
            .or(self.fallback.as_ref())
    }
}

impl MeasureSource for TableSource {
    fn advance_width(&self, text: &str, family: &str, size: f32) -> Option<f32> {
        self.get(family).map(|table| table.text_width(text, size))
    }

    fn vertical_metrics(&self, _text: &str, family: &str, size: f32) -> Option<VerticalMetrics> {
        self.get(family).map(|table| VerticalMetrics {
            ascent: table.ascent * size,
            descent: table.descent * size,
        })
    }
}

impl MeasureSource for WidthTable {
    fn advance_width(&self, text: &str, _family: &str, size: f32) -> Option<f32> {
        Some(self.text_width(text, size))
    }

    fn vertical_metrics(&self, _text: &str, _family: &str, size: f32) -> Option<VerticalMetrics> {
        Some(VerticalMetrics {
            ascent: self.ascent * size,
            descent: self.descent * size,
        })
    }
}
