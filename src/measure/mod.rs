//! Text measurement with bounded memoization
//!
//! [`TextMeasurer`] turns `(text, font, size)` into pixel widths and vertical
//! metrics. The actual numbers come from a [`MeasureSource`]; when no source
//! is attached, or the source cannot answer, an approximate model
//! (`chars × size × 0.6`) is used so that headless callers still get a
//! deterministic layout.

mod face;
mod font;
mod source;
pub mod units;

pub use face::FaceSource;
pub use font::{TableSource, WidthTable};
pub use source::{MeasureSource, VerticalMetrics};

use crate::cache::{BoundedCache, MEASURE_CACHE_CAPACITY};
use crate::document::FontDescriptor;
use serde::Serialize;

/// Average advance as a fraction of the font size, used without a source
pub const APPROX_CHAR_WIDTH: f32 = 0.6;

/// Default ascent as a fraction of the font size
pub const DEFAULT_ASCENT: f32 = 0.8;

/// Default descent as a fraction of the font size
pub const DEFAULT_DESCENT: f32 = 0.2;

/// Default line spacing multiplier for [`TextMeasurer::line_height`]
pub const DEFAULT_LINE_SPACING: f32 = 1.5;

/// Probe string for line metrics: one ascender, one descender
const LINE_PROBE: &str = "Mg";

/// Full measurements of a run of text
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TextMetrics {
    pub width: f32,
    /// Always `ascent + descent`
    pub height: f32,
    pub ascent: f32,
    pub descent: f32,
}

/// Cache key: font id, size bits, text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MeasureKey {
    font_id: String,
    size_bits: u32,
    text: String,
}

impl MeasureKey {
    fn new(text: &str, font: &FontDescriptor, size: f32) -> Self {
        Self {
            font_id: font.id.clone(),
            size_bits: size.to_bits(),
            text: text.to_string(),
        }
    }
}

/// Entry counts of the measurement caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureCacheStats {
    pub width_cache_size: usize,
    pub metrics_cache_size: usize,
}

/// Approximate width used in headless mode
pub fn approximate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * APPROX_CHAR_WIDTH
}

/// The measurement provider
pub struct TextMeasurer {
    source: Option<Box<dyn MeasureSource>>,
    widths: BoundedCache<MeasureKey, f32>,
    metrics: BoundedCache<MeasureKey, TextMetrics>,
}

impl std::fmt::Debug for TextMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMeasurer")
            .field("has_source", &self.source.is_some())
            .field("stats", &self.stats())
            .finish()
    }
}

impl Default for TextMeasurer {
    fn default() -> Self {
        Self::headless()
    }
}

impl TextMeasurer {
    /// Create a measurer backed by `source`
    pub fn new(source: impl MeasureSource + 'static) -> Self {
        Self::with_capacity(Some(Box::new(source)), MEASURE_CACHE_CAPACITY)
    }

    /// Create a measurer with no source: every measurement is approximate
    pub fn headless() -> Self {
        Self::with_capacity(None, MEASURE_CACHE_CAPACITY)
    }

    /// Create a measurer with explicit cache capacity
    pub fn with_capacity(source: Option<Box<dyn MeasureSource>>, capacity: usize) -> Self {
        Self {
            source,
            widths: BoundedCache::new(capacity),
            metrics: BoundedCache::new(capacity),
        }
    }

    /// Swap the measurement source. Cached values came from the old one, so
    /// both caches are dropped. Engines go through
    /// `LayoutEngine::set_measure_source` so their layouts are dropped too.
    pub(crate) fn set_source(&mut self, source: Option<Box<dyn MeasureSource>>) {
        self.source = source;
        self.clear_cache();
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Rendered width of `text` in pixels. Empty text is always 0.
    pub fn measure_width(&mut self, text: &str, font: &FontDescriptor, size: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let key = MeasureKey::new(text, font, size);
        if let Some(width) = self.widths.get(&key) {
            return *width;
        }

        let width = self.raw_width(text, &font.family, size);
        self.widths.insert(key, width);
        width
    }

    /// Width and vertical metrics of `text`
    pub fn get_metrics(&mut self, text: &str, font: &FontDescriptor, size: f32) -> TextMetrics {
        let key = MeasureKey::new(text, font, size);
        if let Some(metrics) = self.metrics.get(&key) {
            return *metrics;
        }

        let width = if text.is_empty() {
            0.0
        } else {
            self.raw_width(text, &font.family, size)
        };
        let vertical = self
            .source
            .as_ref()
            .and_then(|s| s.vertical_metrics(text, &font.family, size))
            .filter(|v| v.ascent.is_finite() && v.descent.is_finite())
            .unwrap_or(VerticalMetrics {
                ascent: size * DEFAULT_ASCENT,
                descent: size * DEFAULT_DESCENT,
            });

        let metrics = TextMetrics {
            width,
            height: vertical.ascent + vertical.descent,
            ascent: vertical.ascent,
            descent: vertical.descent,
        };
        self.metrics.insert(key, metrics);
        metrics
    }

    /// Line pitch for `font` at `size` with the default 1.5 spacing
    pub fn line_height(&mut self, font: &FontDescriptor, size: f32) -> f32 {
        self.line_height_with_spacing(font, size, DEFAULT_LINE_SPACING)
    }

    /// Line pitch from the metrics of a fixed sample string
    pub fn line_height_with_spacing(
        &mut self,
        font: &FontDescriptor,
        size: f32,
        spacing: f32,
    ) -> f32 {
        self.get_metrics(LINE_PROBE, font, size).height * spacing
    }

    fn raw_width(&self, text: &str, family: &str, size: f32) -> f32 {
        match self
            .source
            .as_ref()
            .and_then(|s| s.advance_width(text, family, size))
            .filter(|w| w.is_finite())
        {
            Some(width) => width,
            None => {
                log::trace!("approximate width for {:?} in {:?}", text, family);
                approximate_width(text, size)
            }
        }
    }

    pub fn clear_cache(&mut self) {
        self.widths.clear();
        self.metrics.clear();
    }

    /// Clear caches and release the source. Safe to call repeatedly; the
    /// measurer keeps working in headless mode afterwards.
    pub fn destroy(&mut self) {
        self.clear_cache();
        if self.source.take().is_some() {
            log::debug!("measurement source released");
        }
    }

    pub fn stats(&self) -> MeasureCacheStats {
        MeasureCacheStats {
            width_cache_size: self.widths.len(),
            metrics_cache_size: self.metrics.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn font() -> FontDescriptor {
        FontDescriptor::new("test-font", "Test", 10.0)
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_text_is_zero() {
        let mut measurer = TextMeasurer::new(WidthTable::monospace(1.0));
        assert_eq!(measurer.measure_width("", &font(), 10.0), 0.0);
        assert_eq!(measurer.stats().width_cache_size, 0);
    }

    #[test]
    fn test_headless_fallback() {
        let mut measurer = TextMeasurer::headless();
        assert_close(measurer.measure_width("hello", &font(), 10.0), 30.0);

        let metrics = measurer.get_metrics("hello", &font(), 10.0);
        assert_close(metrics.ascent, 8.0);
        assert_close(metrics.descent, 2.0);
        assert_close(metrics.height, 10.0);
    }

    #[test]
    fn test_unknown_family_falls_back() {
        let source = TableSource::new().with_family("Mono", WidthTable::monospace(1.0));
        let mut measurer = TextMeasurer::new(source);

        let mono = FontDescriptor::new("mono", "Mono", 10.0);
        assert_eq!(measurer.measure_width("abc", &mono, 10.0), 30.0);
        assert_close(measurer.measure_width("abc", &font(), 10.0), 18.0);
    }

    #[test]
    fn test_width_is_cached() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut measurer = TextMeasurer::new(move |text: &str, _: &str, size: f32| {
            counter.set(counter.get() + 1);
            text.len() as f32 * size
        });

        assert_eq!(measurer.measure_width("abc", &font(), 2.0), 6.0);
        assert_eq!(measurer.measure_width("abc", &font(), 2.0), 6.0);
        assert_eq!(calls.get(), 1);

        // Size is part of the key
        assert_eq!(measurer.measure_width("abc", &font(), 3.0), 9.0);
        assert_eq!(calls.get(), 2);

        // So is the font id
        let other = FontDescriptor::new("other", "Test", 10.0);
        measurer.measure_width("abc", &other, 2.0);
        assert_eq!(calls.get(), 3);
        assert_eq!(measurer.stats().width_cache_size, 3);
    }

    #[test]
    fn test_non_finite_width_falls_back() {
        let mut measurer = TextMeasurer::new(|_: &str, _: &str, _: f32| f32::NAN);
        assert_close(measurer.measure_width("ab", &font(), 10.0), 12.0);
    }

    #[test]
    fn test_caches_stay_bounded() {
        let mut measurer = TextMeasurer::with_capacity(None, 10);
        for i in 0..50 {
            measurer.measure_width(&format!("word{i}"), &font(), 10.0);
            measurer.get_metrics(&format!("word{i}"), &font(), 10.0);
        }
        let stats = measurer.stats();
        assert_eq!(stats.width_cache_size, 10);
        assert_eq!(stats.metrics_cache_size, 10);
    }

    #[test]
    fn test_line_height_from_sample_metrics() {
        let mut measurer = TextMeasurer::new(WidthTable::monospace(0.5));
        // (0.8 + 0.2) * 20 * 1.5
        assert_close(measurer.line_height(&font(), 20.0), 30.0);
        assert_close(measurer.line_height_with_spacing(&font(), 20.0, 1.0), 20.0);
    }

    #[test]
    fn test_clear_and_destroy() {
        let mut measurer = TextMeasurer::new(WidthTable::monospace(1.0));
        measurer.measure_width("abc", &font(), 10.0);
        measurer.get_metrics("abc", &font(), 10.0);

        measurer.clear_cache();
        assert_eq!(measurer.stats(), MeasureCacheStats::default());
        assert!(measurer.has_source());

        measurer.measure_width("abc", &font(), 10.0);
        measurer.destroy();
        measurer.destroy();
        assert!(!measurer.has_source());
        assert_eq!(measurer.stats(), MeasureCacheStats::default());

        // Still usable, now approximate
        assert_close(measurer.measure_width("abc", &font(), 10.0), 18.0);
    }
}
