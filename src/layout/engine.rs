//! Core layout engine with memoized results

use crate::cache::{BoundedCache, LAYOUT_CACHE_CAPACITY};
use crate::document::{Answer, FontDescriptor, PageStyle};
use crate::layout::assembly::{assemble_lines, LineWithMetadata};
use crate::layout::config::{LayoutConfig, LayoutConfigUpdate, Margins};
use crate::layout::line_break::{split_paragraphs, LineBreaker, WrappedLines};
use crate::layout::pagination::{page_count, paginate};
use crate::measure::{MeasureSource, TextMeasurer, TextMetrics};
use crate::render::LayoutResult;
use crate::LayoutError;
use serde::Serialize;
use std::fmt::Write as _;
use std::rc::Rc;

/// Characters of a paragraph that take part in its line cache key
pub const LINE_KEY_PREFIX_CHARS: usize = 100;

/// Line cache key.
///
/// Only a prefix of the paragraph is kept, so two long paragraphs sharing
/// their first [`LINE_KEY_PREFIX_CHARS`] characters share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LineKey {
    prefix: String,
    font_id: String,
    page_width_bits: u32,
}

impl LineKey {
    fn new(paragraph: &str, font: &FontDescriptor, page_width: f32) -> Self {
        Self {
            prefix: paragraph.chars().take(LINE_KEY_PREFIX_CHARS).collect(),
            font_id: font.id.clone(),
            page_width_bits: page_width.to_bits(),
        }
    }
}

/// Entry counts of every cache the engine owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub layout_cache_size: usize,
    pub line_cache_size: usize,
    pub width_cache_size: usize,
    pub metrics_cache_size: usize,
}

/// Turns answers into notebook pages.
///
/// Single-threaded by construction: caches are plain owned maps, so
/// independent documents laid out in parallel need separate engines.
#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    measurer: TextMeasurer,
    /// Full results, keyed by answer fingerprints, font, style and config
    layout_cache: BoundedCache<String, Rc<LayoutResult>>,
    /// Wrapped paragraphs
    line_cache: BoundedCache<LineKey, WrappedLines>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::build(LayoutConfig::default(), TextMeasurer::headless(), LAYOUT_CACHE_CAPACITY)
    }
}

impl LayoutEngine {
    /// Create an engine that measures in headless mode
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        Self::with_measurer(config, TextMeasurer::headless())
    }

    /// Create an engine with a specific measurement provider
    pub fn with_measurer(config: LayoutConfig, measurer: TextMeasurer) -> Result<Self, LayoutError> {
        Self::with_capacity(config, measurer, LAYOUT_CACHE_CAPACITY)
    }

    /// Create an engine with explicit layout and line cache capacity
    pub fn with_capacity(
        config: LayoutConfig,
        measurer: TextMeasurer,
        capacity: usize,
    ) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self::build(config, measurer, capacity))
    }

    fn build(config: LayoutConfig, measurer: TextMeasurer, capacity: usize) -> Self {
        Self {
            config,
            measurer,
            layout_cache: BoundedCache::new(capacity),
            line_cache: BoundedCache::new(capacity),
        }
    }

    /// Lay out `answers` onto pages.
    ///
    /// Repeated calls with the same inputs and an untouched cache return the
    /// same `Rc`, so callers can compare results with [`Rc::ptr_eq`].
    pub fn calculate_layout(
        &mut self,
        answers: &[Answer],
        font: &FontDescriptor,
        style: PageStyle,
    ) -> Rc<LayoutResult> {
        let key = self.layout_key(answers, font, style);
        if let Some(cached) = self.layout_cache.get(&key) {
            log::debug!("layout cache hit ({} answers)", answers.len());
            return Rc::clone(cached);
        }

        log::debug!("layout cache miss ({} answers)", answers.len());
        let lines = self.assemble_lines(answers, font);
        let result = Rc::new(paginate(&lines, &self.config, style));
        self.layout_cache.insert(key, Rc::clone(&result));

        result
    }

    /// Wrap every answer and join them into one annotated line stream
    pub fn assemble_lines(&mut self, answers: &[Answer], font: &FontDescriptor) -> Vec<LineWithMetadata> {
        let wrapped: Vec<(u32, Vec<String>)> = answers
            .iter()
            .map(|answer| (answer.question_number, self.wrap_text(&answer.content, font)))
            .collect();
        assemble_lines(wrapped, self.config.answer_spacing)
    }

    /// Wrap a whole text, honouring its explicit line breaks
    pub fn wrap_text(&mut self, text: &str, font: &FontDescriptor) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in split_paragraphs(text) {
            lines.extend(self.wrap_paragraph(&paragraph, font));
        }
        lines
    }

    fn wrap_paragraph(&mut self, paragraph: &str, font: &FontDescriptor) -> WrappedLines {
        if paragraph.trim().is_empty() {
            return WrappedLines::from_elem(String::new(), 1);
        }

        let key = LineKey::new(paragraph, font, self.config.page_width);
        if let Some(lines) = self.line_cache.get(&key) {
            return lines.clone();
        }

        let mut breaker = LineBreaker::new(
            &mut self.measurer,
            font,
            self.config.font_size,
            self.config.content_width(),
        );
        let lines = breaker.wrap_paragraph(paragraph);
        self.line_cache.insert(key, lines.clone());
        lines
    }

    /// Page count without materializing pages. Agrees with
    /// `calculate_layout(..).total_pages` for the same inputs.
    pub fn estimate_page_count(&mut self, answers: &[Answer], font: &FontDescriptor) -> usize {
        let line_count = self.assemble_lines(answers, font).len();
        page_count(line_count, self.max_lines_per_page())
    }

    /// Merge a partial update into the active configuration.
    ///
    /// The merged config is validated first; on error nothing changes. On
    /// success both the layout and line caches are dropped, since almost
    /// every field feeds into wrapping or page capacity.
    pub fn update_config(&mut self, update: &LayoutConfigUpdate) -> Result<(), LayoutError> {
        let merged = update.apply_to(&self.config).map_err(|err| {
            log::warn!("rejected layout config update: {}", err);
            err
        })?;
        self.commit_config(merged);
        Ok(())
    }

    /// Replace the whole configuration
    pub fn set_config(&mut self, config: LayoutConfig) -> Result<(), LayoutError> {
        config.validate()?;
        self.commit_config(config);
        Ok(())
    }

    fn commit_config(&mut self, config: LayoutConfig) {
        self.config = config;
        self.layout_cache.clear();
        self.line_cache.clear();
        log::debug!(
            "layout config updated: {}x{} pitch {} ({} lines/page)",
            config.page_width,
            config.page_height,
            config.line_height,
            config.max_lines_per_page()
        );
    }

    /// Snapshot of the active configuration
    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    pub fn margins(&self) -> Margins {
        self.config.margins()
    }

    pub fn max_lines_per_page(&self) -> usize {
        self.config.max_lines_per_page()
    }

    pub fn content_width(&self) -> f32 {
        self.config.content_width()
    }

    pub fn content_height(&self) -> f32 {
        self.config.content_height()
    }

    /// Swap the measurement source. Every cached layout and wrapped line
    /// was measured with the old source, so all caches are dropped.
    pub fn set_measure_source(&mut self, source: Option<Box<dyn MeasureSource>>) {
        self.measurer.set_source(source);
        self.layout_cache.clear();
        self.line_cache.clear();
        log::debug!("measurement source replaced");
    }

    pub fn measurer(&self) -> &TextMeasurer {
        &self.measurer
    }

    /// Width through the engine's measurement cache, for pixel-accurate
    /// placement by renderers
    pub fn measure_width(&mut self, text: &str, font: &FontDescriptor, size: f32) -> f32 {
        self.measurer.measure_width(text, font, size)
    }

    pub fn get_metrics(&mut self, text: &str, font: &FontDescriptor, size: f32) -> TextMetrics {
        self.measurer.get_metrics(text, font, size)
    }

    /// Drop every cached layout, wrapped line and measurement
    pub fn clear_cache(&mut self) {
        self.layout_cache.clear();
        self.line_cache.clear();
        self.measurer.clear_cache();
        log::debug!("layout caches cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        let measure = self.measurer.stats();
        CacheStats {
            layout_cache_size: self.layout_cache.len(),
            line_cache_size: self.line_cache.len(),
            width_cache_size: measure.width_cache_size,
            metrics_cache_size: measure.metrics_cache_size,
        }
    }

    /// Clear all caches and release the measurement source. Idempotent.
    pub fn destroy(&mut self) {
        self.layout_cache.clear();
        self.line_cache.clear();
        self.measurer.destroy();
    }

    fn layout_key(&self, answers: &[Answer], font: &FontDescriptor, style: PageStyle) -> String {
        let mut key = String::with_capacity(answers.len() * 8 + 256);
        for answer in answers {
            let (number, len) = answer.fingerprint();
            let _ = write!(key, "{number}:{len}|");
        }
        let _ = write!(key, "{}|{}|{}", font.id, style, self.config.fingerprint());
        key
    }
}
