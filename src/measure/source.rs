//! Pluggable measurement backends

/// Vertical extent of a run of text above and below its baseline.
/// Both values are positive distances in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VerticalMetrics {
    pub ascent: f32,
    pub descent: f32,
}

/// Anything that can turn `(text, family, size)` into pixel measurements.
///
/// Returning `None` means the source cannot answer for that request (no
/// surface, unknown family); the measurer then falls back to its
/// approximate model instead of failing.
pub trait MeasureSource {
    /// Summed advance width of `text`
    fn advance_width(&self, text: &str, family: &str, size: f32) -> Option<f32>;

    /// Ink extent of `text`; sources without bounding-box data keep the default
    fn vertical_metrics(&self, _text: &str, _family: &str, _size: f32) -> Option<VerticalMetrics> {
        None
    }
}

/// A plain closure `(text, family, size) -> width` can serve as a source
impl<F> MeasureSource for F
where
    F: Fn(&str, &str, f32) -> f32,
{
    fn advance_width(&self, text: &str, family: &str, size: f32) -> Option<f32> {
        Some(self(text, family, size))
    }
}
