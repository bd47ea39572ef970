//! Page geometry and layout configuration

use crate::LayoutError;
use serde::{Deserialize, Serialize};

/// Page margins in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Layout configuration. All lengths are pixels in one DPI space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Line pitch
    pub line_height: f32,
    pub font_size: f32,
    /// Blank lines inserted between consecutive answers
    pub answer_spacing: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 816.0,   // 8.5" at 96 DPI
            page_height: 1056.0, // 11" at 96 DPI
            margin_top: 96.0,    // 1" margins
            margin_bottom: 96.0,
            margin_left: 96.0,
            margin_right: 96.0,
            line_height: 32.0,
            font_size: 18.0,
            answer_spacing: 1,
        }
    }
}

impl LayoutConfig {
    /// Get usable content width
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Get usable content height per page
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    /// Lines that fit on one page, never less than 1
    pub fn max_lines_per_page(&self) -> usize {
        let lines = (self.content_height() / self.line_height).floor();
        if lines.is_finite() && lines >= 1.0 {
            lines as usize
        } else {
            1
        }
    }

    pub fn margins(&self) -> Margins {
        Margins {
            top: self.margin_top,
            right: self.margin_right,
            bottom: self.margin_bottom,
            left: self.margin_left,
        }
    }

    /// Check every field before the config is allowed into the engine.
    ///
    /// Margins larger than the page are accepted: they just leave room for a
    /// single line per page.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [
            ("pageWidth", self.page_width),
            ("pageHeight", self.page_height),
            ("lineHeight", self.line_height),
            ("fontSize", self.font_size),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidConfig { field, value });
            }
        }

        let non_negative = [
            ("marginTop", self.margin_top),
            ("marginBottom", self.margin_bottom),
            ("marginLeft", self.margin_left),
            ("marginRight", self.margin_right),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidConfig { field, value });
            }
        }

        Ok(())
    }

    /// Cache-key form of the whole configuration
    pub(crate) fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// Partial configuration update; `None` fields keep their current value
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfigUpdate {
    pub page_width: Option<f32>,
    pub page_height: Option<f32>,
    pub margin_top: Option<f32>,
    pub margin_bottom: Option<f32>,
    pub margin_left: Option<f32>,
    pub margin_right: Option<f32>,
    pub line_height: Option<f32>,
    pub font_size: Option<f32>,
    pub answer_spacing: Option<usize>,
}

impl LayoutConfigUpdate {
    /// Merge onto `base` and validate the result
    pub fn apply_to(&self, base: &LayoutConfig) -> Result<LayoutConfig, LayoutError> {
        let merged = LayoutConfig {
            page_width: self.page_width.unwrap_or(base.page_width),
            page_height: self.page_height.unwrap_or(base.page_height),
            margin_top: self.margin_top.unwrap_or(base.margin_top),
            margin_bottom: self.margin_bottom.unwrap_or(base.margin_bottom),
            margin_left: self.margin_left.unwrap_or(base.margin_left),
            margin_right: self.margin_right.unwrap_or(base.margin_right),
            line_height: self.line_height.unwrap_or(base.line_height),
            font_size: self.font_size.unwrap_or(base.font_size),
            answer_spacing: self.answer_spacing.unwrap_or(base.answer_spacing),
        };
        merged.validate()?;
        Ok(merged)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
