//! Font and page style descriptors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A font as seen by layout: an opaque id for cache keys plus the family
/// name handed to the measurement source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontDescriptor {
    /// Must be stable for a given visual font
    pub id: String,
    pub family: String,
    /// Pixel size
    pub size: f32,
}

impl FontDescriptor {
    pub fn new(id: impl Into<String>, family: impl Into<String>, size: f32) -> Self {
        Self {
            id: id.into(),
            family: family.into(),
            size,
        }
    }
}

/// Background decoration of a page. Rendering only; never affects placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStyle {
    #[default]
    Ruled,
    Lined,
    Unruled,
}

impl PageStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStyle::Ruled => "ruled",
            PageStyle::Lined => "lined",
            PageStyle::Unruled => "unruled",
        }
    }

    /// Numeric code used by the flat buffer protocol
    pub fn code(&self) -> u32 {
        match self {
            PageStyle::Ruled => 0,
            PageStyle::Lined => 1,
            PageStyle::Unruled => 2,
        }
    }
}

impl fmt::Display for PageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognised page style names
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown page style: {0}")]
pub struct UnknownPageStyle(pub String);

impl FromStr for PageStyle {
    type Err = UnknownPageStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ruled" => Ok(PageStyle::Ruled),
            "lined" => Ok(PageStyle::Lined),
            "unruled" | "blank" | "plain" => Ok(PageStyle::Unruled),
            _ => Err(UnknownPageStyle(s.to_string())),
        }
    }
}
