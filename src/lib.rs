//! Notebook-Layout: pagination core for handwritten-style notebook answers
//!
//! This crate turns a list of answers into fixed-pitch notebook pages:
//! - Pluggable text measurement with bounded caches and a headless fallback
//! - Greedy word wrap with grapheme-safe breaking of overlong words
//! - Answer assembly with configurable spacer lines
//! - Memoized pagination onto ruled, lined or unruled pages
//! - A flat-buffer WASM bridge for canvas renderers

pub mod cache;
pub mod document;
mod error;
pub mod layout;
pub mod measure;
pub mod render;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::{FlatLayout, WasmLayoutEngine};

// Re-export primary types
pub use document::{Answer, FontDescriptor, PageStyle};
pub use error::LayoutError;
pub use layout::{CacheStats, LayoutConfig, LayoutConfigUpdate, LayoutEngine, LineWithMetadata, Margins};
pub use measure::{MeasureSource, TextMeasurer, TextMetrics};
pub use render::{CanvasLine, CanvasPage, LayoutResult};
