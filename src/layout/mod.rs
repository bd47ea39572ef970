//! Layout engine: wrapping, answer assembly and pagination

mod assembly;
mod config;
mod engine;
mod line_break;
mod pagination;

pub use assembly::{assemble_lines, LineWithMetadata};
pub use config::{LayoutConfig, LayoutConfigUpdate, Margins};
pub use engine::{CacheStats, LayoutEngine, LINE_KEY_PREFIX_CHARS};
pub use line_break::{split_paragraphs, LineBreaker, WrappedLines};
pub use pagination::{page_count, paginate};
