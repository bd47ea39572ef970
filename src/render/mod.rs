//! Render output: positioned lines grouped into pages

mod display;

pub use display::{CanvasLine, CanvasPage, LayoutResult};
