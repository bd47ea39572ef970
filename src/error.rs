use thiserror::Error;

/// All errors the crate can produce. The layout path itself never fails;
/// these come from configuration validation, font loading and the JS bridge.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A configuration value was rejected before being committed
    #[error("invalid layout config: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f32 },

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FontParse(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    PageStyle(#[from] crate::document::UnknownPageStyle),

    #[error(transparent)]
    /// A JSON payload could not be read or written
    Json(#[from] serde_json::Error),
}
