//! Unit conversions between physical page sizes and pixels

/// CSS reference resolution
pub const DEFAULT_DPI: f32 = 96.0;

/// Typographic points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

pub fn inches_to_pixels(inches: f32, dpi: f32) -> f32 {
    inches * dpi
}

pub fn pixels_to_inches(pixels: f32, dpi: f32) -> f32 {
    if dpi == 0.0 {
        return 0.0;
    }
    pixels / dpi
}

pub fn points_to_pixels(points: f32, dpi: f32) -> f32 {
    points / POINTS_PER_INCH * dpi
}

pub fn pixels_to_points(pixels: f32, dpi: f32) -> f32 {
    if dpi == 0.0 {
        return 0.0;
    }
    pixels / dpi * POINTS_PER_INCH
}
