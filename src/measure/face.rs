//! Measurement from parsed TrueType/OpenType faces

use crate::measure::source::{MeasureSource, VerticalMetrics};
use crate::LayoutError;
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OwnedFace};
use rustc_hash::FxHashMap;

/// Font faces registered by family name, measured from their glyph tables
#[derive(Default)]
pub struct FaceSource {
    faces: FxHashMap<String, OwnedFace>,
}

impl std::fmt::Debug for FaceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceSource")
            .field("families", &self.faces.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FaceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `bytes` and register the face under `family` (case-insensitive),
    /// replacing any face previously registered for it
    pub fn add_face(&mut self, family: &str, bytes: Vec<u8>) -> Result<(), LayoutError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        log::debug!(
            "registered face for family {:?} ({} units/em)",
            family,
            face.as_face_ref().units_per_em()
        );
        self.faces.insert(family.to_lowercase(), face);
        Ok(())
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.faces.contains_key(&family.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn face(&self, family: &str) -> Option<&Face<'_>> {
        self.faces.get(&family.to_lowercase()).map(|f| f.as_face_ref())
    }
}

/// Glyph for a character, falling back to the replacement glyph
fn glyph_for(face: &Face<'_>, ch: char) -> Option<GlyphId> {
    face.glyph_index(ch)
        .or_else(|| face.glyph_index('\u{FFFD}'))
}

fn scaling(face: &Face<'_>, size: f32) -> f32 {
    size / face.units_per_em().max(1) as f32
}

impl MeasureSource for FaceSource {
    fn advance_width(&self, text: &str, family: &str, size: f32) -> Option<f32> {
        let face = self.face(family)?;
        let scale = scaling(face, size);
        // u64: a long unbroken token can exceed u32::MAX font units
        let units: u64 = text
            .chars()
            .filter_map(|ch| glyph_for(face, ch))
            .map(|gid| u64::from(face.glyph_hor_advance(gid).unwrap_or_default()))
            .sum();
        Some(units as f32 * scale)
    }

    fn vertical_metrics(&self, text: &str, family: &str, size: f32) -> Option<VerticalMetrics> {
        let face = self.face(family)?;
        let scale = scaling(face, size);

        let mut extent: Option<(i16, i16)> = None;
        for bbox in text
            .chars()
            .filter_map(|ch| glyph_for(face, ch))
            .filter_map(|gid| face.glyph_bounding_box(gid))
        {
            extent = Some(match extent {
                Some((y_min, y_max)) => (y_min.min(bbox.y_min), y_max.max(bbox.y_max)),
                None => (bbox.y_min, bbox.y_max),
            });
        }

        // No outlines (e.g. only whitespace): let the measurer use its defaults
        let (y_min, y_max) = extent?;
        Some(VerticalMetrics {
            ascent: (y_max.max(0) as f32) * scale,
            descent: (-(y_min.min(0) as i32)) as f32 * scale,
        })
    }
}
