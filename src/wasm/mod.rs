//! WASM bindings for the layout engine

mod flat_buffer;

pub use flat_buffer::{
    LayoutBuffer, F32_PER_LINE, HEADER_SIZE, MAGIC, SCHEMA_VERSION, U32_PER_LINE, U32_PER_PAGE,
};

use crate::document::{Answer, FontDescriptor, PageStyle};
use crate::layout::{LayoutConfig, LayoutConfigUpdate, LayoutEngine};
use crate::measure::MeasureSource;
use crate::LayoutError;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Measurement source backed by a JS callback `(text, family, size) => width`,
/// typically wrapping `CanvasRenderingContext2D.measureText`
pub struct JsMeasureSource {
    callback: js_sys::Function,
}

impl JsMeasureSource {
    pub fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }
}

impl MeasureSource for JsMeasureSource {
    fn advance_width(&self, text: &str, family: &str, size: f32) -> Option<f32> {
        // A throwing or non-numeric callback means "no answer"
        let value = self
            .callback
            .call3(
                &JsValue::NULL,
                &JsValue::from_str(text),
                &JsValue::from_str(family),
                &JsValue::from_f64(size as f64),
            )
            .ok()?;
        value.as_f64().map(|width| width as f32)
    }
}

/// Flat layout buffers; JS reads them as typed array views over WASM memory
#[wasm_bindgen]
pub struct FlatLayout {
    buffer: LayoutBuffer,
}

#[wasm_bindgen]
impl FlatLayout {
    #[wasm_bindgen(getter, js_name = u32Ptr)]
    pub fn u32_ptr(&self) -> u32 {
        self.buffer.u32_ptr()
    }

    #[wasm_bindgen(getter, js_name = u32Len)]
    pub fn u32_len(&self) -> u32 {
        self.buffer.u32_len()
    }

    #[wasm_bindgen(getter, js_name = f32Ptr)]
    pub fn f32_ptr(&self) -> u32 {
        self.buffer.f32_ptr()
    }

    #[wasm_bindgen(getter, js_name = f32Len)]
    pub fn f32_len(&self) -> u32 {
        self.buffer.f32_len()
    }

    #[wasm_bindgen(getter, js_name = textPtr)]
    pub fn text_ptr(&self) -> u32 {
        self.buffer.text_ptr()
    }

    #[wasm_bindgen(getter, js_name = textLen)]
    pub fn text_len(&self) -> u32 {
        self.buffer.text_len()
    }
}

/// WASM-exposed layout engine wrapper.
///
/// Structured arguments travel as JSON strings, matching the serde shapes
/// of [`Answer`], [`FontDescriptor`] and [`LayoutConfig`].
#[wasm_bindgen]
pub struct WasmLayoutEngine {
    engine: LayoutEngine,
}

#[wasm_bindgen]
impl WasmLayoutEngine {
    /// Create an engine, optionally from a full config JSON.
    /// Starts in headless mode until a measure callback is set.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmLayoutEngine, JsError> {
        let config = match config_json {
            Some(json) => parse_config(&json)?,
            None => LayoutConfig::default(),
        };
        Ok(Self {
            engine: LayoutEngine::new(config)?,
        })
    }

    /// Attach a `(text, family, size) => width` callback, or detach with
    /// `undefined` to go back to approximate widths
    #[wasm_bindgen(js_name = setMeasureCallback)]
    pub fn set_measure_callback(&mut self, callback: Option<js_sys::Function>) {
        let source = callback.map(|f| Box::new(JsMeasureSource::new(f)) as Box<dyn MeasureSource>);
        self.engine.set_measure_source(source);
    }

    /// Lay out answers and return the result as JSON
    #[wasm_bindgen(js_name = calculateLayout)]
    pub fn calculate_layout(
        &mut self,
        answers_json: &str,
        font_json: &str,
        style: &str,
    ) -> Result<String, JsError> {
        Ok(layout_json(&mut self.engine, answers_json, font_json, style)?)
    }

    /// Lay out answers into flat buffers
    #[wasm_bindgen(js_name = calculateLayoutFlat)]
    pub fn calculate_layout_flat(
        &mut self,
        answers_json: &str,
        font_json: &str,
        style: &str,
    ) -> Result<FlatLayout, JsError> {
        Ok(FlatLayout {
            buffer: layout_flat(&mut self.engine, answers_json, font_json, style)?,
        })
    }

    #[wasm_bindgen(js_name = estimatePageCount)]
    pub fn estimate_page_count(&mut self, answers_json: &str, font_json: &str) -> Result<usize, JsError> {
        let answers = parse_answers(answers_json)?;
        let font = parse_font(font_json)?;
        Ok(self.engine.estimate_page_count(&answers, &font))
    }

    /// Merge a partial config JSON; rejected updates leave the engine untouched
    #[wasm_bindgen(js_name = updateConfig)]
    pub fn update_config(&mut self, partial_json: &str) -> Result<(), JsError> {
        Ok(apply_config_json(&mut self.engine, partial_json)?)
    }

    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.engine.config())?)
    }

    #[wasm_bindgen(js_name = getMargins)]
    pub fn get_margins(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.engine.margins())?)
    }

    #[wasm_bindgen(js_name = getCacheStats)]
    pub fn get_cache_stats(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.engine.cache_stats())?)
    }

    #[wasm_bindgen(js_name = maxLinesPerPage)]
    pub fn max_lines_per_page(&self) -> usize {
        self.engine.max_lines_per_page()
    }

    #[wasm_bindgen(js_name = contentWidth)]
    pub fn content_width(&self) -> f32 {
        self.engine.content_width()
    }

    #[wasm_bindgen(js_name = contentHeight)]
    pub fn content_height(&self) -> f32 {
        self.engine.content_height()
    }

    /// Measure through the engine's cache, for renderers placing text
    #[wasm_bindgen(js_name = measureWidth)]
    pub fn measure_width(&mut self, text: &str, font_json: &str, size: f32) -> Result<f32, JsError> {
        let font = parse_font(font_json)?;
        Ok(self.engine.measure_width(text, &font, size))
    }

    #[wasm_bindgen(js_name = clearCache)]
    pub fn clear_cache(&mut self) {
        self.engine.clear_cache();
    }

    /// Release caches and the measure callback
    pub fn destroy(&mut self) {
        self.engine.destroy();
    }
}

fn parse_config(json: &str) -> Result<LayoutConfig, LayoutError> {
    let config: LayoutConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

fn parse_answers(json: &str) -> Result<Vec<Answer>, LayoutError> {
    Ok(serde_json::from_str(json)?)
}

fn parse_font(json: &str) -> Result<FontDescriptor, LayoutError> {
    Ok(serde_json::from_str(json)?)
}

fn apply_config_json(engine: &mut LayoutEngine, partial_json: &str) -> Result<(), LayoutError> {
    let update: LayoutConfigUpdate = serde_json::from_str(partial_json)?;
    engine.update_config(&update)
}

fn layout_json(
    engine: &mut LayoutEngine,
    answers_json: &str,
    font_json: &str,
    style: &str,
) -> Result<String, LayoutError> {
    let answers = parse_answers(answers_json)?;
    let font = parse_font(font_json)?;
    let style: PageStyle = style.parse()?;
    let layout = engine.calculate_layout(&answers, &font, style);
    Ok(serde_json::to_string(&*layout)?)
}

fn layout_flat(
    engine: &mut LayoutEngine,
    answers_json: &str,
    font_json: &str,
    style: &str,
) -> Result<LayoutBuffer, LayoutError> {
    let answers = parse_answers(answers_json)?;
    let font = parse_font(font_json)?;
    let style: PageStyle = style.parse()?;
    let layout = engine.calculate_layout(&answers, &font, style);

    let mut buffer = LayoutBuffer::new();
    buffer.encode(&layout);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT: &str = r#"{"id": "sans-18", "family": "Sans", "size": 18}"#;

    #[test]
    fn test_layout_json_shape() {
        let mut engine = LayoutEngine::default();
        let answers = r#"[{"questionNumber": 1, "content": "hello world"}]"#;
        let json = layout_json(&mut engine, answers, FONT, "lined").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["totalPages"], 1);
        assert_eq!(value["totalLines"], 1);
        let page = &value["pages"][0];
        assert_eq!(page["pageNumber"], 1);
        assert_eq!(page["style"], "lined");
        assert_eq!(page["lines"][0]["text"], "hello world");
        assert_eq!(page["lines"][0]["x"], 96.0);
        assert_eq!(page["lines"][0]["fontSize"], 18.0);
    }

    #[test]
    fn test_layout_flat_header() {
        let mut engine = LayoutEngine::default();
        let answers = r#"[{"questionNumber": 1, "content": "one"}, {"questionNumber": 2, "content": "two"}]"#;
        let buffer = layout_flat(&mut engine, answers, FONT, "ruled").unwrap();

        assert_eq!(buffer.u32_data[0], MAGIC);
        assert_eq!(buffer.u32_data[2], 1); // page_count
        assert_eq!(buffer.u32_data[3], 3); // two lines plus one spacer
        assert_eq!(buffer.text_data, b"onetwo");
    }

    #[test]
    fn test_bad_input_is_an_error() {
        let mut engine = LayoutEngine::default();
        assert!(matches!(
            layout_json(&mut engine, "not json", FONT, "ruled"),
            Err(LayoutError::Json(_))
        ));
        assert!(matches!(
            layout_json(&mut engine, "[]", FONT, "dotted"),
            Err(LayoutError::PageStyle(_))
        ));
    }

    #[test]
    fn test_partial_config_json() {
        let mut engine = LayoutEngine::default();
        apply_config_json(&mut engine, r#"{"lineHeight": 24}"#).unwrap();
        assert_eq!(engine.config().line_height, 24.0);
        assert_eq!(engine.max_lines_per_page(), 36); // 864 / 24

        assert!(apply_config_json(&mut engine, r#"{"pageWidth": 0}"#).is_err());
        assert_eq!(engine.config().page_width, 816.0);
    }

    #[test]
    fn test_parse_config_validates() {
        let mut config = serde_json::to_value(LayoutConfig::default()).unwrap();
        config["fontSize"] = serde_json::json!(-1.0);
        assert!(matches!(
            parse_config(&config.to_string()),
            Err(LayoutError::InvalidConfig { field: "fontSize", .. })
        ));
    }
}
