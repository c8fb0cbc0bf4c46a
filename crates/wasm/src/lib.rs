//! WASM bindings for eps-form
//!
//! This crate provides a JavaScript-friendly API for filling the EPS
//! affiliation form in the browser, starting from template bytes.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { EpsForm } from 'eps-form-wasm';
//!
//! await init();
//!
//! const form = EpsForm.fromTemplate(pdfBytes);
//! // Or with a substitute coordinate table
//! // const form = EpsForm.withLayoutJson(pdfBytes, layoutJson);
//!
//! const output = form.fill({ CEDULA: "1234567890", NOMBRES: "JUAN CARLOS" });
//! const name = EpsForm.fileName("1234567890");
//! ```

use eps_form::{EmployeeRecord, FieldLayout};
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// EPS affiliation form filler
#[wasm_bindgen]
pub struct EpsForm {
    template: Vec<u8>,
    layout: FieldLayout,
}

#[wasm_bindgen]
impl EpsForm {
    /// Create a filler for a template using the built-in layout
    ///
    /// @param template - Template PDF bytes (Uint8Array)
    /// @returns EpsForm instance
    #[wasm_bindgen(js_name = fromTemplate)]
    pub fn from_template(template: &[u8]) -> Result<EpsForm, JsValue> {
        Self::build(template, FieldLayout::comfenalco_valle())
    }

    /// Create a filler with a coordinate table given as JSON
    ///
    /// @param template - Template PDF bytes (Uint8Array)
    /// @param layoutJson - Field layout JSON string
    /// @returns EpsForm instance
    #[wasm_bindgen(js_name = withLayoutJson)]
    pub fn with_layout_json(template: &[u8], layout_json: &str) -> Result<EpsForm, JsValue> {
        let layout = FieldLayout::from_json(layout_json).map_err(to_js_error)?;
        Self::build(template, layout)
    }

    fn build(template: &[u8], layout: FieldLayout) -> Result<EpsForm, JsValue> {
        // Template must parse and contain the layout page
        let doc = pdf_core::PdfDocument::open_from_bytes(template).map_err(to_js_error)?;
        if doc.page_count() < layout.page() {
            return Err(to_js_error(pdf_core::PdfError::InvalidPage(
                layout.page(),
                doc.page_count(),
            )));
        }

        Ok(EpsForm {
            template: template.to_vec(),
            layout,
        })
    }

    /// Fill the form with an employee record
    ///
    /// @param record - Object of column name to value
    /// @returns PDF bytes (Uint8Array)
    pub fn fill(&self, record: JsValue) -> Result<js_sys::Uint8Array, JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(record)?;
        let record = EmployeeRecord::from_json(&value).map_err(to_js_error)?;

        let bytes = eps_form::render_template_bytes(&self.template, &self.layout, &record)
            .map_err(to_js_error)?;
        Ok(js_sys::Uint8Array::from(bytes.as_slice()))
    }

    /// Suggested download name for a cédula
    ///
    /// @param cedula - Employee cédula
    /// @returns File name (e.g., "formulario_eps_1234567890.pdf")
    #[wasm_bindgen(js_name = fileName)]
    pub fn file_name(cedula: &str) -> String {
        eps_form::form_file_name(cedula)
    }

    /// Content type of the filled form
    #[wasm_bindgen(js_name = contentType)]
    pub fn content_type() -> String {
        eps_form::PDF_CONTENT_TYPE.to_string()
    }
}
