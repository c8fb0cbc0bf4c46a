//! Coordinate calibration overlay
//!
//! Helpers for measuring new field positions on a template: drop colored
//! dots with labels at known coordinates on every page, then compare them
//! with the printed form.

use crate::renderer::{is_same_file, write_atomically};
use crate::{EpsFormError, Result};
use pdf_core::{Color, PdfDocument, Point, Rect, StandardFont};
use std::path::{Path, PathBuf};
use tracing::info;

const LABEL_FONT_SIZE: f32 = 8.0;
const LABEL_BOX_WIDTH: f64 = 100.0;

/// A dot drawn at a coordinate, with a label next to it
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationMark {
    pub x: f64,
    pub y: f64,
    /// Text next to the dot; `(x,y)` when not set
    pub label: Option<String>,
    pub color: Color,
    /// Dot radius
    pub size: f64,
}

impl CalibrationMark {
    /// Red mark of size 5 labelled with its coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            label: None,
            color: Color::red(),
            size: 5.0,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Label drawn next to the dot
    pub fn label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("({},{})", self.x, self.y),
        }
    }
}

/// Draw every mark on every page of an open document
///
/// Returns the number of marks drawn.
pub fn draw_marks(doc: &mut PdfDocument, marks: &[CalibrationMark]) -> Result<usize> {
    doc.set_font(StandardFont::Helvetica, LABEL_FONT_SIZE);
    doc.set_text_color(Color::black());

    let mut drawn = 0;
    for page in 1..=doc.page_count() {
        for mark in marks {
            doc.fill_circle(page, Point::new(mark.x, mark.y), mark.size, mark.color)?;

            let rect = Rect::new(
                mark.x + mark.size + 2.0,
                mark.y - mark.size,
                mark.x + mark.size + LABEL_BOX_WIDTH,
                mark.y + mark.size,
            );
            doc.insert_text_box(&mark.label(), page, &rect)?;
            drawn += 1;
        }
    }

    Ok(drawn)
}

/// Copy a template with calibration marks on every page
pub fn mark_coordinates<P, Q>(template: P, output: Q, marks: &[CalibrationMark]) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let template = template.as_ref();
    let output = output.as_ref();

    if !template.is_file() {
        return Err(EpsFormError::TemplateMissing(template.to_path_buf()));
    }
    if is_same_file(template, output) {
        return Err(EpsFormError::OutputIsTemplate(output.to_path_buf()));
    }

    let mut doc = PdfDocument::open(template)?;
    let drawn = draw_marks(&mut doc, marks)?;
    let bytes = doc.to_bytes()?;
    write_atomically(output, &bytes)?;

    info!(output = %output.display(), drawn, "Added calibration marks");

    Ok(output.to_path_buf())
}

/// Guide grid: corners, edge centers and three typical field positions
pub fn coordinate_guide() -> Vec<CalibrationMark> {
    let guide: [(f64, f64, &str, Color); 12] = [
        (50.0, 50.0, "Esquina superior izquierda", Color::rgb(1.0, 0.0, 0.0)),
        (300.0, 50.0, "Centro superior", Color::rgb(0.0, 1.0, 0.0)),
        (550.0, 50.0, "Esquina superior derecha", Color::rgb(0.0, 0.0, 1.0)),
        (50.0, 300.0, "Centro izquierda", Color::rgb(1.0, 1.0, 0.0)),
        (300.0, 300.0, "Centro", Color::rgb(1.0, 0.0, 1.0)),
        (550.0, 300.0, "Centro derecha", Color::rgb(0.0, 1.0, 1.0)),
        (50.0, 550.0, "Esquina inferior izquierda", Color::rgb(0.5, 0.5, 0.5)),
        (300.0, 550.0, "Centro inferior", Color::rgb(0.5, 0.0, 0.5)),
        (550.0, 550.0, "Esquina inferior derecha", Color::rgb(0.0, 0.5, 0.5)),
        (100.0, 100.0, "Campo superior", Color::rgb(1.0, 0.5, 0.0)),
        (100.0, 200.0, "Campo medio", Color::rgb(0.5, 1.0, 0.0)),
        (100.0, 400.0, "Campo inferior", Color::rgb(0.0, 0.5, 1.0)),
    ];

    guide
        .into_iter()
        .map(|(x, y, label, color)| CalibrationMark::new(x, y).with_label(label).with_color(color))
        .collect()
}

/// Single large red mark for checking one coordinate
pub fn probe_mark(x: f64, y: f64) -> CalibrationMark {
    CalibrationMark::new(x, y)
        .with_label(format!("Prueba: ({x},{y})"))
        .with_size(8.0)
}

/// Default output name for a probe
pub fn probe_file_name(x: f64, y: f64) -> String {
    format!("prueba_{x}_{y}.pdf")
}

/// Width and height of a template's first page, in points
pub fn template_page_size<P: AsRef<Path>>(template: P) -> Result<(f64, f64)> {
    let template = template.as_ref();
    if !template.is_file() {
        return Err(EpsFormError::TemplateMissing(template.to_path_buf()));
    }

    let doc = PdfDocument::open(template)?;
    Ok(doc.page_size(1)?)
}
