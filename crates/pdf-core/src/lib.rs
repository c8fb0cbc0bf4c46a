//! PDF Core - Low-level PDF overlay drawing
//!
//! This crate provides functionality for:
//! - Opening and saving PDF documents
//! - Placing text in the standard (Base-14) fonts at page coordinates
//! - Stroking lines and filling circles on top of existing page content
//!
//! All coordinates taken by the public API are measured from the top-left
//! corner of the page's MediaBox, with y growing downwards.
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{PdfDocument, Point, Rect, StandardFont, StrokeStyle};
//!
//! let mut doc = PdfDocument::open("template.pdf")?;
//! doc.set_font(StandardFont::Helvetica, 10.0);
//! doc.insert_text_box("Hello", 1, &Rect::new(100.0, 90.0, 300.0, 110.0))?;
//! doc.draw_line(1, Point::new(10.0, 10.0), Point::new(20.0, 20.0), &StrokeStyle::default())?;
//! doc.save("output.pdf")?;
//! ```

mod document;
mod font;
mod graphics;
mod text;

pub use document::{Color, PdfDocument};
pub use font::StandardFont;
pub use graphics::{generate_circle_operators, generate_line_operators, StrokeStyle};
pub use text::{generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// A point in top-left page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in top-left page coordinates
///
/// `(x0, y0)` is the top-left corner and `(x1, y1)` the bottom-right one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Format a coordinate or size for a content stream
///
/// Keeps at most three decimals and drops trailing zeros, so `130.0` becomes
/// `130` and `678.8900000000001` becomes `678.89`.
pub(crate) fn format_number(value: f64) -> String {
    let formatted = format!("{value:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}
