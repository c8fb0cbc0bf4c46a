//! Sex indicator X mark

use crate::{FieldCoordinate, SexMarkers};
use pdf_core::{Color, PdfDocument, Point, StrokeStyle};

/// Recognized values of the CODIGO_SEXO column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SexCode {
    /// Code "0"
    Male,
    /// Code "1"
    Female,
}

impl SexCode {
    /// Parse a code; only exactly `"0"` and `"1"` are recognized
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "0" => Some(SexCode::Male),
            "1" => Some(SexCode::Female),
            _ => None,
        }
    }

    /// Where the mark for this code goes
    pub fn coordinate(self, markers: &SexMarkers) -> FieldCoordinate {
        match self {
            SexCode::Male => markers.male,
            SexCode::Female => markers.female,
        }
    }
}

/// Draw an X centered at `center` as two crossing black diagonals
pub fn draw_cross(
    doc: &mut PdfDocument,
    page: usize,
    center: FieldCoordinate,
    size: f64,
    line_width: f64,
) -> pdf_core::Result<()> {
    let half = size / 2.0;
    let style = StrokeStyle {
        color: Color::black(),
        width: line_width,
    };

    doc.draw_line(
        page,
        Point::new(center.x - half, center.y - half),
        Point::new(center.x + half, center.y + half),
        &style,
    )?;
    doc.draw_line(
        page,
        Point::new(center.x - half, center.y + half),
        Point::new(center.x + half, center.y - half),
        &style,
    )?;

    Ok(())
}
