//! Vector drawing operators (lines and circles)

use crate::document::Color;
use crate::format_number;

/// Bézier control distance for approximating a quarter circle
const KAPPA: f64 = 0.552_284_749_8;

/// Stroke settings for line drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Line width in points
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::black(),
            width: 1.0,
        }
    }
}

/// Generate PDF operators for a single straight line
///
/// Points are in PDF coordinates (origin bottom-left). The operators are
/// wrapped in `q`/`Q` so the stroke settings do not leak into later content.
pub fn generate_line_operators(from: (f64, f64), to: (f64, f64), style: &StrokeStyle) -> Vec<u8> {
    let mut ops = String::new();

    ops.push_str("q\n");
    ops.push_str(&format!(
        "{} {} {} RG\n",
        style.color.r, style.color.g, style.color.b
    ));
    ops.push_str(&format!("{} w\n", format_number(style.width)));
    ops.push_str(&format!(
        "{} {} m\n",
        format_number(from.0),
        format_number(from.1)
    ));
    ops.push_str(&format!("{} {} l\n", format_number(to.0), format_number(to.1)));
    ops.push_str("S\n");
    ops.push_str("Q\n");

    ops.into_bytes()
}

/// Generate PDF operators for a filled circle
///
/// The circle is approximated with four cubic Bézier curves. `center` is in
/// PDF coordinates.
pub fn generate_circle_operators(center: (f64, f64), radius: f64, fill: Color) -> Vec<u8> {
    let (cx, cy) = center;
    let k = radius * KAPPA;
    let n = format_number;

    let mut ops = String::new();

    ops.push_str("q\n");
    ops.push_str(&format!("{} {} {} rg\n", fill.r, fill.g, fill.b));
    ops.push_str(&format!("{} {} m\n", n(cx + radius), n(cy)));
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        n(cx + radius),
        n(cy + k),
        n(cx + k),
        n(cy + radius),
        n(cx),
        n(cy + radius)
    ));
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        n(cx - k),
        n(cy + radius),
        n(cx - radius),
        n(cy + k),
        n(cx - radius),
        n(cy)
    ));
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        n(cx - radius),
        n(cy - k),
        n(cx - k),
        n(cy - radius),
        n(cx),
        n(cy - radius)
    ));
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        n(cx + k),
        n(cy - radius),
        n(cx + radius),
        n(cy - k),
        n(cx + radius),
        n(cy)
    ));
    ops.push_str("f\n");
    ops.push_str("Q\n");

    ops.into_bytes()
}
