//! Field placement table
//!
//! Coordinates are measured on the template's first page with a top-left
//! origin (y grows downwards). They are hand-tuned constants, never
//! discovered from the document.

use crate::{EpsFormError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Position of a mark on the form, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldCoordinate {
    pub x: f64,
    pub y: f64,
}

impl FieldCoordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Form fields written as free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextField {
    Cedula,
    PrimerApellido,
    SegundoApellido,
    PrimerNombre,
    SegundoNombre,
    PaisNacimiento,
    DepartamentoNacimiento,
    CiudadNacimiento,
}

impl TextField {
    /// Every text field, in drawing order
    pub const ALL: [TextField; 8] = [
        TextField::Cedula,
        TextField::PrimerApellido,
        TextField::SegundoApellido,
        TextField::PrimerNombre,
        TextField::SegundoNombre,
        TextField::PaisNacimiento,
        TextField::DepartamentoNacimiento,
        TextField::CiudadNacimiento,
    ];

    /// Name of the field in the layout table
    pub fn key(&self) -> &'static str {
        match self {
            TextField::Cedula => "CEDULA",
            TextField::PrimerApellido => "PRIMER_APELLIDO",
            TextField::SegundoApellido => "SEGUNDO_APELLIDO",
            TextField::PrimerNombre => "PRIMER_NOMBRE",
            TextField::SegundoNombre => "SEGUNDO_NOMBRE",
            TextField::PaisNacimiento => "PAIS_NACIMIENTO",
            TextField::DepartamentoNacimiento => "DEPARTAMENTO_NACIMIENTO",
            TextField::CiudadNacimiento => "CIUDAD_NACIMIENTO",
        }
    }
}

/// X-mark positions for the sex indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SexMarkers {
    /// Column marked for code "0"
    pub male: FieldCoordinate,
    /// Column marked for code "1"
    pub female: FieldCoordinate,
}

/// The complete coordinate table of a form template
///
/// Loaded once and treated as immutable. Substitute layouts can be read from
/// JSON:
///
/// ```json
/// {
///   "fields": { "CEDULA": { "x": 130, "y": 181 }, "...": {} },
///   "birthDateDigits": [{ "x": 290, "y": 200 }, "... 8 entries"],
///   "sexMarkers": { "male": { "x": 302.5, "y": 176.5 }, "female": { "x": 267.5, "y": 176.5 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLayout {
    /// Page the marks are drawn on (1-indexed)
    #[serde(default = "default_page")]
    page: usize,

    /// Font size for every text field
    #[serde(default = "default_font_size")]
    font_size: f32,

    /// Width of the box each text field is placed in
    #[serde(default = "default_text_box_width")]
    text_box_width: f64,

    /// Text field positions
    fields: BTreeMap<TextField, FieldCoordinate>,

    /// Birth date digit slots, DDMMYYYY left to right
    birth_date_digits: [FieldCoordinate; 8],

    /// Sex indicator positions
    sex_markers: SexMarkers,

    /// Size of the X mark
    #[serde(default = "default_mark_size")]
    mark_size: f64,

    /// Stroke width of the X mark
    #[serde(default = "default_mark_line_width")]
    mark_line_width: f64,
}

fn default_page() -> usize {
    1
}

fn default_font_size() -> f32 {
    10.0
}

fn default_text_box_width() -> f64 {
    200.0
}

fn default_mark_size() -> f64 {
    7.0
}

fn default_mark_line_width() -> f64 {
    1.5
}

impl FieldLayout {
    /// Layout of the Comfenalco Valle "delagente" EPS affiliation form
    pub fn comfenalco_valle() -> Self {
        let fields = [
            (TextField::Cedula, FieldCoordinate::new(130.0, 181.0)),
            (TextField::PrimerApellido, FieldCoordinate::new(75.0, 163.0)),
            (TextField::SegundoApellido, FieldCoordinate::new(200.0, 163.0)),
            (TextField::PrimerNombre, FieldCoordinate::new(330.0, 163.0)),
            (TextField::SegundoNombre, FieldCoordinate::new(480.0, 163.0)),
            (TextField::PaisNacimiento, FieldCoordinate::new(505.0, 181.0)),
            (TextField::DepartamentoNacimiento, FieldCoordinate::new(50.0, 200.0)),
            (TextField::CiudadNacimiento, FieldCoordinate::new(130.0, 200.0)),
        ];

        Self {
            page: default_page(),
            font_size: default_font_size(),
            text_box_width: default_text_box_width(),
            fields: fields.into_iter().collect(),
            birth_date_digits: [
                FieldCoordinate::new(290.0, 200.0), // D1
                FieldCoordinate::new(310.0, 200.0), // D2
                FieldCoordinate::new(330.0, 200.0), // M1
                FieldCoordinate::new(350.0, 200.0), // M2
                FieldCoordinate::new(370.0, 200.0), // Y1
                FieldCoordinate::new(390.0, 200.0), // Y2
                FieldCoordinate::new(410.0, 200.0), // Y3
                FieldCoordinate::new(435.0, 200.0), // Y4
            ],
            sex_markers: SexMarkers {
                male: FieldCoordinate::new(302.5, 176.5),
                female: FieldCoordinate::new(267.5, 176.5),
            },
            mark_size: default_mark_size(),
            mark_line_width: default_mark_line_width(),
        }
    }

    /// Parse a layout from JSON and check it covers every text field
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: FieldLayout = serde_json::from_str(json)
            .map_err(|e| EpsFormError::InvalidLayout(e.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    /// Read a layout from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            EpsFormError::InvalidLayout(format!("Failed to read layout {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Check that the layout is usable
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = TextField::ALL
            .iter()
            .filter(|field| !self.fields.contains_key(*field))
            .map(|field| field.key())
            .collect();
        if !missing.is_empty() {
            return Err(EpsFormError::InvalidLayout(format!(
                "missing coordinates for {}",
                missing.join(", ")
            )));
        }

        if self.page == 0 {
            return Err(EpsFormError::InvalidLayout(
                "page numbers start at 1".to_string(),
            ));
        }

        if self.font_size <= 0.0 {
            return Err(EpsFormError::InvalidLayout(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }

        Ok(())
    }

    /// Coordinate of a text field
    pub fn coordinate(&self, field: TextField) -> Result<FieldCoordinate> {
        self.fields.get(&field).copied().ok_or_else(|| {
            EpsFormError::InvalidLayout(format!("missing coordinates for {}", field.key()))
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn text_box_width(&self) -> f64 {
        self.text_box_width
    }

    pub fn birth_date_digits(&self) -> &[FieldCoordinate; 8] {
        &self.birth_date_digits
    }

    pub fn sex_markers(&self) -> &SexMarkers {
        &self.sex_markers
    }

    pub fn mark_size(&self) -> f64 {
        self.mark_size
    }

    pub fn mark_line_width(&self) -> f64 {
        self.mark_line_width
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self::comfenalco_valle()
    }
}
