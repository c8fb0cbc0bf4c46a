//! Form rendering

use crate::date::{distribute_digits, reformat_birth_date};
use crate::directory::EmployeeDirectory;
use crate::layout::{FieldCoordinate, FieldLayout, TextField};
use crate::marker::{draw_cross, SexCode};
use crate::names::split_given_names;
use crate::record::{self, EmployeeRecord};
use crate::{EpsFormError, Result};
use pdf_core::{Color, PdfDocument, Rect, StandardFont};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Content type of a filled form when served over a transport
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// File name of the filled form for a cédula
pub fn form_file_name(cedula: &str) -> String {
    format!("formulario_eps_{cedula}.pdf")
}

/// `Content-Disposition` value suggesting the filled form as a download
pub fn attachment_disposition(cedula: &str) -> String {
    format!("attachment; filename=\"{}\"", form_file_name(cedula))
}

/// Fills the EPS affiliation form template
///
/// The template is re-opened on every call and only ever read. Each filled
/// form is written to its own output path.
#[derive(Debug, Clone)]
pub struct EpsFormRenderer {
    template_path: PathBuf,
    layout: FieldLayout,
}

impl EpsFormRenderer {
    /// Create a renderer using the Comfenalco Valle layout
    pub fn new<P: Into<PathBuf>>(template_path: P) -> Self {
        Self::with_layout(template_path, FieldLayout::comfenalco_valle())
    }

    /// Create a renderer with a substitute coordinate table
    pub fn with_layout<P: Into<PathBuf>>(template_path: P, layout: FieldLayout) -> Self {
        Self {
            template_path: template_path.into(),
            layout,
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Fill the form for a record and save it to `output_path`
    ///
    /// The file is written through a temporary file in the same directory, so
    /// a failed save leaves nothing at `output_path`.
    pub fn fill<P: AsRef<Path>>(&self, record: &EmployeeRecord, output_path: P) -> Result<PathBuf> {
        let output_path = output_path.as_ref();

        self.check_template()?;
        if is_same_file(&self.template_path, output_path) {
            return Err(EpsFormError::OutputIsTemplate(output_path.to_path_buf()));
        }

        let bytes = self.render(record)?;
        write_atomically(output_path, &bytes)?;

        info!(
            cedula = record.value(record::CEDULA),
            output = %output_path.display(),
            "Filled EPS form"
        );

        Ok(output_path.to_path_buf())
    }

    /// Fill the form for a record and return the PDF bytes
    pub fn fill_to_bytes(&self, record: &EmployeeRecord) -> Result<Vec<u8>> {
        self.check_template()?;
        self.render(record)
    }

    /// Look up a cédula and fill its form into `output_dir`
    ///
    /// Returns `Ok(None)` when the directory has no employee with that cédula.
    pub fn fill_for_cedula<D: EmployeeDirectory + ?Sized>(
        &self,
        directory: &D,
        cedula: &str,
        output_dir: impl AsRef<Path>,
    ) -> Result<Option<PathBuf>> {
        let cedula = cedula.trim();

        let Some(record) = directory.find_by_cedula(cedula)? else {
            info!(cedula, "No employee found");
            return Ok(None);
        };

        let output_path = output_dir.as_ref().join(form_file_name(cedula));
        self.fill(&record, output_path).map(Some)
    }

    fn check_template(&self) -> Result<()> {
        if !self.template_path.is_file() {
            return Err(EpsFormError::TemplateMissing(self.template_path.clone()));
        }
        Ok(())
    }

    fn render(&self, record: &EmployeeRecord) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::open(&self.template_path)?;
        render_record(&mut doc, &self.layout, record)?;
        Ok(doc.to_bytes()?)
    }
}

/// Fill a template given as bytes and return the filled PDF bytes
pub fn render_template_bytes(
    template: &[u8],
    layout: &FieldLayout,
    record: &EmployeeRecord,
) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::open_from_bytes(template)?;
    render_record(&mut doc, layout, record)?;
    Ok(doc.to_bytes()?)
}

/// Draw a record onto an open document
///
/// Absent or empty fields are skipped. Returns the number of marks placed
/// (text fields, date digits and the sex X).
pub fn render_record(
    doc: &mut PdfDocument,
    layout: &FieldLayout,
    record: &EmployeeRecord,
) -> Result<usize> {
    let missing = record.missing_base_fields();
    if !missing.is_empty() {
        warn!(
            cedula = record.value(record::CEDULA),
            ?missing,
            "Employee record is missing base fields"
        );
    }

    doc.set_font(StandardFont::Helvetica, layout.font_size());
    doc.set_text_color(Color::black());

    let mut placed = 0;

    let (primer_nombre, segundo_nombre) = split_given_names(record.value(record::NOMBRES));
    let names = [
        (TextField::Cedula, record.value(record::CEDULA)),
        (TextField::PrimerApellido, record.value(record::PRIMER_APELLIDO)),
        (TextField::SegundoApellido, record.value(record::SEGUNDO_APELLIDO)),
        (TextField::PrimerNombre, primer_nombre.as_str()),
        (TextField::SegundoNombre, segundo_nombre.as_str()),
    ];
    placed += place_fields(doc, layout, &names)?;

    let raw_date = record.value(record::FECHA_NACIMIENTO);
    let digits = reformat_birth_date(raw_date);
    if digits.is_empty() {
        if !raw_date.is_empty() {
            debug!(value = raw_date, "Skipping malformed birth date");
        }
    } else {
        for (digit, slot) in distribute_digits(&digits, layout.birth_date_digits()) {
            let mut buf = [0u8; 4];
            if place_text(doc, layout, digit.encode_utf8(&mut buf), slot)? {
                placed += 1;
            }
        }
    }

    let birthplace = [
        (TextField::PaisNacimiento, record.value(record::PAIS_NACIMIENTO)),
        (
            TextField::DepartamentoNacimiento,
            record.value(record::DEPARTAMENTO_NACIMIENTO),
        ),
        (TextField::CiudadNacimiento, record.value(record::CIUDAD_NACIMIENTO)),
    ];
    placed += place_fields(doc, layout, &birthplace)?;

    let code = record.value(record::CODIGO_SEXO);
    match SexCode::parse(code) {
        Some(sex) => {
            let center = sex.coordinate(layout.sex_markers());
            draw_cross(
                doc,
                layout.page(),
                center,
                layout.mark_size(),
                layout.mark_line_width(),
            )?;
            debug!(?sex, x = center.x, y = center.y, "Placed sex mark");
            placed += 1;
        }
        None if !code.is_empty() => debug!(code, "Skipping unrecognized sex code"),
        None => {}
    }

    Ok(placed)
}

fn place_fields(
    doc: &mut PdfDocument,
    layout: &FieldLayout,
    fields: &[(TextField, &str)],
) -> Result<usize> {
    let mut placed = 0;
    for &(field, text) in fields {
        if place_text(doc, layout, text, layout.coordinate(field)?)? {
            debug!(field = field.key(), text, "Placed field");
            placed += 1;
        }
    }
    Ok(placed)
}

/// Draw text in the field box anchored at `at`; returns false when empty
fn place_text(
    doc: &mut PdfDocument,
    layout: &FieldLayout,
    text: &str,
    at: FieldCoordinate,
) -> Result<bool> {
    if text.is_empty() {
        return Ok(false);
    }

    let size = layout.font_size() as f64;
    let rect = Rect::new(at.x, at.y - size, at.x + layout.text_box_width(), at.y + size);
    doc.insert_text_box(text, layout.page(), &rect)?;

    Ok(true)
}

/// Write bytes to `path` through a temporary file in the same directory
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> pdf_core::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Whether both paths name the same existing file
pub(crate) fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
