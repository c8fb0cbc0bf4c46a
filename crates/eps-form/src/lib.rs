//! EPS Form - fills the EPS affiliation form template with employee data
//!
//! This crate provides:
//! - The field placement table (`FieldLayout`) with every coordinate of the form
//! - The employee record model and its spreadsheet-friendly JSON conversion
//! - Given-name splitting and birth-date digit placement
//! - The form renderer writing a new PDF next to an untouched template
//! - A calibration overlay used to measure new coordinates
//! - An injectable employee directory for looking records up by cédula
//!
//! # Example
//!
//! ```ignore
//! use eps_form::{form_file_name, EmployeeRecord, EpsFormRenderer};
//!
//! let renderer = EpsFormRenderer::new("formatos/formulario_eps.pdf");
//! let record = EmployeeRecord::new()
//!     .with("CEDULA", "1234567890")
//!     .with("PRIMER_APELLIDO", "GARCIA")
//!     .with("SEGUNDO_APELLIDO", "LOPEZ")
//!     .with("NOMBRES", "JUAN CARLOS");
//! let output = renderer.fill(&record, std::env::temp_dir().join(form_file_name("1234567890")))?;
//! ```

pub mod calibration;
mod date;
pub mod directory;
mod layout;
mod marker;
mod names;
pub mod record;
mod renderer;

pub use date::{distribute_digits, reformat_birth_date};
pub use directory::{EmployeeDirectory, SheetDirectory, Worksheet};
pub use layout::{FieldCoordinate, FieldLayout, SexMarkers, TextField};
pub use marker::{draw_cross, SexCode};
pub use names::split_given_names;
pub use record::EmployeeRecord;
pub use renderer::{
    attachment_disposition, form_file_name, render_record, render_template_bytes,
    EpsFormRenderer, PDF_CONTENT_TYPE,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while filling a form
#[derive(Debug, Error)]
pub enum EpsFormError {
    #[error("PDF template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("Output path is the template itself: {}", .0.display())]
    OutputIsTemplate(PathBuf),

    #[error("Failed to generate PDF: {0}")]
    RenderFailure(#[from] pdf_core::PdfError),

    #[error("Invalid field layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid employee record: {0}")]
    InvalidRecord(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, EpsFormError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_messages() {
        let err = EpsFormError::TemplateMissing(Path::new("formatos/eps.pdf").to_path_buf());
        assert_eq!(err.to_string(), "PDF template not found: formatos/eps.pdf");

        let err = EpsFormError::RenderFailure(pdf_core::PdfError::SaveError("disk full".into()));
        assert_eq!(
            err.to_string(),
            "Failed to generate PDF: Failed to save PDF: disk full"
        );
    }
}
