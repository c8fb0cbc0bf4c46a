//! Employee lookup by cédula
//!
//! The directory is a handle the caller constructs and passes in. The
//! spreadsheet client that feeds it (authentication, network access) lives
//! outside this crate; it hands over worksheet rows as JSON objects.

use crate::record::{self, EmployeeRecord};
use crate::Result;
use tracing::debug;

/// Source of employee records
pub trait EmployeeDirectory {
    /// Find the employee with the given cédula
    fn find_by_cedula(&self, cedula: &str) -> Result<Option<EmployeeRecord>>;
}

/// A named worksheet of employee rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worksheet {
    name: String,
    rows: Vec<EmployeeRecord>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>, rows: Vec<EmployeeRecord>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Build a worksheet from rows exported as a JSON array of objects
    pub fn from_json_rows(name: impl Into<String>, rows: &serde_json::Value) -> Result<Self> {
        let rows = match rows.as_array() {
            Some(rows) => rows
                .iter()
                .map(EmployeeRecord::from_json)
                .collect::<Result<Vec<_>>>()?,
            None => EmployeeRecord::from_json(rows).map(|row| vec![row])?,
        };
        Ok(Self::new(name, rows))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[EmployeeRecord] {
        &self.rows
    }

    fn find(&self, cedula: &str) -> Option<&EmployeeRecord> {
        self.rows
            .iter()
            .find(|row| row.value(record::CEDULA).trim() == cedula)
    }
}

/// In-memory directory searching worksheets in insertion order
#[derive(Debug, Clone, Default)]
pub struct SheetDirectory {
    sheets: Vec<Worksheet>,
}

impl SheetDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`SheetDirectory::add_sheet`]
    pub fn with_sheet(mut self, sheet: Worksheet) -> Self {
        self.add_sheet(sheet);
        self
    }

    pub fn add_sheet(&mut self, sheet: Worksheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }
}

impl EmployeeDirectory for SheetDirectory {
    fn find_by_cedula(&self, cedula: &str) -> Result<Option<EmployeeRecord>> {
        let cedula = cedula.trim();
        if cedula.is_empty() {
            return Ok(None);
        }

        for sheet in &self.sheets {
            if let Some(row) = sheet.find(cedula) {
                debug!(cedula, sheet = sheet.name(), "Found employee");
                return Ok(Some(row.clone()));
            }
        }

        Ok(None)
    }
}
