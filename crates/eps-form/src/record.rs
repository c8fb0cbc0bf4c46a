//! Employee record model
//!
//! A record is a flat mapping of spreadsheet column names to text. Column
//! names are trimmed on insertion, so `"CEDULA "` and `"CEDULA"` address the
//! same field.

use crate::{EpsFormError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const CEDULA: &str = "CEDULA";
pub const PRIMER_APELLIDO: &str = "PRIMER_APELLIDO";
pub const SEGUNDO_APELLIDO: &str = "SEGUNDO_APELLIDO";
pub const NOMBRES: &str = "NOMBRES";
pub const FECHA_NACIMIENTO: &str = "FECHA_NACIMIENTO";
pub const PAIS_NACIMIENTO: &str = "PAIS_NACIMIENTO";
pub const DEPARTAMENTO_NACIMIENTO: &str = "DEPARTAMENTO_NACIMIENTO";
pub const CIUDAD_NACIMIENTO: &str = "CIUDAD_NACIMIENTO";
pub const CODIGO_SEXO: &str = "CODIGO_SEXO";

/// Fields every record is expected to carry
pub const BASE_FIELDS: [&str; 4] = [CEDULA, PRIMER_APELLIDO, SEGUNDO_APELLIDO, NOMBRES];

/// Employee data keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct EmployeeRecord {
    values: BTreeMap<String, String>,
}

impl EmployeeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value; the key is trimmed
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.values
            .insert(key.as_ref().trim().to_string(), value.into());
    }

    /// Value of a field, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key.trim()).map(String::as_str)
    }

    /// Value of a field, or an empty string when absent
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Base fields that are absent or blank
    pub fn missing_base_fields(&self) -> Vec<&'static str> {
        BASE_FIELDS
            .into_iter()
            .filter(|key| self.value(key).trim().is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build a record from a JSON object (e.g. a spreadsheet row)
    ///
    /// Numbers and booleans are stringified, `null` values are left out.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            EpsFormError::InvalidRecord(format!("expected a JSON object, got {value}"))
        })?;

        let mut record = Self::new();
        for (key, value) in object {
            if value.is_null() {
                continue;
            }
            record.insert(key, value_to_string(value));
        }

        Ok(record)
    }

    /// Parse a record from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }
}

impl TryFrom<serde_json::Value> for EmployeeRecord {
    type Error = EpsFormError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        Self::from_json(&value)
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for EmployeeRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Convert a JSON value to the text drawn on the form
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => value.to_string(),
    }
}
