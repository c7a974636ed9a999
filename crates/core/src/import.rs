//! Pure per-row validation and report types for the roster import pipeline.
//!
//! This module has zero I/O: it checks one decoded row at a time and never
//! looks at other rows or the database. Duplicate detection (against the
//! store and against earlier rows of the same run) belongs to the
//! orchestrator in the API layer, which owns the persistence loop.

use std::fmt;

use serde::Serialize;
use validator::ValidateEmail;

use crate::tabular::Row;

/// Columns every roster file must provide, by exact name.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "email",
    "first_name",
    "last_name",
    "license_plate",
    "region",
];

/// Return the required columns absent from `headers`, in canonical order.
///
/// A non-empty result aborts the whole import before any row is processed.
pub fn missing_columns(headers: &[String]) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == required))
        .collect()
}

/// A licence plate attached to an imported user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlateRecord {
    pub licence_plate: String,
    pub region: String,
}

/// A normalized, validated roster row ready for persistence.
///
/// The email is lowercased so the per-tenant uniqueness comparison is
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRecord {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub plates: Vec<PlateRecord>,
}

/// A failure isolated to a single row.
///
/// `row_number` is 1-based over data rows (the header row is not counted),
/// matching the order rows appear in the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row_number: usize,
    pub message: String,
}

impl RowError {
    pub fn new(row_number: usize, message: impl Into<String>) -> Self {
        Self {
            row_number,
            message: message.into(),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row_number, self.message)
    }
}

/// Validate one row, independently of all other rows.
///
/// Returns the normalized record, or an error naming the offending column
/// and the violated constraint.
pub fn validate_row(row: &Row, row_number: usize) -> Result<ImportRecord, RowError> {
    let email = field(row, "email");
    if email.is_empty() {
        return Err(RowError::new(row_number, "column 'email' must not be blank"));
    }
    if !email.validate_email() {
        return Err(RowError::new(
            row_number,
            format!("column 'email' is not a valid email address ('{email}')"),
        ));
    }

    let first_name = field(row, "first_name");
    if first_name.is_empty() {
        return Err(RowError::new(
            row_number,
            "column 'first_name' must not be blank",
        ));
    }

    let last_name = field(row, "last_name");
    if last_name.is_empty() {
        return Err(RowError::new(
            row_number,
            "column 'last_name' must not be blank",
        ));
    }

    // Cell normalization already coerced the plate to text; it only remains
    // to reject blanks. Region is free text and passes through as-is.
    let licence_plate = field(row, "license_plate");
    if licence_plate.is_empty() {
        return Err(RowError::new(
            row_number,
            "column 'license_plate' must not be blank",
        ));
    }
    let region = field(row, "region");

    Ok(ImportRecord {
        email: email.to_lowercase(),
        first_name,
        last_name,
        plates: vec![PlateRecord {
            licence_plate,
            region,
        }],
    })
}

fn field(row: &Row, column: &str) -> String {
    row.get(column).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Aggregate outcome of one import run.
///
/// `errors` keeps file order. The HTTP layer serializes an empty list as
/// JSON `null` (the surrounding API's `errors: [...] | null` convention).
#[derive(Debug, Default)]
pub struct ImportReport {
    pub created: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    /// Record one successfully persisted row.
    pub fn record_created(&mut self) {
        self.created += 1;
    }

    /// Record one failed row, preserving order.
    pub fn record_error(&mut self, error: RowError) {
        self.errors.push(error.to_string());
    }

    /// The deliberate status asymmetry: a run is an overall success if and
    /// only if at least one row was created, regardless of how many failed.
    pub fn is_success(&self) -> bool {
        self.created > 0
    }

    pub fn message(&self) -> String {
        format!("Successfully imported {} users", self.created)
    }
}
