//! Handler for the roster bulk import.
//!
//! Drives a whole-file import as an all-rows-attempted, partial-success
//! operation: decode the upload, check the schema once, then walk the rows
//! in file order -- validating, de-duplicating, and persisting each one
//! before moving to the next. A row failure is data in the report, never a
//! reason to stop.

use std::collections::HashSet;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use parkpass_core::import::{missing_columns, validate_row, ImportRecord, ImportReport, RowError};
use parkpass_core::tabular::{self, FileFormat};
use parkpass_core::types::DbId;
use parkpass_db::models::licence_plate::PlateInput;
use parkpass_db::models::parking_user::CreateParkingUser;
use parkpass_db::repositories::ParkingUserRepo;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::auth::AuthClient;
use crate::state::AppState;

/// Response body for the import endpoint.
///
/// `errors` is `null` when every row landed, otherwise the row errors in
/// file order.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: String,
    pub errors: Option<Vec<String>>,
}

/// POST /api/v1/parking-users/import
///
/// Bulk-import roster rows from an uploaded CSV or XLSX file. Columns:
/// `email, first_name, last_name, license_plate, region`.
///
/// Returns 201 if at least one row was created (even with row errors) and
/// 400 if none were -- including the headers-only case. That asymmetry is
/// load-bearing for callers and covered by an acceptance test.
pub async fn import_roster(
    State(state): State<AppState>,
    auth: AuthClient,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ImportResponse>)> {
    // -- Locate the uploaded file part.
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            upload = Some((file_name, data.to_vec()));
            break;
        }
    }
    let (file_name, data) =
        upload.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    // -- Select a decoder by extension, then decode the whole file. Both
    //    failures abort before any row is touched.
    let format = FileFormat::from_name(&file_name).ok_or_else(|| {
        AppError::BadRequest(
            "Unsupported file format. Please upload CSV or Excel file.".to_string(),
        )
    })?;
    let file = tabular::parse(&data, format).map_err(|e| AppError::BadRequest(e.to_string()))?;

    // -- Whole-file schema check, once, before per-row processing.
    let missing = missing_columns(&file.headers);
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    // -- Per-row processing: sequential, file order, 1-based data-row
    //    numbers. Each successful row is committed before the next row is
    //    looked at, so later rows observe earlier ones.
    let mut report = ImportReport::default();
    let mut seen_emails: HashSet<String> = HashSet::new();

    for (idx, row) in file.rows.iter().enumerate() {
        let row_number = idx + 1;

        let record = match validate_row(row, row_number) {
            Ok(record) => record,
            Err(err) => {
                report.record_error(err);
                continue;
            }
        };

        match persist_row(&state, auth.client_id, &mut seen_emails, &record).await {
            Ok(()) => report.record_created(),
            Err(message) => report.record_error(RowError::new(row_number, message)),
        }
    }

    tracing::info!(
        client_id = auth.client_id,
        created = report.created,
        failed = report.errors.len(),
        file = %file_name,
        "Roster import finished"
    );

    let status = if report.is_success() {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_REQUEST
    };
    let message = report.message();
    let errors = if report.errors.is_empty() {
        None
    } else {
        Some(report.errors)
    };

    Ok((
        status,
        Json(ImportResponse {
            message,
            errors,
        }),
    ))
}

/// Persist one validated row, or explain why it cannot be.
///
/// Everything that can go wrong here -- a duplicate earlier in the file, a
/// duplicate against the stored roster, a uniqueness race with a concurrent
/// import (23505), or any other database failure -- comes back as a
/// row-level message so the remaining rows keep processing.
async fn persist_row(
    state: &AppState,
    client_id: DbId,
    seen_emails: &mut HashSet<String>,
    record: &ImportRecord,
) -> Result<(), String> {
    if seen_emails.contains(&record.email) {
        return Err(format!(
            "column 'email' duplicates an earlier row ('{}')",
            record.email
        ));
    }

    let exists = ParkingUserRepo::email_exists(&state.pool, client_id, &record.email)
        .await
        .map_err(|e| format!("database error while checking email: {e}"))?;
    if exists {
        return Err(format!(
            "column 'email' already exists in this roster ('{}')",
            record.email
        ));
    }

    let plates: Vec<PlateInput> = record
        .plates
        .iter()
        .map(|p| PlateInput {
            licence_plate: p.licence_plate.clone(),
            region: p.region.clone(),
        })
        .collect();

    let create = CreateParkingUser {
        client_id,
        email: record.email.clone(),
        first_name: record.first_name.clone(),
        last_name: record.last_name.clone(),
    };

    match ParkingUserRepo::create_with_plates(&state.pool, &create, &plates).await {
        Ok(_) => {
            seen_emails.insert(record.email.clone());
            Ok(())
        }
        Err(e) if is_unique_violation(&e) => Err(format!(
            "column 'email' already exists in this roster ('{}')",
            record.email
        )),
        Err(e) => Err(format!("failed to save row: {e}")),
    }
}
