//! LicencePlate entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use parkpass_core::types::DbId;

/// A licence plate row from the `licence_plates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LicencePlate {
    pub id: DbId,
    pub parking_user_id: DbId,
    pub licence_plate: String,
    pub region: String,
}

/// Plate fields as supplied by callers; the owning user id comes from the
/// request path or the import pipeline, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct PlateInput {
    pub licence_plate: String,
    #[serde(default)]
    pub region: String,
}
