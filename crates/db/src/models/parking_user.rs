//! ParkingUser entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use parkpass_core::types::{DbId, Timestamp};

use crate::models::licence_plate::LicencePlate;

/// A parking user row from the `parking_users` table.
///
/// Email is unique per owning client (`uq_parking_users_client_email`),
/// not globally.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkingUser {
    pub id: DbId,
    pub client_id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A parking user together with their licence plates, as returned by the
/// read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ParkingUserWithPlates {
    #[serde(flatten)]
    pub user: ParkingUser,
    pub licence_plates: Vec<LicencePlate>,
}

/// DTO for creating a new parking user.
#[derive(Debug, Clone)]
pub struct CreateParkingUser {
    pub client_id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// DTO for updating an existing parking user. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateParkingUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}
