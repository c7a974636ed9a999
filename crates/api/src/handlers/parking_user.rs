//! Handlers for the `/parking-users` resource and its nested plates.
//!
//! All operations are scoped to the authenticated client's own roster: the
//! owning client id comes from the access token, never from the request
//! body, and a cross-tenant id behaves exactly like a missing row.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::ValidateEmail;

use parkpass_core::error::CoreError;
use parkpass_core::types::DbId;
use parkpass_db::models::licence_plate::{LicencePlate, PlateInput};
use parkpass_db::models::parking_user::{
    CreateParkingUser, ParkingUserWithPlates, UpdateParkingUser,
};
use parkpass_db::repositories::{LicencePlateRepo, ParkingUserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthClient;
use crate::state::AppState;

/// Request body for `POST /parking-users`.
#[derive(Debug, Deserialize)]
pub struct CreateParkingUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub licence_plates: Vec<PlateInput>,
}

/// POST /api/v1/parking-users
///
/// Create a parking user (with optional nested plates) in the caller's
/// roster. A duplicate email within the roster surfaces as 409 via
/// `uq_parking_users_client_email`.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthClient,
    Json(input): Json<CreateParkingUserRequest>,
) -> AppResult<(StatusCode, Json<ParkingUserWithPlates>)> {
    if !input.email.validate_email() {
        return Err(AppError::Core(CoreError::Validation(
            "Email address is not valid".into(),
        )));
    }
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "First and last name must not be blank".into(),
        )));
    }

    let create_dto = CreateParkingUser {
        client_id: auth.client_id,
        email: input.email.to_lowercase(),
        first_name: input.first_name,
        last_name: input.last_name,
    };

    let (user, licence_plates) =
        ParkingUserRepo::create_with_plates(&state.pool, &create_dto, &input.licence_plates)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(ParkingUserWithPlates {
            user,
            licence_plates,
        }),
    ))
}

/// GET /api/v1/parking-users
///
/// List the caller's roster with plates attached.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthClient,
) -> AppResult<Json<Vec<ParkingUserWithPlates>>> {
    let users = ParkingUserRepo::list_for_client(&state.pool, auth.client_id).await?;

    // Single query for all plates of the roster, grouped in memory, instead
    // of one query per user.
    let mut plates_by_user: HashMap<DbId, Vec<LicencePlate>> = HashMap::new();
    for plate in LicencePlateRepo::list_for_client(&state.pool, auth.client_id).await? {
        plates_by_user
            .entry(plate.parking_user_id)
            .or_default()
            .push(plate);
    }

    let responses = users
        .into_iter()
        .map(|user| {
            let licence_plates = plates_by_user.remove(&user.id).unwrap_or_default();
            ParkingUserWithPlates {
                user,
                licence_plates,
            }
        })
        .collect();

    Ok(Json(responses))
}

/// GET /api/v1/parking-users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthClient,
    Path(id): Path<DbId>,
) -> AppResult<Json<ParkingUserWithPlates>> {
    let user = ParkingUserRepo::find_for_client(&state.pool, auth.client_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ParkingUser",
            id,
        }))?;

    let licence_plates = LicencePlateRepo::list_for_parking_user(&state.pool, user.id).await?;

    Ok(Json(ParkingUserWithPlates {
        user,
        licence_plates,
    }))
}

/// PUT /api/v1/parking-users/{id}
///
/// Partial update; only provided fields change.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthClient,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateParkingUser>,
) -> AppResult<Json<ParkingUserWithPlates>> {
    if let Some(email) = &input.email {
        if !email.validate_email() {
            return Err(AppError::Core(CoreError::Validation(
                "Email address is not valid".into(),
            )));
        }
    }

    let user = ParkingUserRepo::update_for_client(&state.pool, auth.client_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ParkingUser",
            id,
        }))?;

    let licence_plates = LicencePlateRepo::list_for_parking_user(&state.pool, user.id).await?;

    Ok(Json(ParkingUserWithPlates {
        user,
        licence_plates,
    }))
}

/// DELETE /api/v1/parking-users/{id}
///
/// Delete a roster member; their plates cascade.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthClient,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ParkingUserRepo::delete_for_client(&state.pool, auth.client_id, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ParkingUser",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Nested plates
// ---------------------------------------------------------------------------

/// GET /api/v1/parking-users/{user_id}/plates
pub async fn list_plates(
    State(state): State<AppState>,
    auth: AuthClient,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<Vec<LicencePlate>>> {
    let user = resolve_user(&state, &auth, user_id).await?;
    let plates = LicencePlateRepo::list_for_parking_user(&state.pool, user.id).await?;
    Ok(Json(plates))
}

/// POST /api/v1/parking-users/{user_id}/plates
pub async fn add_plate(
    State(state): State<AppState>,
    auth: AuthClient,
    Path(user_id): Path<DbId>,
    Json(input): Json<PlateInput>,
) -> AppResult<(StatusCode, Json<LicencePlate>)> {
    if input.licence_plate.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Licence plate must not be blank".into(),
        )));
    }

    let user = resolve_user(&state, &auth, user_id).await?;
    let plate = LicencePlateRepo::create(&state.pool, user.id, &input).await?;
    Ok((StatusCode::CREATED, Json(plate)))
}

/// DELETE /api/v1/parking-users/{user_id}/plates/{id}
pub async fn delete_plate(
    State(state): State<AppState>,
    auth: AuthClient,
    Path((user_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let user = resolve_user(&state, &auth, user_id).await?;
    let deleted = LicencePlateRepo::delete(&state.pool, user.id, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "LicencePlate",
            id,
        }))
    }
}

/// Resolve a parking user inside the caller's tenant or fail with 404.
async fn resolve_user(
    state: &AppState,
    auth: &AuthClient,
    user_id: DbId,
) -> AppResult<parkpass_db::models::parking_user::ParkingUser> {
    ParkingUserRepo::find_for_client(&state.pool, auth.client_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ParkingUser",
            id: user_id,
        }))
}
