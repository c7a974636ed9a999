//! Repository for the `licence_plates` table.
//!
//! Plates are only ever reached through their owning parking user; handlers
//! resolve the user within the caller's tenant first.

use sqlx::PgPool;

use parkpass_core::types::DbId;

use crate::models::licence_plate::{LicencePlate, PlateInput};

const COLUMNS: &str = "id, parking_user_id, licence_plate, region";

/// Provides plate operations scoped to a parking user.
pub struct LicencePlateRepo;

impl LicencePlateRepo {
    /// Insert a plate for the given parking user, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parking_user_id: DbId,
        input: &PlateInput,
    ) -> Result<LicencePlate, sqlx::Error> {
        let query = format!(
            "INSERT INTO licence_plates (parking_user_id, licence_plate, region)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LicencePlate>(&query)
            .bind(parking_user_id)
            .bind(&input.licence_plate)
            .bind(&input.region)
            .fetch_one(pool)
            .await
    }

    /// List all plates of one parking user, in insertion order.
    pub async fn list_for_parking_user(
        pool: &PgPool,
        parking_user_id: DbId,
    ) -> Result<Vec<LicencePlate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM licence_plates WHERE parking_user_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, LicencePlate>(&query)
            .bind(parking_user_id)
            .fetch_all(pool)
            .await
    }

    /// List every plate belonging to a client's roster, in insertion order.
    ///
    /// Used by the roster list endpoint to attach plates without a per-user
    /// query.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<LicencePlate>, sqlx::Error> {
        sqlx::query_as::<_, LicencePlate>(
            "SELECT lp.id, lp.parking_user_id, lp.licence_plate, lp.region
             FROM licence_plates lp
             JOIN parking_users pu ON pu.id = lp.parking_user_id
             WHERE pu.client_id = $1
             ORDER BY lp.id",
        )
        .bind(client_id)
        .fetch_all(pool)
        .await
    }

    /// Delete one plate of the given parking user.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        parking_user_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM licence_plates WHERE id = $1 AND parking_user_id = $2")
                .bind(id)
                .bind(parking_user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
