//! Repository for the `parking_users` table.
//!
//! Every read and write is scoped by the owning client id; a mismatched id
//! behaves exactly like a missing row.

use sqlx::PgPool;

use parkpass_core::types::DbId;

use crate::models::licence_plate::{LicencePlate, PlateInput};
use crate::models::parking_user::{CreateParkingUser, ParkingUser, UpdateParkingUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, client_id, email, first_name, last_name, is_active, created_at, updated_at";

/// Provides tenant-scoped CRUD operations for parking users.
pub struct ParkingUserRepo;

impl ParkingUserRepo {
    /// Insert a parking user together with their licence plates as one
    /// transaction: either the user and every plate land, or nothing does.
    ///
    /// A violation of `uq_parking_users_client_email` (duplicate email
    /// within the tenant, including a race with a concurrent insert)
    /// surfaces as `sqlx::Error::Database` with code 23505.
    pub async fn create_with_plates(
        pool: &PgPool,
        input: &CreateParkingUser,
        plates: &[PlateInput],
    ) -> Result<(ParkingUser, Vec<LicencePlate>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO parking_users (client_id, email, first_name, last_name)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, ParkingUser>(&query)
            .bind(input.client_id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_one(&mut *tx)
            .await?;

        let mut created_plates = Vec::with_capacity(plates.len());
        for plate in plates {
            let row = sqlx::query_as::<_, LicencePlate>(
                "INSERT INTO licence_plates (parking_user_id, licence_plate, region)
                 VALUES ($1, $2, $3)
                 RETURNING id, parking_user_id, licence_plate, region",
            )
            .bind(user.id)
            .bind(&plate.licence_plate)
            .bind(&plate.region)
            .fetch_one(&mut *tx)
            .await?;
            created_plates.push(row);
        }

        tx.commit().await?;
        Ok((user, created_plates))
    }

    /// Find a parking user by ID within the given client's roster.
    pub async fn find_for_client(
        pool: &PgPool,
        client_id: DbId,
        id: DbId,
    ) -> Result<Option<ParkingUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parking_users WHERE id = $1 AND client_id = $2");
        sqlx::query_as::<_, ParkingUser>(&query)
            .bind(id)
            .bind(client_id)
            .fetch_optional(pool)
            .await
    }

    /// List a client's roster, most recently created first.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<ParkingUser>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parking_users
             WHERE client_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ParkingUser>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Whether the given email already exists in the client's roster.
    ///
    /// Comparison is case-insensitive to match import normalization.
    pub async fn email_exists(
        pool: &PgPool,
        client_id: DbId,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM parking_users
                WHERE client_id = $1 AND LOWER(email) = LOWER($2)
            )",
        )
        .bind(client_id)
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// Update a parking user within the given client's roster. Only
    /// non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the row does not exist or belongs to another client.
    pub async fn update_for_client(
        pool: &PgPool,
        client_id: DbId,
        id: DbId,
        input: &UpdateParkingUser,
    ) -> Result<Option<ParkingUser>, sqlx::Error> {
        let query = format!(
            "UPDATE parking_users SET
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                is_active = COALESCE($6, is_active)
             WHERE id = $1 AND client_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingUser>(&query)
            .bind(id)
            .bind(client_id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a parking user within the given client's roster. Plates
    /// cascade at the database level.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_for_client(
        pool: &PgPool,
        client_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM parking_users WHERE id = $1 AND client_id = $2")
            .bind(id)
            .bind(client_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
