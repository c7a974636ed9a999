//! Client (tenant) entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use parkpass_core::types::{DbId, Timestamp};

/// Full client row from the `clients` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`ClientResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub address: String,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe client representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct ClientResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub address: String,
    pub created_at: Timestamp,
}

impl From<&Client> for ClientResponse {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            username: client.username.clone(),
            email: client.email.clone(),
            address: client.address.clone(),
            created_at: client.created_at,
        }
    }
}

/// DTO for creating a new client.
#[derive(Debug)]
pub struct CreateClient {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub address: String,
}
