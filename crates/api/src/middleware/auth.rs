//! JWT-based authentication extractor for Axum handlers.
//!
//! This is the tenancy boundary: every handler that touches roster data
//! takes an [`AuthClient`] and scopes its queries by `client_id`, so a
//! request can only ever reach its own tenant's rows.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use parkpass_core::error::CoreError;
use parkpass_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated client extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthClient) -> AppResult<Json<()>> {
///     tracing::info!(client_id = auth.client_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthClient {
    /// The client's internal database id (from `claims.sub`).
    pub client_id: DbId,
}

impl FromRequestParts<AppState> for AuthClient {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthClient {
            client_id: claims.sub,
        })
    }
}
