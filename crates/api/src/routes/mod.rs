//! Route definitions.
//!
//! Every resource declares its routes in an explicit `router()` function;
//! [`api_routes`] assembles the full `/api/v1` table at startup. There is no
//! implicit handler registration anywhere.

pub mod auth;
pub mod health;
pub mod parking_user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                           register (public)
/// /auth/login                              login (public)
/// /auth/refresh                            refresh (public)
/// /auth/logout                             logout (requires auth)
///
/// /parking-users                           list, create
/// /parking-users/import                    bulk import (multipart)
/// /parking-users/{id}                      get, update, delete
/// /parking-users/{user_id}/plates          list, add
/// /parking-users/{user_id}/plates/{id}     delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/parking-users", parking_user::router())
}
