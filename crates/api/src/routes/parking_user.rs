//! Route definitions for the `/parking-users` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{import, parking_user};
use crate::state::AppState;

/// Routes mounted at `/parking-users`. All require authentication and are
/// scoped to the caller's own roster.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// POST   /import                    -> import_roster (multipart)
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// GET    /{user_id}/plates          -> list_plates
/// POST   /{user_id}/plates          -> add_plate
/// DELETE /{user_id}/plates/{id}     -> delete_plate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(parking_user::list).post(parking_user::create))
        .route("/import", post(import::import_roster))
        .route(
            "/{id}",
            get(parking_user::get_by_id)
                .put(parking_user::update)
                .delete(parking_user::delete),
        )
        .route(
            "/{user_id}/plates",
            get(parking_user::list_plates).post(parking_user::add_plate),
        )
        .route("/{user_id}/plates/{id}", delete(parking_user::delete_plate))
}
