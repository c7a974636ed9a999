//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) where patching is supported

pub mod client;
pub mod licence_plate;
pub mod parking_user;
pub mod session;
