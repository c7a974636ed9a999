//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Tenancy is enforced here: every
//! parking-user and licence-plate query takes the owning client id and
//! filters on it, so a caller can never reach another tenant's rows.

pub mod client_repo;
pub mod licence_plate_repo;
pub mod parking_user_repo;
pub mod session_repo;

pub use client_repo::ClientRepo;
pub use licence_plate_repo::LicencePlateRepo;
pub use parking_user_repo::ParkingUserRepo;
pub use session_repo::SessionRepo;
