//! Service layer for the resource registry.
//! - `resources::store` owns records in memory and on disk.
//! - `resources::gateway` validates untrusted input and maps outcomes.
//! - Errors are reported through `errors::ServiceError`.

pub mod errors;
pub mod resources;
