//! Resource registry: domain types, the file-backed store and the request gateway.

pub mod domain;
pub mod gateway;
pub mod repository;
pub mod store;
pub mod validators;

pub use domain::{Resource, ResourceCreateInput, ResourceFilters, ResourceUpdateInput};
pub use gateway::{Envelope, GatewayResponse, OutcomeKind, ResourceGateway};
pub use repository::ResourceRepository;
pub use store::JsonResourceStore;
