pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod store;

pub use router::appointment_routes;
pub use services::identity_client::{HttpIdentityClient, IdentityClient, IdentityClientError};
pub use state::SchedulingState;
pub use store::SCHEMA;
