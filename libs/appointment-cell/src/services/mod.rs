pub mod availability;
pub mod booking;
pub mod conflict;
pub mod identity_client;
pub mod lifecycle;
pub mod resolver;
