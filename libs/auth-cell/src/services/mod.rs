pub mod account;
pub mod password;
pub mod seed;
pub mod users;
