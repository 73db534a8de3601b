pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::center_routes;
pub use services::center::CenterService;

pub const SCHEMA: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS centers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT
    )
"#];
