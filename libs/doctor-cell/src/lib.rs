pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::doctor_routes;
pub use services::doctor::DoctorService;

pub const SCHEMA: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS doctors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER UNIQUE REFERENCES users(id) ON DELETE SET NULL,
        name TEXT NOT NULL,
        specialty TEXT
    )
"#];
