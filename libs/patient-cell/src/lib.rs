pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::patient_routes;
pub use services::patient::PatientService;

pub const SCHEMA: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS patients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER UNIQUE REFERENCES users(id) ON DELETE SET NULL,
        name TEXT NOT NULL,
        phone TEXT,
        status TEXT NOT NULL DEFAULT 'ACTIVE' CHECK (status IN ('ACTIVE', 'INACTIVE'))
    )
"#];
