pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::{auth_routes, user_admin_routes};
pub use services::account::create_account;
pub use services::seed::{ensure_admin, SeedOutcome};

/// Tables owned by the auth cell. Applied before any table that references users.
pub const SCHEMA: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
"#];
