use serde::Deserialize;

use shared_models::clinic::Center;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CenterRow {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
}

impl From<CenterRow> for Center {
    fn from(row: CenterRow) -> Self {
        Center {
            id: row.id,
            name: row.name,
            address: row.address,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CenterRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}
