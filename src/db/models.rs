//! Database row types for PostgreSQL

use sqlx::FromRow;

use crate::services::store::Document;

/// Document row from database
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: String,
    pub data: serde_json::Value,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document::new(row.id, row.data)
    }
}
