//! `DocumentStore` backed by the PostgreSQL `documents` table

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::pool;
use crate::db::repository::documents;
use crate::error::StoreQueryError;
use crate::services::store::{Collection, Document, DocumentStore};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn query_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreQueryError> {
        let rows = documents::find_by_field(&self.pool, collection.as_str(), field, value).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreQueryError> {
        let rows = documents::list_by_collection(&self.pool, collection.as_str()).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn health_check(&self) -> bool {
        pool::health_check(&self.pool).await
    }
}
