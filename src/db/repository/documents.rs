//! Documents repository

use sqlx::PgPool;

use crate::db::models::DocumentRow;

/// Documents in a collection whose top-level `field` equals `value`,
/// oldest first
pub async fn find_by_field(
    pool: &PgPool,
    collection: &str,
    field: &str,
    value: &str,
) -> Result<Vec<DocumentRow>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT id, data
        FROM documents
        WHERE collection = $1 AND data->>$2 = $3
        ORDER BY created_at, id
        "#,
    )
    .bind(collection)
    .bind(field)
    .bind(value)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Every document in a collection, oldest first
pub async fn list_by_collection(
    pool: &PgPool,
    collection: &str,
) -> Result<Vec<DocumentRow>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT id, data
        FROM documents
        WHERE collection = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(collection)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
