// ============================================================================
// Campus Infrastructure - PostgreSQL Document Store
// File: crates/campus-infrastructure/src/database/postgres/document_store_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, error, info};
use uuid::Uuid;

use campus_core::domain::resource::ID_FIELD;
use campus_core::domain::Collection;
use campus_core::error::DomainError;
use campus_core::repositories::filter::numeric_value;
use campus_core::repositories::{Document, DocumentStore, Filter};

/// All collections share one JSONB table keyed by `(collection, doc_key)`.
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

/// Append one exact-match condition on a top-level field, mirroring
/// `Filter::matches`: numbers by value, strings and booleans by text.
fn push_condition(builder: &mut QueryBuilder<'_, Postgres>, field: &str, expected: &str) {
    builder
        .push(" AND CASE WHEN jsonb_typeof(body -> ")
        .push_bind(field.to_string())
        .push(") = 'number' THEN (body ->> ")
        .push_bind(field.to_string())
        .push(")::float8 = ")
        .push_bind(numeric_value(expected))
        .push("::float8 WHEN jsonb_typeof(body -> ")
        .push_bind(field.to_string())
        .push(") IN ('string', 'boolean') THEN body ->> ")
        .push_bind(field.to_string())
        .push(" = ")
        .push_bind(expected.to_string())
        .push(" ELSE false END");
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &Collection, document: Document) -> Result<Document, DomainError> {
        let key = collection
            .key_of(&document)
            .ok_or_else(|| {
                DomainError::ValidationError(format!("missing key field `{}`", collection.key_field))
            })?
            .to_string();
        let id = document
            .get(ID_FIELD)
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| DomainError::ValidationError(format!("missing or invalid `{}`", ID_FIELD)))?;

        let result = sqlx::query_scalar::<_, Json<Document>>(
            r#"
            INSERT INTO documents (id, collection, doc_key, body)
            VALUES ($1, $2, $3, $4)
            RETURNING body
            "#,
        )
        .bind(id)
        .bind(collection.name)
        .bind(&key)
        .bind(Json(&document))
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(Json(stored)) => {
                info!("Document inserted into {}: {}", collection.name, key);
                Ok(stored)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(DomainError::DuplicateKey {
                collection: collection.name.to_string(),
                key,
            }),
            Err(e) => Err(database_error("inserting document", e)),
        }
    }

    async fn find(&self, collection: &Collection, filter: &Filter) -> Result<Option<Vec<Document>>, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT body FROM documents WHERE collection = ");
        builder.push_bind(collection.name);
        for (field, expected) in filter.iter() {
            push_condition(&mut builder, field, expected);
        }
        builder.push(" ORDER BY seq");

        let rows = builder
            .build_query_scalar::<Json<Document>>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("finding documents", e))?;

        debug!("Found {} documents in {}", rows.len(), collection.name);
        Ok(Some(rows.into_iter().map(|Json(doc)| doc).collect()))
    }

    async fn find_one(&self, collection: &Collection, key: &str) -> Result<Option<Document>, DomainError> {
        let row = sqlx::query_scalar::<_, Json<Document>>(
            "SELECT body FROM documents WHERE collection = $1 AND doc_key = $2",
        )
        .bind(collection.name)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("finding document by key", e))?;

        Ok(row.map(|Json(doc)| doc))
    }

    async fn find_one_and_update(
        &self,
        collection: &Collection,
        key: &str,
        mut changes: Document,
    ) -> Result<Option<Document>, DomainError> {
        collection.strip_protected(&mut changes);

        let row = sqlx::query_scalar::<_, Json<Document>>(
            r#"
            UPDATE documents
            SET body = body || $3, updated_at = now()
            WHERE collection = $1 AND doc_key = $2
            RETURNING body
            "#,
        )
        .bind(collection.name)
        .bind(key)
        .bind(Json(&changes))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("updating document", e))?;

        Ok(row.map(|Json(doc)| doc))
    }

    async fn find_one_and_delete(&self, collection: &Collection, key: &str) -> Result<Option<Document>, DomainError> {
        let row = sqlx::query_scalar::<_, Json<Document>>(
            "DELETE FROM documents WHERE collection = $1 AND doc_key = $2 RETURNING body",
        )
        .bind(collection.name)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("deleting document", e))?;

        Ok(row.map(|Json(doc)| doc))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| database_error("pinging", e))
    }
}
