// src/db/document_repository.rs
// DOCUMENTATION: Uploaded document metadata
// PURPOSE: CRUD and review updates for the documents table

use crate::errors::DomicareError;
use crate::models::{Document, DocumentStatus, DocumentType, DocumentWithOwner};
use chrono::Utc;
use sqlx::SqlitePool;

pub struct DocumentRepository;

/// Column values for a freshly stored upload
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: i64,
    pub doc_type: DocumentType,
    pub file_name: String,
    pub stored_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

impl DocumentRepository {
    pub async fn create(pool: &SqlitePool, doc: &NewDocument) -> Result<Document, DomicareError> {
        let result = sqlx::query(
            r#"
            INSERT INTO documents (
                user_id, doc_type, file_name, stored_path, mime_type, size_bytes,
                status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'en_attente', $7)
            "#,
        )
        .bind(doc.user_id)
        .bind(doc.doc_type)
        .bind(&doc.file_name)
        .bind(&doc.stored_path)
        .bind(&doc.mime_type)
        .bind(doc.size_bytes)
        .bind(Utc::now())
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create document: {}", e);
            DomicareError::DatabaseError(format!("Create document failed: {}", e))
        })?;

        Self::get_by_id(pool, result.last_insert_rowid()).await
    }

    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Document, DomicareError> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DomicareError::NotFound(format!("Document {}", id)))
    }

    /// Documents of one user, newest first
    pub async fn list_by_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<Document>, DomicareError> {
        let docs = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch documents for user {}: {}", user_id, e);
            DomicareError::DatabaseError(format!("Fetch documents failed: {}", e))
        })?;

        Ok(docs)
    }

    /// Admin listing, optionally filtered by status, oldest pending first
    pub async fn list_with_owner(
        pool: &SqlitePool,
        status: Option<DocumentStatus>,
    ) -> Result<Vec<DocumentWithOwner>, DomicareError> {
        let base = r#"
            SELECT d.*,
                   u.first_name AS owner_first_name,
                   u.last_name AS owner_last_name,
                   u.email AS owner_email
            FROM documents d
            JOIN users u ON u.id = d.user_id
        "#;

        let docs = match status {
            Some(status) => {
                let sql = format!(
                    "{} WHERE d.status = $1 ORDER BY d.created_at ASC, d.id ASC",
                    base
                );
                sqlx::query_as::<_, DocumentWithOwner>(&sql)
                    .bind(status)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                let sql = format!("{} ORDER BY d.created_at DESC, d.id DESC", base);
                sqlx::query_as::<_, DocumentWithOwner>(&sql)
                    .fetch_all(pool)
                    .await?
            }
        };

        Ok(docs)
    }

    /// Record an admin decision
    pub async fn set_review(
        pool: &SqlitePool,
        id: i64,
        status: DocumentStatus,
        rejection_reason: Option<&str>,
        reviewer_id: i64,
    ) -> Result<Document, DomicareError> {
        sqlx::query(
            r#"
            UPDATE documents
            SET status = $1, rejection_reason = $2, reviewed_by = $3, reviewed_at = $4
            WHERE id = $5
            "#,
        )
        .bind(status)
        .bind(rejection_reason)
        .bind(reviewer_id)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        Self::get_by_id(pool, id).await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DomicareError> {
        let rows = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(DomicareError::NotFound(format!("Document {}", id)));
        }
        Ok(())
    }

    /// Required document types the user has validated
    pub async fn validated_types(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<DocumentType>, DomicareError> {
        let types = sqlx::query_scalar::<_, DocumentType>(
            "SELECT DISTINCT doc_type FROM documents WHERE user_id = $1 AND status = 'valide'",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(types)
    }

    pub async fn count_pending(pool: &SqlitePool) -> Result<i64, DomicareError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE status = 'en_attente'")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
