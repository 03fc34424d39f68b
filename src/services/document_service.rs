// src/services/document_service.rs
// DOCUMENTATION: Document upload, storage and admin verification
// PURPOSE: Files live on disk under UPLOAD_DIR, metadata in the documents table

use crate::config::Config;
use crate::db::{DocumentRepository, NewDocument, UserRepository};
use crate::errors::DomicareError;
use crate::models::{
    Document, DocumentStatus, DocumentWithOwner, ReviewDocumentRequest, Role,
    UploadDocumentRequest, User,
};
use crate::services::BadgeService;
use base64::Engine;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

/// Accepted extensions and their MIME types
const ALLOWED_TYPES: [(&str, &str); 4] = [
    ("pdf", "application/pdf"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
];

/// Lowercased extension and MIME type of an accepted file name
pub fn detect_type(file_name: &str) -> Result<(String, &'static str), DomicareError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| DomicareError::InvalidInput("File name has no extension".to_string()))?;

    ALLOWED_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == ext)
        .map(|(_, mime)| (ext.clone(), *mime))
        .ok_or_else(|| {
            DomicareError::InvalidInput(format!(
                "Unsupported file type '.{}' (pdf, jpg, jpeg, png)",
                ext
            ))
        })
}

/// Keep only the final path component of a client-supplied name
pub fn sanitize_file_name(file_name: &str) -> String {
    Path::new(file_name.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string()
}

pub fn decode_content(content_base64: &str, max_bytes: usize) -> Result<Vec<u8>, DomicareError> {
    // Accept data URLs as sent by browsers: "data:application/pdf;base64,...."
    let payload = content_base64
        .split_once(";base64,")
        .map(|(_, data)| data)
        .unwrap_or(content_base64)
        .trim();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| DomicareError::InvalidInput(format!("Invalid base64 content: {}", e)))?;

    if bytes.is_empty() {
        return Err(DomicareError::InvalidInput("Empty file".to_string()));
    }

    if bytes.len() > max_bytes {
        return Err(DomicareError::InvalidInput(format!(
            "File exceeds the {} byte limit",
            max_bytes
        )));
    }

    Ok(bytes)
}

pub struct DocumentService;

impl DocumentService {
    pub async fn upload(
        pool: &SqlitePool,
        config: &Config,
        user: &User,
        req: UploadDocumentRequest,
    ) -> Result<Document, DomicareError> {
        let file_name = sanitize_file_name(&req.file_name);
        let (ext, mime_type) = detect_type(&file_name)?;
        let bytes = decode_content(&req.content_base64, config.max_upload_bytes)?;

        let dir = PathBuf::from(&config.upload_dir).join(user.id.to_string());
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            log::error!("Cannot create upload directory {}: {}", dir.display(), e);
            DomicareError::StorageError(e.to_string())
        })?;

        let stored_path = dir.join(format!("{}.{}", uuid::Uuid::new_v4(), ext));
        tokio::fs::write(&stored_path, &bytes).await.map_err(|e| {
            log::error!("Cannot write {}: {}", stored_path.display(), e);
            DomicareError::StorageError(e.to_string())
        })?;

        let doc = DocumentRepository::create(
            pool,
            &NewDocument {
                user_id: user.id,
                doc_type: req.doc_type,
                file_name,
                stored_path: stored_path.to_string_lossy().into_owned(),
                mime_type: mime_type.to_string(),
                size_bytes: bytes.len() as i64,
            },
        )
        .await?;

        log::info!(
            "User {} uploaded document {} ({:?}, {} bytes)",
            user.id,
            doc.id,
            doc.doc_type,
            doc.size_bytes
        );
        Ok(doc)
    }

    pub async fn list_mine(pool: &SqlitePool, user: &User) -> Result<Vec<Document>, DomicareError> {
        DocumentRepository::list_by_user(pool, user.id).await
    }

    /// Document metadata and raw bytes, for the owner or an admin
    pub async fn read_file(
        pool: &SqlitePool,
        user: &User,
        id: i64,
    ) -> Result<(Document, Vec<u8>), DomicareError> {
        let doc = DocumentRepository::get_by_id(pool, id).await?;

        if doc.user_id != user.id && !user.is_admin() {
            return Err(DomicareError::Forbidden(
                "You cannot access this document".to_string(),
            ));
        }

        let bytes = tokio::fs::read(&doc.stored_path).await.map_err(|e| {
            log::error!("Cannot read {}: {}", doc.stored_path, e);
            DomicareError::StorageError(e.to_string())
        })?;

        Ok((doc, bytes))
    }

    /// Owner removes a document still awaiting review
    pub async fn delete(pool: &SqlitePool, user: &User, id: i64) -> Result<(), DomicareError> {
        let doc = DocumentRepository::get_by_id(pool, id).await?;

        if doc.user_id != user.id {
            return Err(DomicareError::Forbidden(
                "You cannot delete this document".to_string(),
            ));
        }

        if doc.status != DocumentStatus::EnAttente {
            return Err(DomicareError::InvalidInput(
                "Only documents awaiting review can be deleted".to_string(),
            ));
        }

        DocumentRepository::delete(pool, id).await?;

        if let Err(e) = tokio::fs::remove_file(&doc.stored_path).await {
            log::warn!("Could not remove {}: {}", doc.stored_path, e);
        }

        log::info!("User {} deleted document {}", user.id, id);
        Ok(())
    }

    pub async fn list_for_admin(
        pool: &SqlitePool,
        status: Option<DocumentStatus>,
    ) -> Result<Vec<DocumentWithOwner>, DomicareError> {
        DocumentRepository::list_with_owner(pool, status).await
    }

    /// Validate or reject a pending document, then refresh the owner's verification
    pub async fn review(
        pool: &SqlitePool,
        admin: &User,
        id: i64,
        req: ReviewDocumentRequest,
    ) -> Result<Document, DomicareError> {
        let doc = DocumentRepository::get_by_id(pool, id).await?;

        if doc.status != DocumentStatus::EnAttente {
            return Err(DomicareError::InvalidTransition {
                from: doc.status.to_string(),
                to: req.status.to_string(),
            });
        }

        let reason = req
            .rejection_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());

        match req.status {
            DocumentStatus::EnAttente => {
                return Err(DomicareError::InvalidInput(
                    "A review must validate or reject the document".to_string(),
                ));
            }
            DocumentStatus::Refuse if reason.is_none() => {
                return Err(DomicareError::InvalidInput(
                    "A rejection reason is required".to_string(),
                ));
            }
            _ => {}
        }

        let reviewed = DocumentRepository::set_review(
            pool,
            id,
            req.status,
            if req.status == DocumentStatus::Refuse {
                reason
            } else {
                None
            },
            admin.id,
        )
        .await?;

        log::info!(
            "Admin {} set document {} to {}",
            admin.id,
            id,
            reviewed.status
        );

        let owner = UserRepository::get_by_id(pool, doc.user_id).await?;
        if owner.role == Role::Professionnel && doc.doc_type.is_required() {
            match reviewed.status {
                DocumentStatus::Refuse => BadgeService::clear_verification(pool, owner.id).await?,
                _ => {
                    BadgeService::evaluate_verification(pool, owner.id).await?;
                }
            }
        }

        Ok(reviewed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_type() {
        assert_eq!(
            detect_type("carte.PDF").unwrap(),
            ("pdf".to_string(), "application/pdf")
        );
        assert_eq!(detect_type("photo.jpeg").unwrap().1, "image/jpeg");
        assert!(detect_type("script.exe").is_err());
        assert!(detect_type("noextension").is_err());
    }

    #[test]
    fn test_sanitize_file_name_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_file_name("diplome.pdf"), "diplome.pdf");
    }

    #[test]
    fn test_decode_content() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"%PDF-1.4");
        assert_eq!(decode_content(&encoded, 100).unwrap(), b"%PDF-1.4");

        let data_url = format!("data:application/pdf;base64,{}", encoded);
        assert_eq!(decode_content(&data_url, 100).unwrap(), b"%PDF-1.4");

        assert!(decode_content(&encoded, 4).is_err());
        assert!(decode_content("***", 100).is_err());
        assert!(decode_content("", 100).is_err());
    }
}
