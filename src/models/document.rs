// src/models/document.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

/// Kind of uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum DocumentType {
    PieceIdentite,
    Diplome,
    CasierJudiciaire,
    JustificatifDomicile,
    Autre,
}

impl DocumentType {
    /// Documents a professionnel needs validated to become verified
    pub const REQUIRED_FOR_VERIFICATION: [DocumentType; 3] = [
        DocumentType::PieceIdentite,
        DocumentType::Diplome,
        DocumentType::CasierJudiciaire,
    ];

    pub fn is_required(&self) -> bool {
        Self::REQUIRED_FOR_VERIFICATION.contains(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum DocumentStatus {
    EnAttente,
    Valide,
    Refuse,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::EnAttente => "en_attente",
            DocumentStatus::Valide => "valide",
            DocumentStatus::Refuse => "refuse",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uploaded document metadata
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: i64,
    pub user_id: i64,
    pub doc_type: DocumentType,
    pub file_name: String,
    #[serde(skip_serializing)]
    pub stored_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub status: DocumentStatus,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Upload payload, file content travels base64-encoded
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UploadDocumentRequest {
    pub doc_type: DocumentType,

    #[validate(length(min = 1, max = 255))]
    pub file_name: String,

    #[validate(length(min = 1))]
    pub content_base64: String,
}

/// Admin decision on a pending document
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewDocumentRequest {
    pub status: DocumentStatus,

    #[validate(length(max = 500))]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentQuery {
    pub status: Option<DocumentStatus>,
}

/// Admin listing entry: document plus owner identity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DocumentWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub document: Document,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_matches_wire_format() {
        for status in [
            DocumentStatus::EnAttente,
            DocumentStatus::Valide,
            DocumentStatus::Refuse,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), status.to_string());
        }
        assert_eq!(DocumentStatus::Refuse.as_str(), "refuse");
    }
}
