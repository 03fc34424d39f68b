// src/handlers/documents.rs
// DOCUMENTATION: HTTP handlers for verification documents
// PURPOSE: Upload, list, download and withdraw own documents

use crate::auth::AuthUser;
use crate::config::Config;
use crate::errors::DomicareError;
use crate::models::UploadDocumentRequest;
use crate::services::DocumentService;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// POST /api/documents
/// Body carries the file as base64
pub async fn upload(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    user: AuthUser,
    req: web::Json<UploadDocumentRequest>,
) -> Result<impl Responder, DomicareError> {
    req.validate()?;
    let doc =
        DocumentService::upload(pool.get_ref(), config.get_ref(), &user, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(doc))
}

/// GET /api/documents
pub async fn list_mine(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
) -> Result<impl Responder, DomicareError> {
    let docs = DocumentService::list_mine(pool.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(docs))
}

/// GET /api/documents/{id}/file
pub async fn download(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> Result<impl Responder, DomicareError> {
    let (doc, bytes) = DocumentService::read_file(pool.get_ref(), &user, path.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .content_type(doc.mime_type.as_str())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![DispositionParam::Filename(doc.file_name.clone())],
        })
        .body(bytes))
}

/// DELETE /api/documents/{id}
pub async fn delete(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> Result<impl Responder, DomicareError> {
    DocumentService::delete(pool.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/documents")
            .route("", web::post().to(upload))
            .route("", web::get().to(list_mine))
            .route("/{id}/file", web::get().to(download))
            .route("/{id}", web::delete().to(delete)),
    );
}
