use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpResponse, Responder};
use futures::{StreamExt, TryStreamExt};
use log::info;

use crate::document::{self, DocumentFormat};
use crate::pipeline::Pipeline;
use crate::publisher::PublishOutcome;

pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

#[get("/api/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json("Server is running")
}

/// Receives a resume as a multipart upload (field `file`), decodes it and
/// runs the scraping pipeline on the blocking pool. Returns exactly one
/// status object per invocation; decode failure never invokes the pipeline.
#[post("/recommend-jobs")]
pub async fn recommend_jobs(mut payload: Multipart, data: web::Data<AppState>) -> impl Responder {
    let mut file_bytes: Vec<u8> = Vec::new();
    let mut format = DocumentFormat::PlainText;
    let mut found_file = false;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let (is_file, filename) = {
            let content_disposition = field.content_disposition();
            (
                content_disposition.get_name().unwrap_or("") == "file",
                content_disposition.get_filename().map(str::to_owned),
            )
        };
        if !is_file {
            continue;
        }
        found_file = true;

        if let Some(name) = filename {
            if let Some(extension) = name.rsplit('.').next() {
                format = DocumentFormat::from_extension(extension);
            }
            info!("Received resume upload: {}", name);
        }

        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(bytes) => file_bytes.extend_from_slice(&bytes),
                Err(e) => {
                    return HttpResponse::BadRequest().json(serde_json::json!({
                        "status": "error",
                        "message": format!("Failed to read upload: {}", e),
                    }))
                }
            }
        }
    }

    if !found_file || file_bytes.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "status": "error",
            "message": "No resume file provided.",
        }));
    }

    let resume_text = match document::extract_text(&file_bytes, format) {
        Ok(text) => text,
        Err(e) => {
            return HttpResponse::Ok().json(serde_json::json!({
                "status": "error",
                "message": e.to_string(),
            }))
        }
    };

    let pipeline = data.pipeline.clone();
    let outcome = web::block(move || pipeline.run(&resume_text)).await;

    match outcome {
        Ok(PublishOutcome::Delivered) => HttpResponse::Ok().json(serde_json::json!({
            "status": "success",
            "message": "Job data sent to downstream sink.",
        })),
        Ok(PublishOutcome::Rejected(status)) => HttpResponse::Ok().json(serde_json::json!({
            "status": "error",
            "message": format!("Failed to send data to downstream sink (status {}).", status),
        })),
        Ok(PublishOutcome::Unreachable(err)) => HttpResponse::Ok().json(serde_json::json!({
            "status": "error",
            "message": format!("Connection error: {}", err),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "error",
            "message": format!("Pipeline worker failed: {}", e),
        })),
    }
}
