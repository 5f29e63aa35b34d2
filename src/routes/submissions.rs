use super::*;

use actix_web::{Responder, get, post, web};
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::config::JudgeConfig;
use crate::database as db;
use crate::queue::SubmissionQueue;

#[post("/submissions")]
pub async fn create_submission_handler(
    pool: web::Data<SqlitePool>,
    queue: web::Data<SubmissionQueue>,
    config: web::Data<JudgeConfig>,
    body: web::Json<SubmissionRequest>,
) -> impl Responder {
    let body = body.into_inner();

    if let Err(reason) = validate_request(&body, config.max_source_bytes) {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: reason.to_string(),
        });
    }

    let token = Uuid::new_v4().simple().to_string();

    if let Err(e) = db::create_submission(
        &token,
        body.language_id,
        &body.source_code,
        &body.test_cases,
        pool.get_ref(),
    )
    .await
    {
        log::error!("Failed to insert submission {token}: {e}");
        return HttpResponse::InternalServerError().json(ErrorResponse {
            error: "internal error".to_string(),
        });
    }

    // Not transactional with the insert: were the enqueue to fail, the
    // submission would sit in InQueue until an external sweep requeues it.
    queue.push(token.clone()).await;
    log::info!(
        "Accepted submission {token} ({} cases, language {})",
        body.test_cases.len(),
        body.language_id
    );

    HttpResponse::Created().json(CreatedResponse { token })
}

fn validate_request(body: &SubmissionRequest, max_source_bytes: usize) -> Result<(), &'static str> {
    if body.language_id == 0 {
        return Err("language_id is required");
    }
    if body.source_code.is_empty() {
        return Err("source_code is required");
    }
    if body.source_code.len() > max_source_bytes {
        return Err("source_code exceeds the size limit");
    }
    if body.test_cases.is_empty() {
        return Err("test_cases must be a non-empty array");
    }
    Ok(())
}

#[get("/submissions/{token}")]
pub async fn get_submission_handler(
    pool: web::Data<SqlitePool>,
    path: web::Path<(String,)>,
) -> impl Responder {
    let token = path.into_inner().0;

    match db::fetch_submission(&token, pool.get_ref()).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(sqlx::Error::RowNotFound) => {
            log::info!("Got nothing for token {token}");
            HttpResponse::NotFound().json(ErrorResponse {
                error: format!("submission {token} not found"),
            })
        }
        Err(e) => {
            log::error!("Failed to retrieve submission {token}: {e}");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "internal error".to_string(),
            })
        }
    }
}

#[get("/health")]
pub async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}
