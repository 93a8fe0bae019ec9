use crate::database::SharedStore;
use crate::models::*;
use actix_web::{HttpResponse, ResponseError, Result, web};
use chrono::Utc;
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务正常", body = HealthResponse),
        (status = 500, description = "存储不可用", body = ErrorResponse)
    )
)]
pub async fn health(store: web::Data<SharedStore>) -> Result<HttpResponse> {
    match store.ping().await {
        Ok(()) => {
            let data = HealthResponse {
                status: "healthy".to_string(),
                timestamp: Utc::now(),
            };
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
