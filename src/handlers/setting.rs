use crate::models::*;
use crate::services::SettingService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "settings",
    responses(
        (status = 200, description = "站点设置 key -> value", body = BTreeMap<String, String>)
    )
)]
pub async fn list_settings(service: web::Data<SettingService>) -> Result<HttpResponse> {
    match service.list_settings().await {
        Ok(map) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": map }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/settings/{key}",
    tag = "settings",
    params(
        ("key" = String, Path, description = "设置项名称")
    ),
    request_body = UpdateSettingRequest,
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新成功", body = SettingResponse),
        (status = 400, description = "名称或内容不合法", body = ErrorResponse)
    )
)]
/// 更新设置项，不存在时创建
pub async fn update_setting(
    service: web::Data<SettingService>,
    path: web::Path<String>,
    payload: web::Json<UpdateSettingRequest>,
) -> Result<HttpResponse> {
    match service.update_setting(&path, &payload.value).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn setting_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .route("", web::get().to(list_settings))
            .route("/{key}", web::put().to(update_setting)),
    );
}
