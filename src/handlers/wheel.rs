use crate::models::*;
use crate::services::SegmentService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/wheel/segments",
    tag = "wheel",
    responses(
        (status = 200, description = "扇区列表（按 position 升序）", body = [WheelSegmentResponse])
    )
)]
/// 获取转盘扇区
pub async fn list_segments(service: web::Data<SegmentService>) -> Result<HttpResponse> {
    match service.list_segments().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/wheel/segments",
    tag = "wheel",
    request_body = CreateSegmentRequest,
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "创建成功", body = WheelSegmentResponse),
        (status = 400, description = "参数错误", body = ErrorResponse),
        (status = 401, description = "未登录", body = ErrorResponse),
        (status = 403, description = "非管理员", body = ErrorResponse)
    )
)]
pub async fn create_segment(
    service: web::Data<SegmentService>,
    payload: web::Json<CreateSegmentRequest>,
) -> Result<HttpResponse> {
    match service.create_segment(payload.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Created().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/wheel/segments/{id}",
    tag = "wheel",
    params(
        ("id" = i32, Path, description = "扇区ID")
    ),
    request_body = UpdateSegmentRequest,
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新成功", body = WheelSegmentResponse),
        (status = 400, description = "参数错误", body = ErrorResponse),
        (status = 404, description = "扇区不存在", body = ErrorResponse)
    )
)]
/// 部分更新，未提供的字段保持不变
pub async fn update_segment(
    service: web::Data<SegmentService>,
    path: web::Path<i32>,
    payload: web::Json<UpdateSegmentRequest>,
) -> Result<HttpResponse> {
    match service
        .update_segment(path.into_inner(), payload.into_inner())
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/wheel/segments/{id}",
    tag = "wheel",
    params(
        ("id" = i32, Path, description = "扇区ID")
    ),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 400, description = "扇区数量不足", body = ErrorResponse),
        (status = 404, description = "扇区不存在", body = ErrorResponse)
    )
)]
pub async fn delete_segment(
    service: web::Data<SegmentService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    match service.delete_segment(id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": { "id": id } }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn wheel_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wheel/segments")
            .route("", web::get().to(list_segments))
            .route("", web::post().to(create_segment))
            .route("/{id}", web::put().to(update_segment))
            .route("/{id}", web::delete().to(delete_segment)),
    );
}
