use crate::models::*;
use crate::services::TicketService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/tickets",
    tag = "tickets",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "兑奖码列表（按创建时间倒序）", body = [TicketResponse]),
        (status = 401, description = "未登录", body = ErrorResponse),
        (status = 403, description = "非管理员", body = ErrorResponse)
    )
)]
pub async fn list_tickets(service: web::Data<TicketService>) -> Result<HttpResponse> {
    match service.list_tickets().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/tickets",
    tag = "tickets",
    request_body = CreateTicketRequest,
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "创建成功", body = TicketResponse),
        (status = 400, description = "扇区或兑奖码无效", body = ErrorResponse)
    )
)]
/// 创建单张兑奖码；未指定扇区时按权重随机绑定
pub async fn create_ticket(
    service: web::Data<TicketService>,
    payload: web::Json<CreateTicketRequest>,
) -> Result<HttpResponse> {
    match service.create_ticket(payload.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Created().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/tickets/batch",
    tag = "tickets",
    request_body = BatchCreateTicketsRequest,
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "批量创建成功", body = [TicketResponse]),
        (status = 400, description = "数量超出范围或扇区无效", body = ErrorResponse)
    )
)]
/// 批量生成兑奖码（1-100 张，全部成功或全部失败）
pub async fn create_batch(
    service: web::Data<TicketService>,
    payload: web::Json<BatchCreateTicketsRequest>,
) -> Result<HttpResponse> {
    match service.create_batch(payload.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Created().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/tickets/winners",
    tag = "tickets",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "中奖名单（按兑奖时间倒序）", body = [WinnerResponse])
    )
)]
pub async fn list_winners(service: web::Data<TicketService>) -> Result<HttpResponse> {
    match service.list_winners().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn ticket_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tickets")
            .route("", web::get().to(list_tickets))
            .route("", web::post().to(create_ticket))
            .route("/batch", web::post().to(create_batch))
            .route("/winners", web::get().to(list_winners)),
    );
}
