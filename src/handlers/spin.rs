use crate::config::ServerConfig;
use crate::models::*;
use crate::services::SpinService;
use crate::utils::client_ip;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/spin",
    tag = "spin",
    request_body = SpinRequest,
    responses(
        (status = 200, description = "兑奖成功，返回绑定的奖品", body = SpinResponse),
        (status = 400, description = "兑奖码已使用或已过期", body = ErrorResponse),
        (status = 404, description = "兑奖码不存在", body = ErrorResponse),
        (status = 500, description = "奖品扇区已被删除", body = ErrorResponse)
    )
)]
/// 使用兑奖码转动转盘:
/// 1. 校验兑奖码存在、未使用、未过期
/// 2. 原子地标记为已使用并记录客户端 IP
/// 3. 返回创建时绑定的奖品与当前扇区列表
pub async fn spin(
    service: web::Data<SpinService>,
    server: web::Data<ServerConfig>,
    req: HttpRequest,
    payload: web::Json<SpinRequest>,
) -> Result<HttpResponse> {
    let ip_address = client_ip(&req, server.trust_proxy);
    match service.spin(&payload.code, ip_address).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn spin_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/spin", web::post().to(spin));
}
