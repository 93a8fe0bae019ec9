use crate::middlewares::get_current_user;
use crate::models::*;
use crate::services::AuthService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功，同时写入会话 Cookie", body = AuthResponse),
        (status = 401, description = "用户名或密码错误", body = ErrorResponse)
    )
)]
pub async fn login(
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match service.login(payload.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok()
            .cookie(service.session_cookie(&data.token))
            .json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "auth",
    responses(
        (status = 200, description = "退出成功，清除会话 Cookie")
    )
)]
pub async fn logout(service: web::Data<AuthService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .cookie(service.removal_cookie())
        .json(json!({ "success": true, "data": null })))
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "auth",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "当前用户", body = UserResponse),
        (status = 401, description = "未登录", body = ErrorResponse)
    )
)]
pub async fn get_user(service: web::Data<AuthService>, req: HttpRequest) -> Result<HttpResponse> {
    let user = match get_current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match service.current_user(user.id).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/user/password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "修改成功"),
        (status = 400, description = "当前密码错误或新密码不符合要求", body = ErrorResponse),
        (status = 401, description = "未登录", body = ErrorResponse)
    )
)]
pub async fn change_password(
    service: web::Data<AuthService>,
    req: HttpRequest,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    let user = match get_current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match service.change_password(user.id, payload.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": null }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout))
        .route("/user", web::get().to(get_user))
        .route("/user/password", web::put().to(change_password));
}
