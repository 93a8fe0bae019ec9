use crate::error::{AppError, AppResult};
use crate::services::auth_service::SESSION_COOKIE;
use crate::utils::{CurrentUser, JwtService};
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// 路由所需的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Session,
    Admin,
}

// 公开路由配置
struct PublicRoutes {
    // (方法, 路径) 完全匹配
    exact_routes: Vec<(Method, &'static str)>,
    // 前缀匹配，任意方法
    prefix_paths: Vec<&'static str>,
    // 登录即可访问（无需管理员）
    session_prefixes: Vec<&'static str>,
}

impl PublicRoutes {
    fn new() -> Self {
        Self {
            exact_routes: vec![
                (Method::GET, "/api/wheel/segments"),
                (Method::POST, "/api/spin"),
                (Method::GET, "/api/settings"),
                (Method::POST, "/api/login"),
                (Method::POST, "/api/logout"),
                (Method::GET, "/api/health"),
                (Method::GET, "/swagger-ui"),
            ],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/"],
            session_prefixes: vec!["/api/user"],
        }
    }

    fn access_for(&self, method: &Method, path: &str) -> Access {
        if self
            .exact_routes
            .iter()
            .any(|(m, p)| m == method && *p == path)
        {
            return Access::Public;
        }

        if self.prefix_paths.iter().any(|&prefix| path.starts_with(prefix)) {
            return Access::Public;
        }

        // /api/user 与 /api/user/...，不包括 /api/users
        if self.session_prefixes.iter().any(|&prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        }) {
            return Access::Session;
        }

        Access::Admin
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_routes: PublicRoutes::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_routes: PublicRoutes,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let access = self.public_routes.access_for(req.method(), req.path());
        if access == Access::Public {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let Some(token) = extract_token(&req) else {
            let error = AppError::AuthError("Authentication required".to_string());
            return Box::pin(async move { Err(error.into()) });
        };

        let user = match self.jwt_service.verify_session_token(&token) {
            Ok(user) => user,
            Err(_) => {
                let error = AppError::AuthError("Invalid or expired session".to_string());
                return Box::pin(async move { Err(error.into()) });
            }
        };

        if access == Access::Admin && !user.is_admin {
            log::warn!(
                "User {} denied access to {} {}",
                user.username,
                req.method(),
                req.path()
            );
            return Box::pin(async move { Err(AppError::Forbidden.into()) });
        }

        // 将当前用户添加到请求扩展中
        req.extensions_mut().insert(user);
        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

/// 优先读取会话 Cookie，其次 Authorization: Bearer
fn extract_token(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// 获取中间件注入的当前用户
pub fn get_current_user(req: &HttpRequest) -> AppResult<CurrentUser> {
    req.extensions()
        .get::<CurrentUser>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Authentication required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_access() {
        let routes = PublicRoutes::new();
        assert_eq!(
            routes.access_for(&Method::GET, "/api/wheel/segments"),
            Access::Public
        );
        assert_eq!(
            routes.access_for(&Method::POST, "/api/wheel/segments"),
            Access::Admin
        );
        assert_eq!(routes.access_for(&Method::POST, "/api/spin"), Access::Public);
        assert_eq!(routes.access_for(&Method::GET, "/api/settings"), Access::Public);
        assert_eq!(
            routes.access_for(&Method::PUT, "/api/settings/site_title"),
            Access::Admin
        );
        assert_eq!(routes.access_for(&Method::GET, "/api/tickets"), Access::Admin);
        assert_eq!(routes.access_for(&Method::GET, "/api/user"), Access::Session);
        assert_eq!(
            routes.access_for(&Method::PUT, "/api/user/password"),
            Access::Session
        );
        assert_eq!(routes.access_for(&Method::GET, "/api/users"), Access::Admin);
        assert_eq!(
            routes.access_for(&Method::GET, "/swagger-ui/index.html"),
            Access::Public
        );
        assert_eq!(
            routes.access_for(&Method::GET, "/api-docs/openapi.json"),
            Access::Public
        );
    }
}
