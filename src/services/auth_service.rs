use crate::database::{NewUser, SharedStore};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{JwtService, hash_password, validate_password, verify_password};
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};

/// 会话 Cookie 名称
pub const SESSION_COOKIE: &str = "wheel_session";

#[derive(Clone)]
pub struct AuthService {
    store: SharedStore,
    jwt_service: JwtService,
    cookie_secure: bool,
}

impl AuthService {
    pub fn new(store: SharedStore, jwt_service: JwtService, cookie_secure: bool) -> Self {
        Self {
            store,
            jwt_service,
            cookie_secure,
        }
    }

    /// 用户名密码登录
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let invalid = || AppError::AuthError("Invalid username or password".to_string());

        let user = self
            .store
            .find_user_by_username(request.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password)? {
            log::warn!("Failed login attempt for user {}", user.username);
            return Err(invalid());
        }

        let token = self.jwt_service.generate_session_token(&user)?;
        log::info!("User {} logged in", user.username);

        Ok(AuthResponse {
            user: user.into(),
            token,
            expires_in: self.jwt_service.get_session_expires_in(),
        })
    }

    /// 当前会话对应的用户
    pub async fn current_user(&self, user_id: i32) -> AppResult<UserResponse> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;
        Ok(user.into())
    }

    pub async fn change_password(
        &self,
        user_id: i32,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        if !verify_password(&request.current_password, &user.password)? {
            return Err(AppError::ValidationError(
                "Current password is incorrect".to_string(),
            ));
        }
        validate_password(&request.new_password)?;

        let password_hash = hash_password(&request.new_password)?;
        self.store
            .update_user_password(user.id, password_hash)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        log::info!("User {} changed password", user.username);
        Ok(())
    }

    /// 启动时创建管理员账号；已存在则跳过
    pub async fn ensure_admin(&self, username: &str, password: &str) -> AppResult<bool> {
        if self.store.find_user_by_username(username).await?.is_some() {
            log::debug!("Admin user {username} already exists");
            return Ok(false);
        }

        validate_password(password)?;
        self.store
            .create_user(NewUser {
                username: username.to_string(),
                password_hash: hash_password(password)?,
                is_admin: true,
            })
            .await?;

        log::info!("Admin user {username} created");
        Ok(true)
    }

    /// HttpOnly 会话 Cookie
    pub fn session_cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token.to_string())
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::seconds(
                self.jwt_service.get_session_expires_in(),
            ))
            .finish()
    }

    /// 用于退出登录的过期 Cookie
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .finish();
        cookie.make_removal();
        cookie
    }
}
