use crate::error::{AppError, AppResult};
use crate::entities::user_entity as users;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub username: String,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

/// 已登录用户（由鉴权中间件注入请求扩展）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub is_admin: bool,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::AuthError("Invalid session subject".to_string()))?;
        Ok(Self {
            id,
            username: claims.username,
            is_admin: claims.is_admin,
        })
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, session_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_expires_in,
        }
    }

    pub fn generate_session_token(&self, user: &users::Model) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.session_expires_in);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            is_admin: user.is_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn verify_session_token(&self, token: &str) -> AppResult<CurrentUser> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)?;
        CurrentUser::try_from(claims)
    }

    pub fn get_session_expires_in(&self) -> i64 {
        self.session_expires_in
    }
}
