use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Ticket already used")]
    TicketAlreadyUsed,

    #[error("Ticket has expired")]
    TicketExpired,

    #[error("Business rule violated: {0}")]
    BusinessRule(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR", msg.clone()),
            // 令牌解析失败统一视为未登录
            AppError::JwtError(_) => (
                StatusCode::UNAUTHORIZED,
                "AUTH_ERROR",
                "Invalid session".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "Forbidden".to_string()),
            AppError::TicketAlreadyUsed => (
                StatusCode::BAD_REQUEST,
                "TICKET_ALREADY_USED",
                "Ticket already used".to_string(),
            ),
            AppError::TicketExpired => (
                StatusCode::BAD_REQUEST,
                "TICKET_EXPIRED",
                "Ticket has expired".to_string(),
            ),
            AppError::BusinessRule(msg) => (StatusCode::BAD_REQUEST, "BUSINESS_RULE", msg.clone()),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Database error".to_string(),
            ),
            AppError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.parts();

        if status_code.is_server_error() {
            log::error!("{self}");
        } else if matches!(self, AppError::AuthError(_) | AppError::Forbidden) {
            log::warn!("Access rejected: {self}");
        } else {
            log::debug!("Request rejected: {self}");
        }

        HttpResponse::build(status_code).json(ErrorResponse::new(error_code, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_map_to_bad_request() {
        assert_eq!(AppError::TicketAlreadyUsed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::TicketExpired.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::BusinessRule("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::AuthError("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DatabaseError(sea_orm::DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_hidden_from_response() {
        let (_, code, message) =
            AppError::DatabaseError(sea_orm::DbErr::Custom("secret".into())).parts();
        assert_eq!(code, "DATABASE_ERROR");
        assert!(!message.contains("secret"));
    }
}
