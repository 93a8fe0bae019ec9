use crate::error::{AppError, AppResult};
use bcrypt::{DEFAULT_COST, hash, verify};

const MIN_PASSWORD_CHARS: usize = 8;
const MAX_PASSWORD_CHARS: usize = 128;

/// 管理员密码规则: 8-128 个字符，至少包含一个字母和一个数字
pub fn validate_password(password: &str) -> AppResult<()> {
    let length = password.chars().count();
    if !(MIN_PASSWORD_CHARS..=MAX_PASSWORD_CHARS).contains(&length) {
        return Err(AppError::ValidationError(format!(
            "Password must be between {MIN_PASSWORD_CHARS} and {MAX_PASSWORD_CHARS} characters"
        )));
    }

    if !password.chars().any(char::is_alphabetic) || !password.chars().any(|c| c.is_ascii_digit())
    {
        return Err(AppError::ValidationError(
            "Password must contain at least one letter and one digit".to_string(),
        ));
    }

    Ok(())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))
}

/// 存储的哈希损坏时视为校验失败，不向调用方暴露细节
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    match verify(password, password_hash) {
        Ok(matched) => Ok(matched),
        Err(e) => {
            log::error!("Stored password hash could not be verified: {e}");
            Ok(false)
        }
    }
}
