use crate::error::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};

/// 解析过期时间: RFC 3339 时间戳，或 YYYY-MM-DD（按 UTC 零点）
pub fn parse_expires_at(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::ValidationError(format!("Invalid expiration date: {raw}")))
}
