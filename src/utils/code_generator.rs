use chrono::{DateTime, Datelike, Utc};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

pub const TICKET_CODE_PREFIX: &str = "PRIZE";

/// 生成兑奖码: PRIZE-<年份>-<6位大写十六进制>
/// 唯一性由调用方结合存储层校验
pub fn generate_ticket_code(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("{TICKET_CODE_PREFIX}-{}-{suffix}", now.year())
}

/// 管理员手动指定的兑奖码格式
pub fn is_valid_ticket_code(code: &str) -> bool {
    static CODE_RE: OnceLock<Regex> = OnceLock::new();
    CODE_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9-]{4,64}$").expect("valid regex"))
        .is_match(code)
}
