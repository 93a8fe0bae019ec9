use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::ticket_entity;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketResponse {
    pub id: i32,
    #[schema(example = "PRIZE-2025-3FA9C1")]
    pub code: String,
    pub segment_id: i32,
    pub used: bool,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ticket_entity::Model> for TicketResponse {
    fn from(m: ticket_entity::Model) -> Self {
        TicketResponse {
            id: m.id,
            code: m.code,
            segment_id: m.segment_id,
            used: m.used,
            ip_address: m.ip_address,
            created_at: m.created_at,
            used_at: m.used_at,
            expires_at: m.expires_at,
        }
    }
}

/// 单张兑奖码
/// - segment_id 为空时按扇区权重随机绑定奖品
/// - code 为空时自动生成
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateTicketRequest {
    #[serde(alias = "segmentId")]
    pub segment_id: Option<i32>,
    pub code: Option<String>,
    /// RFC 3339 或 YYYY-MM-DD
    #[serde(alias = "expiresAt")]
    #[schema(example = "2025-12-31")]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchCreateTicketsRequest {
    #[serde(alias = "segmentId")]
    pub segment_id: i32,
    /// 1-100
    #[schema(example = 10)]
    pub count: i64,
    #[serde(alias = "expiresAt")]
    pub expires_at: Option<String>,
}

/// 中奖名单条目：兑奖码 + 奖品文字
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WinnerResponse {
    #[serde(flatten)]
    pub ticket: TicketResponse,
    #[schema(example = "Free Coffee")]
    pub prize: String,
}
