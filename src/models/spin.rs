use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{TicketResponse, WheelSegmentResponse};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpinRequest {
    #[schema(example = "PRIZE-2025-3FA9C1")]
    pub code: String,
}

/// 兑奖结果；segments 供前端计算转盘停止角度
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpinResponse {
    /// 兑奖后的兑奖码（used = true）
    pub ticket: TicketResponse,
    /// 获得的奖品扇区
    pub segment: WheelSegmentResponse,
    pub segments: Vec<WheelSegmentResponse>,
}
