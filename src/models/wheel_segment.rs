use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::wheel_segment_entity as segment_entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WheelSegmentResponse {
    pub id: i32,
    #[schema(example = "$50 Gift Card")]
    pub text: String,
    #[schema(example = "#F59E0B")]
    pub color: String,
    /// 渲染顺序，列表接口中为 0..N-1 的连续值
    pub position: i32,
    pub weight: i32,
}

impl From<segment_entity::Model> for WheelSegmentResponse {
    fn from(m: segment_entity::Model) -> Self {
        WheelSegmentResponse {
            id: m.id,
            text: m.text,
            color: m.color,
            position: m.position,
            weight: m.weight,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSegmentRequest {
    #[schema(example = "Free Coffee")]
    pub text: String,
    /// 默认 #F59E0B
    pub color: Option<String>,
    /// 默认追加到末尾
    pub position: Option<i32>,
    /// 默认 1
    pub weight: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateSegmentRequest {
    pub text: Option<String>,
    pub color: Option<String>,
    pub position: Option<i32>,
    pub weight: Option<i32>,
}
