use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::setting_entity;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingResponse {
    pub id: i32,
    #[schema(example = "site_title")]
    pub key: String,
    #[schema(example = "Prize Wheel Game")]
    pub value: String,
}

impl From<setting_entity::Model> for SettingResponse {
    fn from(m: setting_entity::Model) -> Self {
        SettingResponse {
            id: m.id,
            key: m.key,
            value: m.value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateSettingRequest {
    pub value: String,
}
