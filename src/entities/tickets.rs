use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 兑奖码实体
/// 说明:
/// - segment_id 在创建时绑定, 兑奖时直接发放该扇区奖品 (转盘动画仅为展示)
/// - used 只允许 false -> true 一次, 不会回退
/// - ip_address / used_at 在兑奖时写入
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub segment_id: i32,
    pub used: bool,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 是否已过期 (未设置过期时间则永不过期)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            None => false,
            Some(expires_at) => expires_at < now,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // 不建立外键, 扇区删除后兑奖码保留 (奖品显示为 Unknown Prize)
}

impl ActiveModelBehavior for ActiveModel {}
