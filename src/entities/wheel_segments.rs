use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 转盘扇区实体
/// - position: 角度顺序 (升序渲染)
/// - weight: 未指定扇区创建兑奖码时的抽取权重, 0 表示不参与随机
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wheel_segments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// 奖品文字
    pub text: String,
    /// 背景色 (十六进制或前端 class)
    pub color: String,
    pub position: i32,
    pub weight: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
