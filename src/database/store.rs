use crate::entities::{
    setting_entity as settings, ticket_entity as tickets, user_entity as users,
    wheel_segment_entity as segments,
};
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub type SharedStore = Arc<dyn WheelStore>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSegment {
    pub text: String,
    pub color: String,
    pub position: i32,
    pub weight: i32,
}

/// 扇区部分更新，None 表示不修改
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentChanges {
    pub text: Option<String>,
    pub color: Option<String>,
    pub position: Option<i32>,
    pub weight: Option<i32>,
}

impl SegmentChanges {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.color.is_none() && self.position.is_none() && self.weight.is_none()
    }

    pub fn apply_to(&self, segment: &mut segments::Model) {
        if let Some(text) = &self.text {
            segment.text = text.clone();
        }
        if let Some(color) = &self.color {
            segment.color = color.clone();
        }
        if let Some(position) = self.position {
            segment.position = position;
        }
        if let Some(weight) = self.weight {
            segment.weight = weight;
        }
    }
}

/// 带数量下限的删除结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentDeletion {
    Deleted,
    NotFound,
    /// 删除后剩余扇区数会低于下限，未删除
    BelowMinimum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub code: String,
    pub segment_id: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// 兑奖时写入的信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redemption {
    pub used_at: DateTime<Utc>,
    pub ip_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// 持久化抽象：关系数据库 (sea-orm) 与内存实现均满足此接口
#[async_trait]
pub trait WheelStore: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    async fn find_user(&self, id: i32) -> AppResult<Option<users::Model>>;
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<users::Model>>;
    async fn create_user(&self, user: NewUser) -> AppResult<users::Model>;
    async fn update_user_password(
        &self,
        id: i32,
        password_hash: String,
    ) -> AppResult<Option<users::Model>>;

    /// 按 position 升序（相同 position 按 id）返回
    async fn list_segments(&self) -> AppResult<Vec<segments::Model>>;
    async fn find_segment(&self, id: i32) -> AppResult<Option<segments::Model>>;
    async fn count_segments(&self) -> AppResult<u64>;
    async fn create_segment(&self, segment: NewSegment) -> AppResult<segments::Model>;
    async fn update_segment(
        &self,
        id: i32,
        changes: SegmentChanges,
    ) -> AppResult<Option<segments::Model>>;
    async fn delete_segment(&self, id: i32) -> AppResult<bool>;
    /// 计数与删除在同一原子操作内完成，保证剩余扇区数不低于 min_remaining
    async fn delete_segment_keeping(
        &self,
        id: i32,
        min_remaining: u64,
    ) -> AppResult<SegmentDeletion>;

    /// 按创建时间倒序返回
    async fn list_tickets(&self) -> AppResult<Vec<tickets::Model>>;
    async fn find_ticket(&self, id: i32) -> AppResult<Option<tickets::Model>>;
    async fn find_ticket_by_code(&self, code: &str) -> AppResult<Option<tickets::Model>>;
    /// 全部成功或全部失败
    async fn create_tickets(&self, tickets: Vec<NewTicket>) -> AppResult<Vec<tickets::Model>>;
    /// 原子地将未使用的兑奖码标记为已使用；已被使用时返回 None
    async fn redeem_ticket(
        &self,
        id: i32,
        redemption: Redemption,
    ) -> AppResult<Option<tickets::Model>>;
    /// 已兑奖记录，按兑奖时间倒序
    async fn list_redeemed_tickets(&self) -> AppResult<Vec<tickets::Model>>;

    async fn list_settings(&self) -> AppResult<Vec<settings::Model>>;
    async fn find_setting(&self, key: &str) -> AppResult<Option<settings::Model>>;
    /// 单条语句完成插入或更新，并发写同一个新 key 不会失败
    async fn upsert_setting(&self, key: &str, value: &str) -> AppResult<settings::Model>;
}

/// 两种存储实现共用的行为测试
#[cfg(test)]
pub(crate) mod conformance {
    use super::*;
    use chrono::Duration;

    fn segment(text: &str, position: i32) -> NewSegment {
        NewSegment {
            text: text.to_string(),
            color: "#F59E0B".to_string(),
            position,
            weight: 1,
        }
    }

    fn ticket(code: &str, segment_id: i32) -> NewTicket {
        NewTicket {
            code: code.to_string(),
            segment_id,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    pub async fn segments_sorted_by_position<S: WheelStore + ?Sized>(store: &S) {
        store.create_segment(segment("c", 2)).await.unwrap();
        store.create_segment(segment("a", 0)).await.unwrap();
        store.create_segment(segment("b", 1)).await.unwrap();

        let list = store.list_segments().await.unwrap();
        let texts: Vec<&str> = list.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(store.count_segments().await.unwrap(), 3);
    }

    pub async fn segment_update_and_delete<S: WheelStore + ?Sized>(store: &S) {
        let created = store.create_segment(segment("Free Coffee", 0)).await.unwrap();

        let updated = store
            .update_segment(
                created.id,
                SegmentChanges {
                    text: Some("Free Tea".into()),
                    weight: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "Free Tea");
        assert_eq!(updated.weight, 5);
        assert_eq!(updated.color, created.color);

        assert!(
            store
                .update_segment(created.id + 100, SegmentChanges::default())
                .await
                .unwrap()
                .is_none()
        );

        assert!(store.delete_segment(created.id).await.unwrap());
        assert!(!store.delete_segment(created.id).await.unwrap());
        assert!(store.find_segment(created.id).await.unwrap().is_none());
    }

    pub async fn segment_deletion_keeps_minimum<S: WheelStore + ?Sized>(store: &S) {
        let a = store.create_segment(segment("a", 0)).await.unwrap();
        let b = store.create_segment(segment("b", 1)).await.unwrap();
        let c = store.create_segment(segment("c", 2)).await.unwrap();

        let (first, second) = tokio::join!(
            store.delete_segment_keeping(b.id, 2),
            store.delete_segment_keeping(c.id, 2),
        );
        let mut outcomes = vec![first.unwrap(), second.unwrap()];
        outcomes.sort_by_key(|o| *o == SegmentDeletion::Deleted);
        assert_eq!(
            outcomes,
            vec![SegmentDeletion::BelowMinimum, SegmentDeletion::Deleted]
        );
        assert_eq!(store.count_segments().await.unwrap(), 2);

        assert_eq!(
            store.delete_segment_keeping(a.id + 100, 2).await.unwrap(),
            SegmentDeletion::NotFound
        );
        assert_eq!(
            store.delete_segment_keeping(a.id, 1).await.unwrap(),
            SegmentDeletion::Deleted
        );
    }

    pub async fn redeem_only_once<S: WheelStore + ?Sized>(store: &S) {
        let seg = store.create_segment(segment("Prize", 0)).await.unwrap();
        let created = store
            .create_tickets(vec![ticket("PRIZE-2025-AAAAAA", seg.id)])
            .await
            .unwrap();
        let id = created[0].id;
        assert!(!created[0].used);

        let first = store
            .redeem_ticket(
                id,
                Redemption {
                    used_at: Utc::now(),
                    ip_address: "10.0.0.1".into(),
                },
            )
            .await
            .unwrap()
            .expect("first redemption wins");
        assert!(first.used);
        assert!(first.used_at.is_some());
        assert_eq!(first.ip_address.as_deref(), Some("10.0.0.1"));

        let second = store
            .redeem_ticket(
                id,
                Redemption {
                    used_at: Utc::now(),
                    ip_address: "10.0.0.2".into(),
                },
            )
            .await
            .unwrap();
        assert!(second.is_none());

        let stored = store.find_ticket(id).await.unwrap().unwrap();
        assert!(stored.used);
        assert_eq!(stored.ip_address.as_deref(), Some("10.0.0.1"));

        let by_code = store
            .find_ticket_by_code("PRIZE-2025-AAAAAA")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_code.id, id);
        assert!(store.find_ticket_by_code("missing").await.unwrap().is_none());
    }

    pub async fn duplicate_ticket_code_rejected_atomically<S: WheelStore + ?Sized>(store: &S) {
        let seg = store.create_segment(segment("Prize", 0)).await.unwrap();
        let result = store
            .create_tickets(vec![
                ticket("PRIZE-2025-000001", seg.id),
                ticket("PRIZE-2025-000002", seg.id),
                ticket("PRIZE-2025-000001", seg.id),
            ])
            .await;
        assert!(result.is_err());
        assert!(store.list_tickets().await.unwrap().is_empty());

        store
            .create_tickets(vec![ticket("PRIZE-2025-000003", seg.id)])
            .await
            .unwrap();
        assert!(
            store
                .create_tickets(vec![ticket("PRIZE-2025-000003", seg.id)])
                .await
                .is_err()
        );
        assert_eq!(store.list_tickets().await.unwrap().len(), 1);
    }

    pub async fn redeemed_tickets_listed_newest_first<S: WheelStore + ?Sized>(store: &S) {
        let seg = store.create_segment(segment("Prize", 0)).await.unwrap();
        let created = store
            .create_tickets(vec![
                ticket("PRIZE-2025-00000A", seg.id),
                ticket("PRIZE-2025-00000B", seg.id),
                ticket("PRIZE-2025-00000C", seg.id),
            ])
            .await
            .unwrap();

        let earlier = Utc::now() - Duration::minutes(5);
        store
            .redeem_ticket(
                created[0].id,
                Redemption {
                    used_at: earlier,
                    ip_address: "a".into(),
                },
            )
            .await
            .unwrap();
        store
            .redeem_ticket(
                created[1].id,
                Redemption {
                    used_at: Utc::now(),
                    ip_address: "b".into(),
                },
            )
            .await
            .unwrap();

        let redeemed = store.list_redeemed_tickets().await.unwrap();
        let ids: Vec<i32> = redeemed.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![created[1].id, created[0].id]);
        assert_eq!(store.list_tickets().await.unwrap().len(), 3);
    }

    pub async fn settings_upsert<S: WheelStore + ?Sized>(store: &S) {
        let first = store.upsert_setting("site_title", "Prize Wheel").await.unwrap();
        let second = store.upsert_setting("site_title", "Spin & Win").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.value, "Spin & Win");

        store.upsert_setting("background_color", "#000").await.unwrap();
        assert_eq!(store.list_settings().await.unwrap().len(), 2);
        assert_eq!(
            store.find_setting("site_title").await.unwrap().unwrap().value,
            "Spin & Win"
        );
        assert!(store.find_setting("missing").await.unwrap().is_none());
    }

    pub async fn concurrent_upserts_of_new_setting<S: WheelStore + ?Sized>(store: &S) {
        let (first, second) = tokio::join!(
            store.upsert_setting("promo.banner", "first"),
            store.upsert_setting("promo.banner", "second"),
        );
        let first = first.unwrap();
        let second = second.unwrap();
        assert_eq!(first.id, second.id);

        let list = store.list_settings().await.unwrap();
        let matching: Vec<_> = list.iter().filter(|s| s.key == "promo.banner").collect();
        assert_eq!(matching.len(), 1);
        assert!(["first", "second"].contains(&matching[0].value.as_str()));
    }

    pub async fn users<S: WheelStore + ?Sized>(store: &S) {
        let user = store
            .create_user(NewUser {
                username: "admin".into(),
                password_hash: "hash-1".into(),
                is_admin: true,
            })
            .await
            .unwrap();
        assert!(user.is_admin);

        let duplicate = store
            .create_user(NewUser {
                username: "admin".into(),
                password_hash: "hash-2".into(),
                is_admin: false,
            })
            .await;
        assert!(duplicate.is_err());

        let found = store.find_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        let updated = store
            .update_user_password(user.id, "hash-3".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.password, "hash-3");
        assert!(store.update_user_password(999, "x".into()).await.unwrap().is_none());
        assert_eq!(
            store.find_user(user.id).await.unwrap().unwrap().password,
            "hash-3"
        );
    }
}
