use crate::database::store::*;
use crate::entities::{
    setting_entity as settings, ticket_entity as tickets, user_entity as users,
    wheel_segment_entity as segments,
};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<i32, users::Model>,
    segments: BTreeMap<i32, segments::Model>,
    tickets: BTreeMap<i32, tickets::Model>,
    settings: BTreeMap<String, settings::Model>,
    last_user_id: i32,
    last_segment_id: i32,
    last_ticket_id: i32,
    last_setting_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

/// 进程内存实现，所有写操作在同一把写锁内完成
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WheelStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn find_user(&self, id: i32) -> AppResult<Option<users::Model>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<users::Model>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<users::Model> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(AppError::ValidationError("Username already exists".into()));
        }
        let model = users::Model {
            id: next_id(&mut state.last_user_id),
            username: user.username,
            password: user.password_hash,
            is_admin: user.is_admin,
        };
        state.users.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update_user_password(
        &self,
        id: i32,
        password_hash: String,
    ) -> AppResult<Option<users::Model>> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(&id).map(|user| {
            user.password = password_hash;
            user.clone()
        }))
    }

    async fn list_segments(&self) -> AppResult<Vec<segments::Model>> {
        let state = self.state.read().await;
        let mut list: Vec<segments::Model> = state.segments.values().cloned().collect();
        list.sort_by_key(|s| (s.position, s.id));
        Ok(list)
    }

    async fn find_segment(&self, id: i32) -> AppResult<Option<segments::Model>> {
        Ok(self.state.read().await.segments.get(&id).cloned())
    }

    async fn count_segments(&self) -> AppResult<u64> {
        Ok(self.state.read().await.segments.len() as u64)
    }

    async fn create_segment(&self, segment: NewSegment) -> AppResult<segments::Model> {
        let mut state = self.state.write().await;
        let model = segments::Model {
            id: next_id(&mut state.last_segment_id),
            text: segment.text,
            color: segment.color,
            position: segment.position,
            weight: segment.weight,
        };
        state.segments.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update_segment(
        &self,
        id: i32,
        changes: SegmentChanges,
    ) -> AppResult<Option<segments::Model>> {
        let mut state = self.state.write().await;
        Ok(state.segments.get_mut(&id).map(|segment| {
            changes.apply_to(segment);
            segment.clone()
        }))
    }

    async fn delete_segment(&self, id: i32) -> AppResult<bool> {
        Ok(self.state.write().await.segments.remove(&id).is_some())
    }

    async fn delete_segment_keeping(
        &self,
        id: i32,
        min_remaining: u64,
    ) -> AppResult<SegmentDeletion> {
        let mut state = self.state.write().await;
        if !state.segments.contains_key(&id) {
            return Ok(SegmentDeletion::NotFound);
        }
        if ((state.segments.len() - 1) as u64) < min_remaining {
            return Ok(SegmentDeletion::BelowMinimum);
        }
        state.segments.remove(&id);
        Ok(SegmentDeletion::Deleted)
    }

    async fn list_tickets(&self) -> AppResult<Vec<tickets::Model>> {
        let state = self.state.read().await;
        let mut list: Vec<tickets::Model> = state.tickets.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(list)
    }

    async fn find_ticket(&self, id: i32) -> AppResult<Option<tickets::Model>> {
        Ok(self.state.read().await.tickets.get(&id).cloned())
    }

    async fn find_ticket_by_code(&self, code: &str) -> AppResult<Option<tickets::Model>> {
        let state = self.state.read().await;
        Ok(state.tickets.values().find(|t| t.code == code).cloned())
    }

    async fn create_tickets(&self, new_tickets: Vec<NewTicket>) -> AppResult<Vec<tickets::Model>> {
        let mut state = self.state.write().await;

        // 先整体校验再写入，保证全部成功或全部失败
        let mut codes: HashSet<&str> = state.tickets.values().map(|t| t.code.as_str()).collect();
        for ticket in &new_tickets {
            if !codes.insert(ticket.code.as_str()) {
                return Err(AppError::ValidationError(
                    "Ticket code already exists".into(),
                ));
            }
        }

        let mut created = Vec::with_capacity(new_tickets.len());
        for ticket in new_tickets {
            let model = tickets::Model {
                id: next_id(&mut state.last_ticket_id),
                code: ticket.code,
                segment_id: ticket.segment_id,
                used: false,
                ip_address: None,
                created_at: ticket.created_at,
                used_at: None,
                expires_at: ticket.expires_at,
            };
            state.tickets.insert(model.id, model.clone());
            created.push(model);
        }
        Ok(created)
    }

    async fn redeem_ticket(
        &self,
        id: i32,
        redemption: Redemption,
    ) -> AppResult<Option<tickets::Model>> {
        let mut state = self.state.write().await;
        match state.tickets.get_mut(&id) {
            Some(ticket) if !ticket.used => {
                ticket.used = true;
                ticket.used_at = Some(redemption.used_at);
                ticket.ip_address = Some(redemption.ip_address);
                Ok(Some(ticket.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_redeemed_tickets(&self) -> AppResult<Vec<tickets::Model>> {
        let state = self.state.read().await;
        let mut list: Vec<tickets::Model> =
            state.tickets.values().filter(|t| t.used).cloned().collect();
        list.sort_by(|a, b| b.used_at.cmp(&a.used_at).then(b.id.cmp(&a.id)));
        Ok(list)
    }

    async fn list_settings(&self) -> AppResult<Vec<settings::Model>> {
        Ok(self.state.read().await.settings.values().cloned().collect())
    }

    async fn find_setting(&self, key: &str) -> AppResult<Option<settings::Model>> {
        Ok(self.state.read().await.settings.get(key).cloned())
    }

    async fn upsert_setting(&self, key: &str, value: &str) -> AppResult<settings::Model> {
        let mut state = self.state.write().await;
        if let Some(setting) = state.settings.get_mut(key) {
            setting.value = value.to_string();
            return Ok(setting.clone());
        }
        let model = settings::Model {
            id: next_id(&mut state.last_setting_id),
            key: key.to_string(),
            value: value.to_string(),
        };
        state.settings.insert(model.key.clone(), model.clone());
        Ok(model)
    }
}
