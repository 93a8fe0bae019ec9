use crate::database::{Redemption, SharedStore};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::segment_service::normalize_positions;
use chrono::Utc;

#[derive(Clone)]
pub struct SpinService {
    store: SharedStore,
}

impl SpinService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 兑奖：校验兑奖码后原子地标记为已使用，返回预先绑定的奖品
    ///
    /// 同一兑奖码并发兑奖时只有一个请求成功，其余返回 TicketAlreadyUsed
    pub async fn spin(&self, code: &str, ip_address: String) -> AppResult<SpinResponse> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::ValidationError(
                "Ticket code is required".to_string(),
            ));
        }

        let ticket = self
            .store
            .find_ticket_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid ticket code".to_string()))?;

        if ticket.used {
            return Err(AppError::TicketAlreadyUsed);
        }

        let now = Utc::now();
        if ticket.is_expired_at(now) {
            return Err(AppError::TicketExpired);
        }

        let segment = self
            .store
            .find_segment(ticket.segment_id)
            .await?
            .ok_or_else(|| {
                log::error!(
                    "Ticket {} references missing segment {}",
                    ticket.code,
                    ticket.segment_id
                );
                AppError::InternalError("Prize not found".to_string())
            })?;

        let redeemed = match self
            .store
            .redeem_ticket(
                ticket.id,
                Redemption {
                    used_at: now,
                    ip_address: ip_address.clone(),
                },
            )
            .await?
        {
            Some(redeemed) => redeemed,
            None => {
                log::warn!("Ticket {} was redeemed concurrently", ticket.code);
                return Err(AppError::TicketAlreadyUsed);
            }
        };

        let segments = normalize_positions(self.store.list_segments().await?);
        let won = segments
            .iter()
            .find(|s| s.id == segment.id)
            .cloned()
            .unwrap_or(segment);

        log::info!(
            "Ticket {} redeemed from {} for prize {} ({})",
            redeemed.code,
            ip_address,
            won.id,
            won.text
        );

        Ok(SpinResponse {
            ticket: redeemed.into(),
            segment: won.into(),
            segments: segments.into_iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::sea_orm_store::test_support::sqlite_store;
    use crate::database::{MemoryStore, NewSegment, NewTicket};
    use chrono::Duration;
    use std::sync::Arc;

    async fn seed(store: &SharedStore, expires_at: Option<chrono::DateTime<Utc>>) -> (i32, String) {
        store
            .create_segment(NewSegment {
                text: "Try Again".into(),
                color: "#84CC16".into(),
                position: 5,
                weight: 1,
            })
            .await
            .unwrap();
        let prize = store
            .create_segment(NewSegment {
                text: "$50 Gift Card".into(),
                color: "#F59E0B".into(),
                position: 9,
                weight: 1,
            })
            .await
            .unwrap();
        let code = "PRIZE-2025-ABC123".to_string();
        store
            .create_tickets(vec![NewTicket {
                code: code.clone(),
                segment_id: prize.id,
                created_at: Utc::now(),
                expires_at,
            }])
            .await
            .unwrap();
        (prize.id, code)
    }

    fn memory() -> SharedStore {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_spin_returns_bound_prize() {
        let store = memory();
        let (prize_id, code) = seed(&store, None).await;
        let service = SpinService::new(store.clone());

        let result = service.spin(&code, "10.0.0.1".into()).await.unwrap();
        assert!(result.ticket.used);
        assert!(result.ticket.used_at.is_some());
        assert_eq!(result.ticket.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(result.segment.id, prize_id);
        assert_eq!(result.segment.text, "$50 Gift Card");
        assert_eq!(result.segment.position, 1);
        let positions: Vec<i32> = result.segments.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1]);

        let again = service.spin(&code, "10.0.0.2".into()).await;
        assert!(matches!(again, Err(AppError::TicketAlreadyUsed)));
    }

    #[tokio::test]
    async fn test_spin_unknown_code() {
        let store = memory();
        seed(&store, None).await;
        let service = SpinService::new(store.clone());

        let result = service.spin("PRIZE-2025-FFFFFF", "10.0.0.1".into()).await;
        assert!(matches!(result, Err(AppError::NotFound(ref m)) if m == "Invalid ticket code"));
        assert!(store.list_redeemed_tickets().await.unwrap().is_empty());

        let empty = service.spin("   ", "10.0.0.1".into()).await;
        assert!(matches!(empty, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_spin_expired_ticket_is_not_consumed() {
        let store = memory();
        let (_, code) = seed(&store, Some(Utc::now() - Duration::hours(1))).await;
        let service = SpinService::new(store.clone());

        let result = service.spin(&code, "10.0.0.1".into()).await;
        assert!(matches!(result, Err(AppError::TicketExpired)));
        let ticket = store.find_ticket_by_code(&code).await.unwrap().unwrap();
        assert!(!ticket.used);
    }

    #[tokio::test]
    async fn test_spin_with_missing_segment() {
        let store = memory();
        let (prize_id, code) = seed(&store, None).await;
        store.delete_segment(prize_id).await.unwrap();
        let service = SpinService::new(store.clone());

        let result = service.spin(&code, "10.0.0.1".into()).await;
        assert!(matches!(result, Err(AppError::InternalError(ref m)) if m == "Prize not found"));
        let ticket = store.find_ticket_by_code(&code).await.unwrap().unwrap();
        assert!(!ticket.used);
    }

    async fn assert_single_winner(store: SharedStore) {
        let (_, code) = seed(&store, None).await;
        let service = SpinService::new(store.clone());

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = service.clone();
            let code = code.clone();
            handles.push(tokio::spawn(async move {
                service.spin(&code, format!("10.0.0.{i}")).await
            }));
        }

        let mut wins = 0;
        let mut already_used = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(AppError::TicketAlreadyUsed) => already_used += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(already_used, 15);
        assert_eq!(store.list_redeemed_tickets().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_spins_memory_store() {
        assert_single_winner(memory()).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_spins_sqlite_store() {
        assert_single_winner(Arc::new(sqlite_store().await)).await;
    }
}
