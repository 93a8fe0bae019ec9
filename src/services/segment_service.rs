use crate::database::{NewSegment, SegmentChanges, SegmentDeletion, SharedStore};
use crate::entities::wheel_segment_entity as segments;
use crate::error::{AppError, AppResult};
use crate::models::*;

/// 转盘至少需要的扇区数
pub const MIN_SEGMENTS: u64 = 2;
pub const DEFAULT_SEGMENT_COLOR: &str = "#F59E0B";
const MAX_TEXT_LEN: usize = 100;
const MAX_COLOR_LEN: usize = 64;
const MAX_WEIGHT: i32 = 10_000;

#[derive(Clone)]
pub struct SegmentService {
    store: SharedStore,
}

impl SegmentService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 获取扇区列表（position 升序并归一化为 0..N-1）
    pub async fn list_segments(&self) -> AppResult<Vec<WheelSegmentResponse>> {
        let list = self.store.list_segments().await?;
        Ok(normalize_positions(list)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub async fn create_segment(
        &self,
        request: CreateSegmentRequest,
    ) -> AppResult<WheelSegmentResponse> {
        let text = validate_text(&request.text)?;
        let color = match request.color {
            Some(color) => validate_color(&color)?,
            None => DEFAULT_SEGMENT_COLOR.to_string(),
        };
        let weight = request.weight.map(validate_weight).transpose()?.unwrap_or(1);

        // 未指定位置时追加到最后
        let position = match request.position {
            Some(position) => validate_position(position)?,
            None => self
                .store
                .list_segments()
                .await?
                .last()
                .map(|s| s.position.saturating_add(1))
                .unwrap_or(0),
        };

        let segment = self
            .store
            .create_segment(NewSegment {
                text,
                color,
                position,
                weight,
            })
            .await?;

        log::info!("Wheel segment {} created: {}", segment.id, segment.text);
        Ok(segment.into())
    }

    pub async fn update_segment(
        &self,
        id: i32,
        request: UpdateSegmentRequest,
    ) -> AppResult<WheelSegmentResponse> {
        let changes = SegmentChanges {
            text: request.text.as_deref().map(validate_text).transpose()?,
            color: request.color.as_deref().map(validate_color).transpose()?,
            position: request.position.map(validate_position).transpose()?,
            weight: request.weight.map(validate_weight).transpose()?,
        };

        if changes.is_empty() {
            return Err(AppError::ValidationError(
                "No fields to update".to_string(),
            ));
        }

        let segment = self
            .store
            .update_segment(id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Segment not found".to_string()))?;

        Ok(segment.into())
    }

    /// 删除扇区；已绑定该扇区的兑奖码保留（奖品显示为 Unknown Prize）
    pub async fn delete_segment(&self, id: i32) -> AppResult<()> {
        match self.store.delete_segment_keeping(id, MIN_SEGMENTS).await? {
            SegmentDeletion::Deleted => {
                log::info!("Wheel segment {id} deleted");
                Ok(())
            }
            SegmentDeletion::NotFound => Err(AppError::NotFound("Segment not found".to_string())),
            SegmentDeletion::BelowMinimum => {
                log::warn!(
                    "Refusing to delete segment {id}: wheel needs at least {MIN_SEGMENTS} segments"
                );
                Err(AppError::BusinessRule(format!(
                    "The wheel must keep at least {MIN_SEGMENTS} segments"
                )))
            }
        }
    }
}

/// 按 (position, id) 排序后重写为连续的 0..N-1，仅影响展示
pub fn normalize_positions(mut list: Vec<segments::Model>) -> Vec<segments::Model> {
    list.sort_by_key(|s| (s.position, s.id));
    for (index, segment) in list.iter_mut().enumerate() {
        segment.position = index as i32;
    }
    list
}

fn validate_text(text: &str) -> AppResult<String> {
    let text = text.trim();
    if text.is_empty() || text.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::ValidationError(format!(
            "Segment text must be between 1 and {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(text.to_string())
}

fn validate_color(color: &str) -> AppResult<String> {
    let color = color.trim();
    if color.is_empty() || color.len() > MAX_COLOR_LEN {
        return Err(AppError::ValidationError(format!(
            "Segment color must be between 1 and {MAX_COLOR_LEN} characters"
        )));
    }
    Ok(color.to_string())
}

fn validate_position(position: i32) -> AppResult<i32> {
    if position < 0 {
        return Err(AppError::ValidationError(
            "Segment position must not be negative".to_string(),
        ));
    }
    Ok(position)
}

fn validate_weight(weight: i32) -> AppResult<i32> {
    if !(0..=MAX_WEIGHT).contains(&weight) {
        return Err(AppError::ValidationError(format!(
            "Segment weight must be between 0 and {MAX_WEIGHT}"
        )));
    }
    Ok(weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{MemoryStore, NewTicket};
    use chrono::Utc;
    use std::sync::Arc;

    fn service() -> (SegmentService, SharedStore) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        (SegmentService::new(store.clone()), store)
    }

    fn create(text: &str, position: Option<i32>) -> CreateSegmentRequest {
        CreateSegmentRequest {
            text: text.to_string(),
            color: None,
            position,
            weight: None,
        }
    }

    #[test]
    fn test_normalize_positions() {
        let seg = |id, position| segments::Model {
            id,
            text: format!("s{id}"),
            color: DEFAULT_SEGMENT_COLOR.to_string(),
            position,
            weight: 1,
        };
        let normalized = normalize_positions(vec![seg(1, 10), seg(2, 3), seg(3, 10), seg(4, -1)]);
        let ids: Vec<i32> = normalized.iter().map(|s| s.id).collect();
        let positions: Vec<i32> = normalized.iter().map(|s| s.position).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_dense() {
        let (service, _) = service();
        service.create_segment(create("third", Some(20))).await.unwrap();
        service.create_segment(create("first", Some(0))).await.unwrap();
        service.create_segment(create("second", Some(7))).await.unwrap();

        let list = service.list_segments().await.unwrap();
        let texts: Vec<&str> = list.iter().map(|s| s.text.as_str()).collect();
        let positions: Vec<i32> = list.iter().map(|s| s.position).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let (service, _) = service();
        let first = service.create_segment(create("  Free Coffee  ", None)).await.unwrap();
        assert_eq!(first.text, "Free Coffee");
        assert_eq!(first.color, DEFAULT_SEGMENT_COLOR);
        assert_eq!(first.position, 0);
        assert_eq!(first.weight, 1);

        let second = service.create_segment(create("Free Tea", None)).await.unwrap();
        assert_eq!(second.position, 1);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (service, _) = service();
        assert!(matches!(
            service.create_segment(create("   ", None)).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.create_segment(create("x", Some(-1))).await,
            Err(AppError::ValidationError(_))
        ));
        let mut heavy = create("x", None);
        heavy.weight = Some(MAX_WEIGHT + 1);
        assert!(matches!(
            service.create_segment(heavy).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_update_segment() {
        let (service, _) = service();
        let created = service.create_segment(create("Old", None)).await.unwrap();

        let updated = service
            .update_segment(
                created.id,
                UpdateSegmentRequest {
                    text: Some("New".into()),
                    color: Some("#10B981".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "New");
        assert_eq!(updated.color, "#10B981");

        assert!(matches!(
            service
                .update_segment(created.id, UpdateSegmentRequest::default())
                .await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service
                .update_segment(
                    999,
                    UpdateSegmentRequest {
                        text: Some("x".into()),
                        ..Default::default()
                    }
                )
                .await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_keeps_minimum_segments() {
        let (service, store) = service();
        let a = service.create_segment(create("a", None)).await.unwrap();
        let b = service.create_segment(create("b", None)).await.unwrap();
        let c = service.create_segment(create("c", None)).await.unwrap();

        service.delete_segment(c.id).await.unwrap();
        assert!(matches!(
            service.delete_segment(b.id).await,
            Err(AppError::BusinessRule(_))
        ));
        assert_eq!(store.count_segments().await.unwrap(), 2);
        assert!(matches!(
            service.delete_segment(c.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(store.find_segment(a.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_deletes_never_drop_below_minimum() {
        let (service, store) = service();
        let a = service.create_segment(create("a", None)).await.unwrap();
        let b = service.create_segment(create("b", None)).await.unwrap();
        let c = service.create_segment(create("c", None)).await.unwrap();

        let (first, second, third) = tokio::join!(
            service.delete_segment(a.id),
            service.delete_segment(b.id),
            service.delete_segment(c.id),
        );
        let results = [first, second, third];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(AppError::BusinessRule(_))))
                .count(),
            2
        );
        assert_eq!(store.count_segments().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_after_deleting_segment_with_tickets() {
        let (service, store) = service();
        let a = service.create_segment(create("a", None)).await.unwrap();
        let b = service.create_segment(create("b", None)).await.unwrap();
        let c = service.create_segment(create("c", None)).await.unwrap();
        store
            .create_tickets(vec![NewTicket {
                code: "PRIZE-2025-ABC123".to_string(),
                segment_id: b.id,
                created_at: Utc::now(),
                expires_at: None,
            }])
            .await
            .unwrap();

        service.delete_segment(b.id).await.unwrap();

        let list = service.list_segments().await.unwrap();
        let ids: Vec<i32> = list.iter().map(|s| s.id).collect();
        let positions: Vec<i32> = list.iter().map(|s| s.position).collect();
        assert_eq!(ids, vec![a.id, c.id]);
        assert_eq!(positions, vec![0, 1]);
        assert_eq!(store.list_tickets().await.unwrap().len(), 1);
    }
}
