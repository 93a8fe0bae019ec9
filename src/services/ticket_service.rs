use crate::database::{NewTicket, SharedStore};
use crate::entities::wheel_segment_entity as segments;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{generate_ticket_code, is_valid_ticket_code, parse_expires_at};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// 批量生成上限
pub const MAX_BATCH_SIZE: i64 = 100;
const CODE_GENERATION_ATTEMPTS: usize = 10;
const UNKNOWN_PRIZE: &str = "Unknown Prize";

#[derive(Clone)]
pub struct TicketService {
    store: SharedStore,
}

impl TicketService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 全部兑奖码，按创建时间倒序
    pub async fn list_tickets(&self) -> AppResult<Vec<TicketResponse>> {
        let list = self.store.list_tickets().await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 创建单张兑奖码
    pub async fn create_ticket(&self, request: CreateTicketRequest) -> AppResult<TicketResponse> {
        let now = Utc::now();
        let expires_at = parse_optional_expiry(request.expires_at.as_deref())?;

        let segment_id = match request.segment_id {
            Some(id) => self.require_segment(id).await?.id,
            None => {
                let list = self.store.list_segments().await?;
                let picked = {
                    let mut rng = rand::thread_rng();
                    select_weighted(&list, &mut rng).map(|s| s.id)
                };
                picked.ok_or_else(|| {
                    AppError::BusinessRule(
                        "No wheel segment with a positive weight is available".to_string(),
                    )
                })?
            }
        };

        let code = match request.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                if !is_valid_ticket_code(code) {
                    return Err(AppError::ValidationError(
                        "Ticket code must be 4-64 letters, digits or dashes".to_string(),
                    ));
                }
                if self.store.find_ticket_by_code(code).await?.is_some() {
                    return Err(AppError::ValidationError(
                        "Ticket code already exists".to_string(),
                    ));
                }
                code.to_string()
            }
            _ => self
                .generate_unique_codes(1, now)
                .await?
                .pop()
                .ok_or_else(|| AppError::InternalError("Failed to generate ticket code".into()))?,
        };

        let created = self
            .store
            .create_tickets(vec![NewTicket {
                code,
                segment_id,
                created_at: now,
                expires_at,
            }])
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalError("Ticket was not created".to_string()))?;

        log::info!(
            "Ticket {} created for segment {}",
            created.code,
            created.segment_id
        );
        Ok(created.into())
    }

    /// 批量创建兑奖码（全部成功或全部失败）
    pub async fn create_batch(
        &self,
        request: BatchCreateTicketsRequest,
    ) -> AppResult<Vec<TicketResponse>> {
        if !(1..=MAX_BATCH_SIZE).contains(&request.count) {
            return Err(AppError::ValidationError(format!(
                "Count must be between 1 and {MAX_BATCH_SIZE}"
            )));
        }

        let segment = self.require_segment(request.segment_id).await?;
        let expires_at = parse_optional_expiry(request.expires_at.as_deref())?;
        let now = Utc::now();

        let codes = self
            .generate_unique_codes(request.count as usize, now)
            .await?;
        let new_tickets = codes
            .into_iter()
            .map(|code| NewTicket {
                code,
                segment_id: segment.id,
                created_at: now,
                expires_at,
            })
            .collect();

        let created = self.store.create_tickets(new_tickets).await?;
        log::info!(
            "Generated {} tickets for segment {} ({})",
            created.len(),
            segment.id,
            segment.text
        );
        Ok(created.into_iter().map(Into::into).collect())
    }

    /// 中奖名单：已兑奖的兑奖码 + 奖品文字，按兑奖时间倒序
    pub async fn list_winners(&self) -> AppResult<Vec<WinnerResponse>> {
        let redeemed = self.store.list_redeemed_tickets().await?;
        let prizes: HashMap<i32, String> = self
            .store
            .list_segments()
            .await?
            .into_iter()
            .map(|s| (s.id, s.text))
            .collect();

        Ok(redeemed
            .into_iter()
            .map(|ticket| {
                let prize = prizes
                    .get(&ticket.segment_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_PRIZE.to_string());
                WinnerResponse {
                    ticket: ticket.into(),
                    prize,
                }
            })
            .collect())
    }

    async fn require_segment(&self, id: i32) -> AppResult<segments::Model> {
        self.store
            .find_segment(id)
            .await?
            .ok_or_else(|| AppError::ValidationError("Invalid segment ID".to_string()))
    }

    /// 生成 count 个互不相同且未被占用的兑奖码
    async fn generate_unique_codes(
        &self,
        count: usize,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<String>> {
        let mut codes = Vec::with_capacity(count);
        let mut seen = HashSet::with_capacity(count);

        while codes.len() < count {
            let mut generated = None;
            for _ in 0..CODE_GENERATION_ATTEMPTS {
                let code = generate_ticket_code(now);
                if seen.contains(&code) || self.store.find_ticket_by_code(&code).await?.is_some() {
                    continue;
                }
                generated = Some(code);
                break;
            }

            let code = generated.ok_or_else(|| {
                AppError::InternalError("Failed to generate a unique ticket code".to_string())
            })?;
            seen.insert(code.clone());
            codes.push(code);
        }

        Ok(codes)
    }
}

/// 按权重随机选择扇区，权重为 0 的扇区不会被选中
pub fn select_weighted<'a, R: Rng + ?Sized>(
    list: &'a [segments::Model],
    rng: &mut R,
) -> Option<&'a segments::Model> {
    let total: i64 = list.iter().map(|s| i64::from(s.weight.max(0))).sum();
    if total <= 0 {
        return None;
    }

    let pick = rng.gen_range(0..total);
    let mut cumulative = 0i64;
    for segment in list {
        cumulative += i64::from(segment.weight.max(0));
        if pick < cumulative {
            return Some(segment);
        }
    }
    None
}

fn parse_optional_expiry(raw: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_expires_at)
        .transpose()
}
