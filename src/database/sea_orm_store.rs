use crate::database::store::*;
use crate::entities::{
    setting_entity as settings, ticket_entity as tickets, user_entity as users,
    wheel_segment_entity as segments,
};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};

/// 关系数据库实现 (PostgreSQL / SQLite)
#[derive(Clone)]
pub struct SeaOrmStore {
    pool: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

/// 唯一索引冲突转为业务校验错误，其余保持数据库错误
fn map_unique_violation(err: DbErr, what: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::ValidationError(format!("{what} already exists"))
        }
        _ => AppError::DatabaseError(err),
    }
}

#[async_trait]
impl WheelStore for SeaOrmStore {
    async fn ping(&self) -> AppResult<()> {
        self.pool.execute_unprepared("SELECT 1").await?;
        Ok(())
    }

    async fn find_user(&self, id: i32) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find_by_id(id).one(&self.pool).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.pool)
            .await?)
    }

    async fn create_user(&self, user: NewUser) -> AppResult<users::Model> {
        users::ActiveModel {
            username: Set(user.username),
            password: Set(user.password_hash),
            is_admin: Set(user.is_admin),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Username"))
    }

    async fn update_user_password(
        &self,
        id: i32,
        password_hash: String,
    ) -> AppResult<Option<users::Model>> {
        let Some(user) = users::Entity::find_by_id(id).one(&self.pool).await? else {
            return Ok(None);
        };
        let mut am = user.into_active_model();
        am.password = Set(password_hash);
        Ok(Some(am.update(&self.pool).await?))
    }

    async fn list_segments(&self) -> AppResult<Vec<segments::Model>> {
        Ok(segments::Entity::find()
            .order_by_asc(segments::Column::Position)
            .order_by_asc(segments::Column::Id)
            .all(&self.pool)
            .await?)
    }

    async fn find_segment(&self, id: i32) -> AppResult<Option<segments::Model>> {
        Ok(segments::Entity::find_by_id(id).one(&self.pool).await?)
    }

    async fn count_segments(&self) -> AppResult<u64> {
        Ok(segments::Entity::find().count(&self.pool).await?)
    }

    async fn create_segment(&self, segment: NewSegment) -> AppResult<segments::Model> {
        Ok(segments::ActiveModel {
            text: Set(segment.text),
            color: Set(segment.color),
            position: Set(segment.position),
            weight: Set(segment.weight),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?)
    }

    async fn update_segment(
        &self,
        id: i32,
        changes: SegmentChanges,
    ) -> AppResult<Option<segments::Model>> {
        let Some(segment) = segments::Entity::find_by_id(id).one(&self.pool).await? else {
            return Ok(None);
        };
        let mut am = segment.into_active_model();
        if let Some(text) = changes.text {
            am.text = Set(text);
        }
        if let Some(color) = changes.color {
            am.color = Set(color);
        }
        if let Some(position) = changes.position {
            am.position = Set(position);
        }
        if let Some(weight) = changes.weight {
            am.weight = Set(weight);
        }
        Ok(Some(am.update(&self.pool).await?))
    }

    async fn delete_segment(&self, id: i32) -> AppResult<bool> {
        let result = segments::Entity::delete_by_id(id).exec(&self.pool).await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_segment_keeping(
        &self,
        id: i32,
        min_remaining: u64,
    ) -> AppResult<SegmentDeletion> {
        let txn = self.pool.begin().await?;

        // FOR UPDATE 锁住全部扇区行，并发删除依次计数 (SQLite 写事务本身串行)
        let ids: Vec<i32> = segments::Entity::find()
            .lock_exclusive()
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();

        let outcome = if !ids.contains(&id) {
            SegmentDeletion::NotFound
        } else if (ids.len() as u64).saturating_sub(1) < min_remaining {
            SegmentDeletion::BelowMinimum
        } else {
            segments::Entity::delete_by_id(id).exec(&txn).await?;
            SegmentDeletion::Deleted
        };

        txn.commit().await?;
        Ok(outcome)
    }

    async fn list_tickets(&self) -> AppResult<Vec<tickets::Model>> {
        Ok(tickets::Entity::find()
            .order_by_desc(tickets::Column::CreatedAt)
            .order_by_desc(tickets::Column::Id)
            .all(&self.pool)
            .await?)
    }

    async fn find_ticket(&self, id: i32) -> AppResult<Option<tickets::Model>> {
        Ok(tickets::Entity::find_by_id(id).one(&self.pool).await?)
    }

    async fn find_ticket_by_code(&self, code: &str) -> AppResult<Option<tickets::Model>> {
        Ok(tickets::Entity::find()
            .filter(tickets::Column::Code.eq(code))
            .one(&self.pool)
            .await?)
    }

    async fn create_tickets(&self, new_tickets: Vec<NewTicket>) -> AppResult<Vec<tickets::Model>> {
        let txn = self.pool.begin().await?;

        let mut created = Vec::with_capacity(new_tickets.len());
        for ticket in new_tickets {
            let inserted = tickets::ActiveModel {
                code: Set(ticket.code),
                segment_id: Set(ticket.segment_id),
                used: Set(false),
                ip_address: Set(None),
                created_at: Set(ticket.created_at),
                used_at: Set(None),
                expires_at: Set(ticket.expires_at),
                ..Default::default()
            }
            .insert(&txn)
            .await;

            match inserted {
                Ok(model) => created.push(model),
                Err(e) => {
                    txn.rollback().await?;
                    return Err(map_unique_violation(e, "Ticket code"));
                }
            }
        }

        txn.commit().await?;
        Ok(created)
    }

    async fn redeem_ticket(
        &self,
        id: i32,
        redemption: Redemption,
    ) -> AppResult<Option<tickets::Model>> {
        // 条件更新 (where used = false)，受影响行数即为是否抢到
        let result = tickets::Entity::update_many()
            .col_expr(tickets::Column::Used, Expr::value(true))
            .col_expr(tickets::Column::UsedAt, Expr::value(redemption.used_at))
            .col_expr(
                tickets::Column::IpAddress,
                Expr::value(redemption.ip_address),
            )
            .filter(tickets::Column::Id.eq(id))
            .filter(tickets::Column::Used.eq(false))
            .exec(&self.pool)
            .await?;

        if result.rows_affected != 1 {
            return Ok(None);
        }

        match tickets::Entity::find_by_id(id).one(&self.pool).await? {
            Some(ticket) => Ok(Some(ticket)),
            None => Err(AppError::InternalError(
                "Ticket disappeared after successful redemption".into(),
            )),
        }
    }

    async fn list_redeemed_tickets(&self) -> AppResult<Vec<tickets::Model>> {
        Ok(tickets::Entity::find()
            .filter(tickets::Column::Used.eq(true))
            .order_by_desc(tickets::Column::UsedAt)
            .order_by_desc(tickets::Column::Id)
            .all(&self.pool)
            .await?)
    }

    async fn list_settings(&self) -> AppResult<Vec<settings::Model>> {
        Ok(settings::Entity::find()
            .order_by_asc(settings::Column::Key)
            .all(&self.pool)
            .await?)
    }

    async fn find_setting(&self, key: &str) -> AppResult<Option<settings::Model>> {
        Ok(settings::Entity::find()
            .filter(settings::Column::Key.eq(key))
            .one(&self.pool)
            .await?)
    }

    async fn upsert_setting(&self, key: &str, value: &str) -> AppResult<settings::Model> {
        // INSERT ... ON CONFLICT (key) DO UPDATE，避免先查后插的竞争
        settings::Entity::insert(settings::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(settings::Column::Key)
                .update_column(settings::Column::Value)
                .to_owned(),
        )
        .exec_without_returning(&self.pool)
        .await?;

        settings::Entity::find()
            .filter(settings::Column::Key.eq(key))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Setting {key} missing after upsert")))
    }
}
