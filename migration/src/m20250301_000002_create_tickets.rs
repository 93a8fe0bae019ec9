use sea_orm_migration::prelude::*;

/// Tickets (一次性兑奖码)
#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    Code,
    SegmentId,
    Used,
    IpAddress,
    CreatedAt,
    UsedAt,
    ExpiresAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// segment_id 不加外键：扇区被删除后历史兑奖记录仍需保留
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tickets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tickets::Code).string_len(64).not_null())
                    .col(ColumnDef::new(Tickets::SegmentId).integer().not_null())
                    .col(
                        ColumnDef::new(Tickets::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Tickets::IpAddress).string_len(64).null())
                    .col(
                        ColumnDef::new(Tickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tickets::UsedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Tickets::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 兑奖码全局唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tickets_code_unique")
                    .table(Tickets::Table)
                    .col(Tickets::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tickets_segment")
                    .table(Tickets::Table)
                    .col(Tickets::SegmentId)
                    .to_owned(),
            )
            .await?;

        // 中奖名单查询 (used = true ORDER BY used_at DESC)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tickets_used_used_at")
                    .table(Tickets::Table)
                    .col(Tickets::Used)
                    .col(Tickets::UsedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await
    }
}
