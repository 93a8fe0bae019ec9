use sea_orm_migration::prelude::*;

/// Wheel Segments (转盘奖品扇区)
#[derive(DeriveIden)]
enum WheelSegments {
    Table,
    Id,
    Text,
    Color,
    Position,
    Weight,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// position 决定扇区在转盘上的角度顺序；weight 为随机分配奖品时的相对权重
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WheelSegments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WheelSegments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WheelSegments::Text).text().not_null())
                    .col(
                        ColumnDef::new(WheelSegments::Color)
                            .string_len(64)
                            .not_null()
                            .default("#F59E0B"),
                    )
                    .col(
                        ColumnDef::new(WheelSegments::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WheelSegments::Weight)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wheel_segments_position")
                    .table(WheelSegments::Table)
                    .col(WheelSegments::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WheelSegments::Table).to_owned())
            .await
    }
}
