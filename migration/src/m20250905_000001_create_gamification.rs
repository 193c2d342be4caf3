use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_tables::{Cohorts, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建徽章表
        manager
            .create_table(
                Table::create()
                    .table(Badges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Badges::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Badges::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Badges::Name).string().not_null())
                    .col(ColumnDef::new(Badges::Description).text().null())
                    .col(ColumnDef::new(Badges::Icon).string().null())
                    .col(ColumnDef::new(Badges::Criterion).string().not_null())
                    .col(ColumnDef::new(Badges::Threshold).big_integer().not_null())
                    .col(ColumnDef::new(Badges::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建用户徽章表
        manager
            .create_table(
                Table::create()
                    .table(UserBadges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserBadges::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserBadges::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserBadges::BadgeId).big_integer().not_null())
                    .col(
                        ColumnDef::new(UserBadges::AwardedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserBadges::Table, UserBadges::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserBadges::Table, UserBadges::BadgeId)
                            .to(Badges::Table, Badges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建积分流水表
        manager
            .create_table(
                Table::create()
                    .table(PointEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PointEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PointEvents::UserId).big_integer().not_null())
                    .col(ColumnDef::new(PointEvents::CohortId).big_integer().null())
                    .col(ColumnDef::new(PointEvents::Source).string().not_null())
                    .col(
                        ColumnDef::new(PointEvents::ReferenceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PointEvents::Points).integer().not_null())
                    .col(
                        ColumnDef::new(PointEvents::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PointEvents::Table, PointEvents::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PointEvents::Table, PointEvents::CohortId)
                            .to(Cohorts::Table, Cohorts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_user_badges_user_badge")
                    .table(UserBadges::Table)
                    .col(UserBadges::UserId)
                    .col(UserBadges::BadgeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 同一事件只记一次分
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_point_events_user_source_ref")
                    .table(PointEvents::Table)
                    .col(PointEvents::UserId)
                    .col(PointEvents::Source)
                    .col(PointEvents::ReferenceId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_point_events_user_id")
                    .table(PointEvents::Table)
                    .col(PointEvents::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PointEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserBadges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Badges::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Badges {
    Table,
    Id,
    Code,
    Name,
    Description,
    Icon,
    Criterion,
    Threshold,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserBadges {
    Table,
    Id,
    UserId,
    BadgeId,
    AwardedAt,
}

#[derive(DeriveIden)]
enum PointEvents {
    Table,
    Id,
    UserId,
    CohortId,
    Source,
    ReferenceId,
    Points,
    CreatedAt,
}
