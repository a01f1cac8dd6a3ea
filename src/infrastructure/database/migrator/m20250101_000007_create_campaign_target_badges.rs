//! Create campaign_target_badges link table

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_badges::Badges;
use super::m20250101_000006_create_campaigns::Campaigns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignTargetBadges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CampaignTargetBadges::CampaignId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CampaignTargetBadges::BadgeId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CampaignTargetBadges::CampaignId)
                            .col(CampaignTargetBadges::BadgeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_target_badges_campaign")
                            .from(
                                CampaignTargetBadges::Table,
                                CampaignTargetBadges::CampaignId,
                            )
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_target_badges_badge")
                            .from(CampaignTargetBadges::Table, CampaignTargetBadges::BadgeId)
                            .to(Badges::Table, Badges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CampaignTargetBadges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CampaignTargetBadges {
    Table,
    CampaignId,
    BadgeId,
}
