//! Quarterly KPI line items

use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000001_init_schema::Company;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Kpi::Table)
                    .if_not_exists()
                    .col(pk_auto(Kpi::Id))
                    .col(integer(Kpi::Year).not_null())
                    .col(integer(Kpi::Quarter).not_null())
                    .col(integer(Kpi::CompanyId).not_null())
                    .col(string_len(Kpi::Name, 255).not_null())
                    .col(double(Kpi::Weight).not_null().default(0.0))
                    .col(double(Kpi::AchievementScore).not_null().default(0.0))
                    .col(
                        timestamp_with_time_zone(Kpi::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kpis_company_id")
                            .from(Kpi::Table, Kpi::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_kpis_period_name")
                    .table(Kpi::Table)
                    .col(Kpi::Year)
                    .col(Kpi::Quarter)
                    .col(Kpi::CompanyId)
                    .col(Kpi::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Kpi::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Kpi {
    #[sea_orm(iden = "kpis")]
    Table,
    Id,
    Year,
    Quarter,
    CompanyId,
    Name,
    Weight,
    AchievementScore,
    UpdatedAt,
}
