//! Initial schema: companies, users and the per-period metric tables

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Clone, Copy)]
enum ValueKind {
    Int,
    Float,
}

use ValueKind::{Float, Int};

/// Monthly tables, keyed by (year, month, company_id)
const MONTHLY_TABLES: &[(&str, &[(&str, ValueKind)])] = &[
    ("headcount", &[("male", Int), ("female", Int)]),
    ("employee_status", &[("permanent", Int), ("contract", Int)]),
    (
        "education",
        &[
            ("high_school", Int),
            ("diploma", Int),
            ("bachelor", Int),
            ("master", Int),
            ("doctorate", Int),
        ],
    ),
    (
        "age_group",
        &[
            ("under_25", Int),
            ("age_25_34", Int),
            ("age_35_44", Int),
            ("age_45_54", Int),
            ("over_55", Int),
        ],
    ),
    (
        "turnover",
        &[
            ("headcount_start", Int),
            ("headcount_end", Int),
            ("resignations", Int),
            ("terminations", Int),
        ],
    ),
    (
        "productivity",
        &[("revenue", Float), ("net_profit", Float), ("employees", Int)],
    ),
    ("employee_cost", &[("employee_cost", Float), ("revenue", Float)]),
    ("engagement", &[("score", Float), ("respondents", Int)]),
];

/// Yearly tables, keyed by (year, company_id)
const YEARLY_TABLES: &[(&str, &[(&str, ValueKind)])] = &[
    ("hcma_scores", &[("score", Float)]),
    ("org_structure_scores", &[("score", Float)]),
    ("org_health_scores", &[("score", Float)]),
    ("culture_maturity_scores", &[("score", Float)]),
    ("formation_ratios", &[("planned", Int), ("filled", Int)]),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // 1. Companies
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(pk_auto(Company::Id))
                    .col(string_len(Company::Name, 255).not_null().unique_key())
                    .col(string_len(Company::CompanyType, 16).not_null())
                    .col(
                        timestamp_with_time_zone(Company::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 2. Users
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Email, 255).not_null().unique_key())
                    .col(string_len(User::PasswordHash, 255).not_null())
                    .col(string_len_null(User::FullName, 255))
                    .col(string_len(User::Role, 32).not_null().default("USER"))
                    .col(integer(User::CompanyId).not_null())
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(User::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_company_id")
                            .from(User::Table, User::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_company_id")
                    .table(User::Table)
                    .col(User::CompanyId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 3. Metric tables
        // ============================================================
        for (table, values) in MONTHLY_TABLES {
            manager
                .create_table(metric_table(table, true, values))
                .await?;
            manager
                .create_index(period_index(table, true))
                .await?;
        }

        for (table, values) in YEARLY_TABLES {
            manager
                .create_table(metric_table(table, false, values))
                .await?;
            manager
                .create_index(period_index(table, false))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, _) in MONTHLY_TABLES.iter().chain(YEARLY_TABLES) {
            manager
                .drop_table(Table::drop().table(Alias::new(*table)).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Company::Table).to_owned())
            .await?;

        Ok(())
    }
}

fn metric_table(table: &str, monthly: bool, values: &[(&str, ValueKind)]) -> TableCreateStatement {
    let mut stmt = Table::create();
    stmt.table(Alias::new(table))
        .if_not_exists()
        .col(pk_auto(Alias::new("id")))
        .col(integer(Alias::new("year")).not_null());

    if monthly {
        stmt.col(integer(Alias::new("month")).not_null());
    }

    stmt.col(integer(Alias::new("company_id")).not_null());

    for (name, kind) in values {
        match kind {
            ValueKind::Int => stmt.col(integer(Alias::new(*name)).not_null().default(0)),
            ValueKind::Float => stmt.col(double(Alias::new(*name)).not_null().default(0.0)),
        };
    }

    stmt.col(
        timestamp_with_time_zone(Alias::new("updated_at"))
            .not_null()
            .default(Expr::current_timestamp()),
    )
    .foreign_key(
        ForeignKey::create()
            .name(format!("fk_{}_company_id", table))
            .from(Alias::new(table), Alias::new("company_id"))
            .to(Company::Table, Company::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .on_update(ForeignKeyAction::Cascade),
    )
    .to_owned()
}

/// Unique index backing the upsert key
fn period_index(table: &str, monthly: bool) -> IndexCreateStatement {
    let mut index = Index::create();
    index
        .if_not_exists()
        .name(format!("idx_{}_period", table))
        .table(Alias::new(table))
        .col(Alias::new("year"));

    if monthly {
        index.col(Alias::new("month"));
    }

    index.col(Alias::new("company_id")).unique().to_owned()
}

// ============================================================
// Table identifiers
// ============================================================

#[derive(DeriveIden)]
pub(super) enum Company {
    #[sea_orm(iden = "companies")]
    Table,
    Id,
    Name,
    CompanyType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    Role,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}
