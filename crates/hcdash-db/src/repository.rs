//! Queries and writes used by the API
//!
//! Handlers never build sea-orm queries themselves; everything goes through
//! the functions here so that keys, scoping and transactions stay in one
//! place.

use std::collections::BTreeSet;

use chrono::Utc;
use hcdash_metrics::{CoercedRecord, InvalidField};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::entities::{
    age_group, company, education, employee_cost, employee_status, headcount, kpi, productivity,
    turnover, user,
};
use crate::metric::{CompanyScope, MetricTable, PeriodKey};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid field: {0}")]
    InvalidField(#[from] InvalidField),
}

pub type RepoResult<T> = Result<T, RepoError>;

// ============================================================================
// Metric tables
// ============================================================================

/// Insert or overwrite the row for `key`, returning what is stored afterwards.
///
/// The write is a single `INSERT .. ON CONFLICT (key) DO UPDATE`, so two
/// concurrent posts for the same key still leave exactly one row.
pub async fn upsert_metric<E, C>(
    db: &C,
    key: &PeriodKey,
    record: &CoercedRecord,
) -> RepoResult<E::Model>
where
    E: MetricTable,
    E::Model: IntoActiveModel<E::Active>,
    C: ConnectionTrait,
{
    let active = E::new_active(key, record)?;

    E::insert(active)
        .on_conflict(
            OnConflict::columns(E::key_columns())
                .update_columns(E::value_columns())
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    debug!("Upserted {} row for {:?}", E::NAME, key);

    E::find()
        .filter(E::key_condition(key))
        .one(db)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("{} row for {:?} not found", E::NAME, key)))
}

/// The row stored for exactly `key`, if any
pub async fn find_metric<E, C>(db: &C, key: &PeriodKey) -> RepoResult<Option<E::Model>>
where
    E: MetricTable,
    C: ConnectionTrait,
{
    Ok(E::find().filter(E::key_condition(key)).one(db).await?)
}

/// All rows of `year` within `months` visible in `scope`, oldest month first
pub async fn find_metric_rows<E, C>(
    db: &C,
    scope: CompanyScope,
    year: i32,
    months: &[u32],
) -> RepoResult<Vec<E::Model>>
where
    E: MetricTable,
    C: ConnectionTrait,
{
    let mut query = E::find().filter(E::period_condition(scope, year, months));
    if let Some(month) = E::month_column() {
        query = query.order_by_asc(month);
    }
    Ok(query.order_by_asc(E::company_column()).all(db).await?)
}

async fn periods_of<E, C>(db: &C, scope: CompanyScope) -> RepoResult<BTreeSet<(i32, i32)>>
where
    E: MetricTable,
    C: ConnectionTrait,
{
    let Some(month) = E::month_column() else {
        return Ok(BTreeSet::new());
    };

    let rows: Vec<(i32, i32)> = E::find()
        .select_only()
        .column(E::year_column())
        .column(month)
        .filter(scope.condition(E::company_column()))
        .distinct()
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows.into_iter().collect())
}

/// `(year, month)` pairs that have data in every core monthly table
pub async fn available_periods<C: ConnectionTrait>(
    db: &C,
    scope: CompanyScope,
) -> RepoResult<Vec<(i32, i32)>> {
    let sets = [
        periods_of::<headcount::Entity, _>(db, scope).await?,
        periods_of::<turnover::Entity, _>(db, scope).await?,
        periods_of::<productivity::Entity, _>(db, scope).await?,
        periods_of::<employee_cost::Entity, _>(db, scope).await?,
    ];

    let mut iter = sets.into_iter();
    let first = iter.next().unwrap_or_default();
    let common = iter.fold(first, |acc, set| acc.intersection(&set).copied().collect());

    Ok(common.into_iter().collect())
}

/// Validated input for the four workforce-composition tables of one month
#[derive(Debug, Clone)]
pub struct WorkforceRecords {
    pub headcount: CoercedRecord,
    pub employee_status: CoercedRecord,
    pub education: CoercedRecord,
    pub age_group: CoercedRecord,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkforceRows {
    pub headcount: headcount::Model,
    pub employee_status: employee_status::Model,
    pub education: education::Model,
    pub age_group: age_group::Model,
}

/// Upsert all four workforce tables in one transaction.
///
/// If any write fails the transaction is dropped without commit and none of
/// the rows change.
pub async fn ingest_workforce(
    db: &DatabaseConnection,
    key: &PeriodKey,
    records: &WorkforceRecords,
) -> RepoResult<WorkforceRows> {
    let txn = db.begin().await?;

    let headcount = upsert_metric::<headcount::Entity, _>(&txn, key, &records.headcount).await?;
    let employee_status =
        upsert_metric::<employee_status::Entity, _>(&txn, key, &records.employee_status).await?;
    let education = upsert_metric::<education::Entity, _>(&txn, key, &records.education).await?;
    let age_group = upsert_metric::<age_group::Entity, _>(&txn, key, &records.age_group).await?;

    txn.commit().await?;

    info!("Ingested workforce data for {:?}", key);

    Ok(WorkforceRows {
        headcount,
        employee_status,
        education,
        age_group,
    })
}

// ============================================================================
// KPIs
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct KpiEntry {
    pub year: i32,
    pub quarter: i32,
    pub company_id: i32,
    pub name: String,
    pub weight: f64,
    pub achievement_score: f64,
}

pub async fn upsert_kpi<C: ConnectionTrait>(db: &C, entry: &KpiEntry) -> RepoResult<kpi::Model> {
    let active = kpi::ActiveModel {
        year: Set(entry.year),
        quarter: Set(entry.quarter),
        company_id: Set(entry.company_id),
        name: Set(entry.name.clone()),
        weight: Set(entry.weight),
        achievement_score: Set(entry.achievement_score),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };

    kpi::Entity::insert(active)
        .on_conflict(
            OnConflict::columns([
                kpi::Column::Year,
                kpi::Column::Quarter,
                kpi::Column::CompanyId,
                kpi::Column::Name,
            ])
            .update_columns([
                kpi::Column::Weight,
                kpi::Column::AchievementScore,
                kpi::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    kpi::Entity::find()
        .filter(kpi::Column::Year.eq(entry.year))
        .filter(kpi::Column::Quarter.eq(entry.quarter))
        .filter(kpi::Column::CompanyId.eq(entry.company_id))
        .filter(kpi::Column::Name.eq(entry.name.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("KPI '{}' not found", entry.name)))
}

/// KPI rows of `year` visible in `scope`, optionally limited to one quarter
pub async fn find_kpis<C: ConnectionTrait>(
    db: &C,
    scope: CompanyScope,
    year: i32,
    quarter: Option<i32>,
) -> RepoResult<Vec<kpi::Model>> {
    let mut query = kpi::Entity::find()
        .filter(kpi::Column::Year.eq(year))
        .filter(scope.condition(kpi::Column::CompanyId));

    if let Some(quarter) = quarter {
        query = query.filter(kpi::Column::Quarter.eq(quarter));
    }

    Ok(query
        .order_by_asc(kpi::Column::Quarter)
        .order_by_asc(kpi::Column::Name)
        .all(db)
        .await?)
}

// ============================================================================
// Companies
// ============================================================================

pub async fn list_companies<C: ConnectionTrait>(
    db: &C,
    scope: CompanyScope,
) -> RepoResult<Vec<company::Model>> {
    Ok(company::Entity::find()
        .filter(scope.condition(company::Column::Id))
        .order_by_asc(company::Column::Name)
        .all(db)
        .await?)
}

pub async fn find_company<C: ConnectionTrait>(db: &C, id: i32) -> RepoResult<Option<company::Model>> {
    Ok(company::Entity::find_by_id(id).one(db).await?)
}

pub async fn find_company_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> RepoResult<Option<company::Model>> {
    Ok(company::Entity::find()
        .filter(company::Column::Name.eq(name))
        .one(db)
        .await?)
}

pub async fn create_company<C: ConnectionTrait>(
    db: &C,
    name: &str,
    company_type: company::CompanyType,
) -> RepoResult<company::Model> {
    if find_company_by_name(db, name).await?.is_some() {
        return Err(RepoError::Conflict(format!(
            "Company '{}' already exists",
            name
        )));
    }

    let created = company::ActiveModel {
        name: Set(name.to_string()),
        company_type: Set(company_type),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created company {} ({})", created.name, created.id);
    Ok(created)
}

pub async fn update_company<C: ConnectionTrait>(
    db: &C,
    id: i32,
    name: &str,
    company_type: company::CompanyType,
) -> RepoResult<company::Model> {
    let existing = find_company(db, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Company {} not found", id)))?;

    if let Some(other) = find_company_by_name(db, name).await? {
        if other.id != id {
            return Err(RepoError::Conflict(format!(
                "Company '{}' already exists",
                name
            )));
        }
    }

    let mut active: company::ActiveModel = existing.into();
    active.name = Set(name.to_string());
    active.company_type = Set(company_type);

    Ok(active.update(db).await?)
}

/// Delete a company that no user belongs to.
///
/// The user count and the delete run in one transaction. Metric rows of the
/// company are removed by the foreign-key cascade.
pub async fn delete_company(db: &DatabaseConnection, id: i32) -> RepoResult<()> {
    let txn = db.begin().await?;

    let existing = find_company(&txn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Company {} not found", id)))?;

    let users = user::Entity::find()
        .filter(user::Column::CompanyId.eq(id))
        .count(&txn)
        .await?;

    if users > 0 {
        return Err(RepoError::Conflict(format!(
            "Company '{}' still has {} user(s)",
            existing.name, users
        )));
    }

    company::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    info!("Deleted company {} ({})", existing.name, id);
    Ok(())
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: user::UserRole,
    pub company_id: i32,
}

pub async fn find_user_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> RepoResult<Option<user::Model>> {
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn find_user<C: ConnectionTrait>(db: &C, id: Uuid) -> RepoResult<Option<user::Model>> {
    Ok(user::Entity::find_by_id(id).one(db).await?)
}

pub async fn create_user<C: ConnectionTrait>(db: &C, new_user: NewUser) -> RepoResult<user::Model> {
    if find_company(db, new_user.company_id).await?.is_none() {
        return Err(RepoError::NotFound(format!(
            "Company {} not found",
            new_user.company_id
        )));
    }

    if find_user_by_email(db, &new_user.email).await?.is_some() {
        return Err(RepoError::Conflict(format!(
            "Email '{}' is already registered",
            new_user.email
        )));
    }

    let now = Utc::now();
    let created = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(new_user.email),
        password_hash: Set(new_user.password_hash),
        full_name: Set(new_user.full_name),
        role: Set(new_user.role),
        company_id: Set(new_user.company_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!("Created user {} ({})", created.email, created.role.as_str());
    Ok(created)
}
