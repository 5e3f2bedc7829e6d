//! Quarterly KPI line items
//!
//! One row per `(year, quarter, company, name)`. The quarter score is the
//! weighted sum of capped achievements, see `hcdash_metrics::aggregate`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kpis")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub year: i32,

    /// Quarter, 1-4
    pub quarter: i32,

    pub company_id: i32,

    /// KPI name, unique within a company quarter
    pub name: String,

    /// Weight of this KPI in the quarter score (fraction, weights sum to 1)
    pub weight: f64,

    /// Achievement against target (1.0 = 100%)
    pub achievement_score: f64,

    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Company,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
