//! Monthly headcount split by age band

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "age_group")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub year: i32,

    /// Calendar month, 1-12
    pub month: i32,

    pub company_id: i32,

    #[serde(rename = "under_25")]
    pub under_25: i32,
    #[serde(rename = "age_25_34")]
    pub age_25_34: i32,
    #[serde(rename = "age_35_44")]
    pub age_35_44: i32,
    #[serde(rename = "age_45_54")]
    pub age_45_54: i32,
    #[serde(rename = "over_55")]
    pub over_55: i32,

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
