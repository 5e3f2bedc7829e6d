//! Company entity; every user and metric row belongs to one

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of company in the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CompanyType {
    /// Parent holding company
    #[sea_orm(string_value = "Holding")]
    Holding,

    /// Subsidiary (anak perusahaan)
    #[sea_orm(string_value = "Anper")]
    Anper,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Company name (unique)
    #[sea_orm(unique)]
    pub name: String,

    #[serde(rename = "type")]
    pub company_type: CompanyType,

    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
