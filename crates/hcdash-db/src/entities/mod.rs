//! Database entities

pub mod age_group;
pub mod company;
pub mod culture_maturity_score;
pub mod education;
pub mod employee_cost;
pub mod employee_status;
pub mod engagement;
pub mod formation_ratio;
pub mod hcma_score;
pub mod headcount;
pub mod kpi;
pub mod org_health_score;
pub mod org_structure_score;
pub mod productivity;
pub mod turnover;
pub mod user;

pub use company::Entity as Company;
pub use kpi::Entity as Kpi;
pub use user::Entity as User;

pub mod prelude {
    pub use super::age_group::Entity as AgeGroup;
    pub use super::company::Entity as Company;
    pub use super::culture_maturity_score::Entity as CultureMaturityScore;
    pub use super::education::Entity as Education;
    pub use super::employee_cost::Entity as EmployeeCost;
    pub use super::employee_status::Entity as EmployeeStatus;
    pub use super::engagement::Entity as Engagement;
    pub use super::formation_ratio::Entity as FormationRatio;
    pub use super::hcma_score::Entity as HcmaScore;
    pub use super::headcount::Entity as Headcount;
    pub use super::kpi::Entity as Kpi;
    pub use super::org_health_score::Entity as OrgHealthScore;
    pub use super::org_structure_score::Entity as OrgStructureScore;
    pub use super::productivity::Entity as Productivity;
    pub use super::turnover::Entity as Turnover;
    pub use super::user::Entity as User;
}
