use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use hcdash_db::entities::{company, kpi, user};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Fields rejected by input validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

/// One rejected input field
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Auth
// ============================================================================

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    /// Sees and manages every company
    #[serde(rename = "SUPER_ADMIN")]
    SuperAdmin,
    /// Restricted to their own company
    #[serde(rename = "USER")]
    User,
}

impl From<user::UserRole> for UserRole {
    fn from(role: user::UserRole) -> Self {
        match role {
            user::UserRole::SuperAdmin => UserRole::SuperAdmin,
            user::UserRole::User => UserRole::User,
        }
    }
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub company_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            role: model.role.into(),
            company_id: model.company_id,
            created_at: model.created_at,
        }
    }
}

/// Signup request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    /// At least 8 characters
    pub password: String,
    pub full_name: Option<String>,
    /// Company the new user belongs to
    pub company_id: i32,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by signup and login; the session itself travels in the cookie
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: User,
}

// ============================================================================
// Companies
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CompanyType {
    Holding,
    Anper,
}

impl From<company::CompanyType> for CompanyType {
    fn from(value: company::CompanyType) -> Self {
        match value {
            company::CompanyType::Holding => CompanyType::Holding,
            company::CompanyType::Anper => CompanyType::Anper,
        }
    }
}

impl From<CompanyType> for company::CompanyType {
    fn from(value: CompanyType) -> Self {
        match value {
            CompanyType::Holding => company::CompanyType::Holding,
            CompanyType::Anper => company::CompanyType::Anper,
        }
    }
}

/// Company as listed in filters
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanySummary {
    pub id: i32,
    pub name: String,
}

/// Company as managed by super-admins
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
    pub created_at: DateTime<Utc>,
}

impl From<company::Model> for Company {
    fn from(model: company::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            company_type: model.company_type.into(),
            created_at: model.created_at,
        }
    }
}

/// Create or update a company
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

// ============================================================================
// Metric input
// ============================================================================

/// Flat metric submission.
///
/// Carries `year`, `month` (monthly tables only), an optional `companyId`
/// and the metric's value fields. Values may be numbers or numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MetricPayload {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

/// Result of a metric write
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedMetric {
    pub message: String,
    #[schema(value_type = Object)]
    pub data: Value,
}

/// One KPI line item for a quarter
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiInput {
    #[schema(value_type = i32)]
    pub year: Value,
    /// 1-4
    #[schema(value_type = i32)]
    pub quarter: Value,
    pub company_id: Option<i32>,
    pub name: String,
    #[schema(value_type = f64)]
    pub weight: Value,
    #[schema(value_type = f64)]
    pub achievement_score: Value,
}

/// Workforce composition of one company for one month, stored atomically
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkforceInput {
    #[schema(value_type = i32)]
    pub year: Value,
    #[schema(value_type = i32)]
    pub month: Value,
    pub company_id: Option<i32>,
    #[schema(value_type = Object)]
    pub headcount: Map<String, Value>,
    #[schema(value_type = Object)]
    pub employee_status: Map<String, Value>,
    #[schema(value_type = Object)]
    pub education: Map<String, Value>,
    #[schema(value_type = Object)]
    pub age_group: Map<String, Value>,
}

/// Stored KPI with its capped contribution
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub id: i32,
    pub year: i32,
    pub quarter: i32,
    pub company_id: i32,
    pub name: String,
    pub weight: f64,
    pub achievement_score: f64,
    /// `weight * min(achievementScore, 1.10)`
    pub contribution: f64,
}

impl From<kpi::Model> for Kpi {
    fn from(model: kpi::Model) -> Self {
        Self {
            contribution: hcdash_metrics::kpi_contribution(model.weight, model.achievement_score),
            id: model.id,
            year: model.year,
            quarter: model.quarter,
            company_id: model.company_id,
            name: model.name,
            weight: model.weight,
            achievement_score: model.achievement_score,
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Period key of a data-center read
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PeriodQuery {
    pub year: Option<i32>,
    pub month: Option<i32>,
}

/// Period selector of a chart
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ChartQuery {
    /// monthly, quarterly, semesterly or yearly
    #[serde(rename = "type")]
    pub period_type: Option<String>,
    pub year: Option<i32>,
    /// Month, quarter or semester number. Ignored for yearly.
    pub value: Option<i32>,
}

// ============================================================================
// Charts
// ============================================================================

/// Period a chart was computed for
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PeriodInfo {
    #[serde(rename = "type")]
    pub period_type: String,
    pub value: i32,
    pub year: i32,
    pub months: Vec<u32>,
}

/// One named line or bar group
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Chart-ready shape shared by all monthly charts.
///
/// Time charts label each month of the period; composition charts label
/// each category and carry a single series. An empty period is still
/// answered with this shape, zero-filled, and `hasData: false`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse {
    pub chart: String,
    pub period: PeriodInfo,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub totals: BTreeMap<String, f64>,
    /// Ratios derived from the totals; `null` when the denominator is zero
    pub derived: BTreeMap<String, Option<f64>>,
    /// Qualitative bands for score-like values
    pub bands: BTreeMap<String, String>,
    pub has_data: bool,
}

/// A score with its qualitative band
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreCard {
    pub score: f64,
    pub band: String,
}

impl ScoreCard {
    pub fn new(score: f64, scale: hcdash_metrics::ScoreScale) -> Self {
        Self {
            score,
            band: hcdash_metrics::classify(score, scale).label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormationCard {
    pub planned: i64,
    pub filled: i64,
    /// filled / planned in percent
    pub ratio: Option<f64>,
}

/// Yearly organisation scores
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoresChart {
    pub year: i32,
    pub hcma: Option<ScoreCard>,
    pub org_structure: Option<ScoreCard>,
    pub org_health: Option<ScoreCard>,
    pub culture_maturity: Option<ScoreCard>,
    pub formation_ratio: Option<FormationCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KpiQuarter {
    pub quarter: i32,
    /// Sum of capped contributions, in percent
    pub score: f64,
    pub band: String,
    pub items: Vec<Kpi>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KpiChart {
    pub year: i32,
    pub quarters: Vec<KpiQuarter>,
}

/// Summary cards for one month
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub year: i32,
    pub month: i32,
    pub total_headcount: i64,
    pub male: i64,
    pub female: i64,
    pub permanent: i64,
    pub contract: i64,
    pub turnover_rate: Option<f64>,
    pub employee_cost_ratio: Option<f64>,
    pub revenue_per_employee: Option<f64>,
    pub net_profit_per_employee: Option<f64>,
    pub engagement: Option<ScoreCard>,
    pub hcma: Option<ScoreCard>,
    pub has_data: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AvailablePeriod {
    pub year: i32,
    pub month: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailablePeriods {
    pub periods: Vec<AvailablePeriod>,
}

/// Every sheet of an uploaded workbook as row objects keyed by header
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    #[schema(value_type = Object)]
    pub sheets: BTreeMap<String, Vec<Map<String, Value>>>,
}
