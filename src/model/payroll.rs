use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Compensation terms attached to an employee schedule. `base_salary` is an
/// hourly rate; the rates are percentages of it, never of worked hours.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CompensationProfile {
    #[schema(example = 500.0)]
    pub base_salary: f64,
    #[schema(example = 10.0)]
    pub bonus_rate: f64,
    #[schema(example = 5.0)]
    pub commission_rate: f64,
    #[schema(example = 25.0)]
    pub over_time_rate: f64,
}

/// Accumulated approved-but-unpaid time for a schedule, formatted the way
/// the database reports TIME sums.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WorkTimeSummary {
    #[schema(example = "08:00:00")]
    pub total_work_time: String,
    #[schema(example = "02:00:00")]
    pub total_over_time: String,
}

impl Default for WorkTimeSummary {
    fn default() -> Self {
        Self {
            total_work_time: "0:00".to_string(),
            total_over_time: "0:00".to_string(),
        }
    }
}

/// Flat deduction lines for a schedule. Amounts are decimal strings; "0"
/// doubles as the hide-this-line sentinel in clients, so absent rows and
/// NULL columns both come back as the literal "0".
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct DeductionProfile {
    pub taxes_name: String,
    #[schema(example = "150.00")]
    pub taxes_amount: String,
    pub health_insurance_name: String,
    pub health_insurance_amount: String,
    pub social_security_amount: String,
    pub retirement_amount: String,
    pub additional_benefits_amount: String,
    pub voluntary_deduction_amount: String,
    pub voluntary_deduction_description: String,
    pub outstanding_loans_original: String,
    pub outstanding_loans_principal_repaid: String,
    pub outstanding_loans_interest_rate: String,
    pub advances_amount: String,
    #[schema(example = "300.00")]
    pub total_deduction: String,
}

impl Default for DeductionProfile {
    fn default() -> Self {
        let zero = || "0".to_string();
        Self {
            taxes_name: String::new(),
            taxes_amount: zero(),
            health_insurance_name: String::new(),
            health_insurance_amount: zero(),
            social_security_amount: zero(),
            retirement_amount: zero(),
            additional_benefits_amount: zero(),
            voluntary_deduction_amount: zero(),
            voluntary_deduction_description: String::new(),
            outstanding_loans_original: zero(),
            outstanding_loans_principal_repaid: zero(),
            outstanding_loans_interest_rate: zero(),
            advances_amount: zero(),
            total_deduction: zero(),
        }
    }
}

/// Latest performance review for a schedule. The score feeds the pay
/// computation; the text fields are carried through for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PerformanceMetric {
    #[schema(example = "SQL, forklift certified")]
    pub skills: String,
    #[schema(example = 80.0)]
    pub performance_score: f64,
    pub performance_feedback: String,
    pub goals: String,
}
