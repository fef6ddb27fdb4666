use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An employee's shift/compensation schedule. Every payroll lookup keys on
/// the schedule id, not the employee id.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeSchedule {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "08:00:00", value_type = String, format = "time")]
    pub shift_start_time: NaiveTime,
    #[schema(example = "17:00:00", value_type = String, format = "time")]
    pub shift_end_time: NaiveTime,
    #[schema(example = 500.0)]
    pub base_salary: f64,
    #[schema(example = 10.0)]
    pub bonus_rate: f64,
    #[schema(example = 5.0)]
    pub commission_rate: f64,
    #[schema(example = 25.0)]
    pub over_time_rate: f64,
}

/// One row of the manager's payroll review list: who the schedule belongs
/// to, joined with the terms needed to open a payroll preview.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SchedulePayrollRow {
    #[schema(example = 1)]
    pub schedule_id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "Maria Santos")]
    pub employee_name: String,
    #[schema(example = "Warehouse Associate")]
    pub position: String,
    #[schema(example = "Logistics")]
    pub department: String,
    #[schema(example = "08:00:00", value_type = String, format = "time")]
    pub shift_start_time: NaiveTime,
    #[schema(example = "17:00:00", value_type = String, format = "time")]
    pub shift_end_time: NaiveTime,
    #[schema(example = 500.0)]
    pub base_salary: f64,
    #[schema(example = 10.0)]
    pub bonus_rate: f64,
    #[schema(example = 5.0)]
    pub commission_rate: f64,
    #[schema(example = 25.0)]
    pub over_time_rate: f64,
}
