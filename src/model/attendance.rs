use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Review state of an attendance record. Only approved records ever become
/// payable; paid is tracked separately so a record is never paid twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub employee_schedule_id: u64,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "08:01:12", value_type = String, format = "time", nullable = true)]
    pub clock_in: Option<NaiveTime>,
    #[schema(example = "17:15:03", value_type = String, format = "time", nullable = true)]
    pub clock_out: Option<NaiveTime>,
    #[schema(example = "approved")]
    pub status: String,
    #[schema(example = false)]
    pub paid: bool,
}
