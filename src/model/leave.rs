use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRecord {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub employee_schedule_id: u64,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    #[schema(example = "sick")]
    pub leave_type: String,
    #[schema(example = "pending", nullable = true)]
    pub status: Option<String>,
    #[schema(example = false)]
    pub paid: bool,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String, nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn leave_type_round_trips_through_lowercase() {
        assert_eq!(LeaveType::Sick.to_string(), "sick");
        assert_eq!(LeaveType::from_str("annual").unwrap(), LeaveType::Annual);
        assert!(LeaveType::from_str("sabbatical").is_err());
    }
}
