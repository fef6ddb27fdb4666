use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::model::payroll::{CompensationProfile, DeductionProfile, PerformanceMetric, WorkTimeSummary};

/// Compensation terms for a schedule. Missing schedule or query failure
/// yields an all-zero profile.
pub async fn compensation_details(pool: &MySqlPool, schedule_id: u64) -> CompensationProfile {
    let result = sqlx::query_as::<_, CompensationProfile>(
        r#"
        SELECT base_salary, bonus_rate, commission_rate, over_time_rate
        FROM employee_schedules
        WHERE id = ?
        "#,
    )
    .bind(schedule_id)
    .fetch_optional(pool)
    .await;

    match result {
        Ok(Some(profile)) => profile,
        Ok(None) => CompensationProfile::default(),
        Err(e) => {
            tracing::error!(error = %e, schedule_id, "Failed to fetch compensation details");
            CompensationProfile::default()
        }
    }
}

/// Sums approved, unpaid attendance into regular time and overtime for the
/// (schedule, manager) pair. Time inside the shift window counts as regular,
/// the excess as overtime. Both come back as HH:MM:SS strings the way the
/// database formats TIME sums.
pub async fn total_work_over_time(
    pool: &MySqlPool,
    schedule_id: u64,
    manager_id: u64,
) -> WorkTimeSummary {
    let sql = format!(
        r#"
        SELECT
            COALESCE(TIME_FORMAT(SEC_TO_TIME(SUM(
                LEAST(
                    TIME_TO_SEC(TIMEDIFF(a.clock_out, a.clock_in)),
                    TIME_TO_SEC(TIMEDIFF(s.shift_end_time, s.shift_start_time))
                ))), '%H:%i:%s'), '0:00') AS total_work_time,
            COALESCE(TIME_FORMAT(SEC_TO_TIME(SUM(
                GREATEST(
                    TIME_TO_SEC(TIMEDIFF(a.clock_out, a.clock_in))
                    - TIME_TO_SEC(TIMEDIFF(s.shift_end_time, s.shift_start_time)),
                    0
                ))), '%H:%i:%s'), '0:00') AS total_over_time
        FROM attendance a
        JOIN employee_schedules s ON s.id = a.employee_schedule_id
        JOIN employees e ON e.id = s.employee_id
        WHERE a.employee_schedule_id = ?
          AND e.manager_id = ?
          AND {}
        "#,
        crate::rpc::PAYABLE_ATTENDANCE
    );

    let result = sqlx::query_as::<_, WorkTimeSummary>(&sql)
        .bind(schedule_id)
        .bind(manager_id)
        .fetch_optional(pool)
        .await;

    match result {
        Ok(Some(summary)) => summary,
        Ok(None) => WorkTimeSummary::default(),
        Err(e) => {
            tracing::error!(error = %e, schedule_id, manager_id, "Failed to fetch work time totals");
            WorkTimeSummary::default()
        }
    }
}

/// Flat deduction lines for a schedule. Every amount is a decimal string
/// with "0" standing in for NULL and for a missing row; downstream hides
/// any line that reads exactly "0".
pub async fn employee_deductions(pool: &MySqlPool, schedule_id: u64) -> DeductionProfile {
    let result = sqlx::query_as::<_, DeductionProfile>(
        r#"
        SELECT
            COALESCE(taxes_name, '') AS taxes_name,
            COALESCE(CAST(taxes_amount AS CHAR), '0') AS taxes_amount,
            COALESCE(health_insurance_name, '') AS health_insurance_name,
            COALESCE(CAST(health_insurance_amount AS CHAR), '0') AS health_insurance_amount,
            COALESCE(CAST(social_security_amount AS CHAR), '0') AS social_security_amount,
            COALESCE(CAST(retirement_amount AS CHAR), '0') AS retirement_amount,
            COALESCE(CAST(additional_benefits_amount AS CHAR), '0') AS additional_benefits_amount,
            COALESCE(CAST(voluntary_deduction_amount AS CHAR), '0') AS voluntary_deduction_amount,
            COALESCE(voluntary_deduction_description, '') AS voluntary_deduction_description,
            COALESCE(CAST(outstanding_loans_original AS CHAR), '0') AS outstanding_loans_original,
            COALESCE(CAST(outstanding_loans_principal_repaid AS CHAR), '0') AS outstanding_loans_principal_repaid,
            COALESCE(CAST(outstanding_loans_interest_rate AS CHAR), '0') AS outstanding_loans_interest_rate,
            COALESCE(CAST(advances_amount AS CHAR), '0') AS advances_amount,
            COALESCE(CAST(total_deduction AS CHAR), '0') AS total_deduction
        FROM deductions
        WHERE employee_schedule_id = ?
        "#,
    )
    .bind(schedule_id)
    .fetch_optional(pool)
    .await;

    match result {
        Ok(Some(profile)) => profile,
        Ok(None) => DeductionProfile::default(),
        Err(e) => {
            tracing::error!(error = %e, schedule_id, "Failed to fetch deductions");
            DeductionProfile::default()
        }
    }
}

/// Latest performance review for a schedule; all-empty with score 0 when
/// none exists.
pub async fn performance_metrics(pool: &MySqlPool, schedule_id: u64) -> PerformanceMetric {
    let result = sqlx::query_as::<_, PerformanceMetric>(
        r#"
        SELECT
            COALESCE(skills, '') AS skills,
            COALESCE(performance_score, 0) AS performance_score,
            COALESCE(performance_feedback, '') AS performance_feedback,
            COALESCE(goals, '') AS goals
        FROM performance_reviews
        WHERE employee_schedule_id = ?
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(schedule_id)
    .fetch_optional(pool)
    .await;

    match result {
        Ok(Some(metric)) => metric,
        Ok(None) => PerformanceMetric::default(),
        Err(e) => {
            tracing::error!(error = %e, schedule_id, "Failed to fetch performance metrics");
            PerformanceMetric::default()
        }
    }
}

/// Approved payable leave days used as of the cutoff date. Days past the
/// cutoff inside a longer leave are not counted yet.
pub async fn leave_days_used(pool: &MySqlPool, schedule_id: u64, cutoff: NaiveDate) -> i64 {
    let result = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT CAST(COALESCE(SUM(DATEDIFF(LEAST(end_date, ?), start_date) + 1), 0) AS SIGNED)
        FROM leave_requests
        WHERE employee_schedule_id = ?
          AND status = 'approved'
          AND leave_type <> 'unpaid'
          AND start_date <= ?
        "#,
    )
    .bind(cutoff)
    .bind(schedule_id)
    .bind(cutoff)
    .fetch_one(pool)
    .await;

    match result {
        Ok(days) => days,
        Err(e) => {
            tracing::error!(error = %e, schedule_id, "Failed to fetch leave days used");
            0
        }
    }
}
