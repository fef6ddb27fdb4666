use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::model::payroll::{DeductionProfile, PerformanceMetric};
use crate::model::schedule::SchedulePayrollRow;
use crate::pay::compute::{self, PayBreakdown, PayInputs};
use crate::rpc;

#[derive(Serialize, ToSchema)]
pub struct PayrollPreviewResponse {
    #[schema(example = 1)]
    pub schedule_id: u64,
    #[schema(example = "08:00:00")]
    pub total_work_time: String,
    #[schema(example = "02:00:00")]
    pub total_over_time: String,
    #[schema(example = 1)]
    pub total_leave_used: i64,
    #[schema(example = 500.0)]
    pub base_salary: f64,
    #[schema(example = 10.0)]
    pub bonus_rate: f64,
    #[schema(example = 5.0)]
    pub commission_rate: f64,
    #[schema(example = 25.0)]
    pub over_time_rate: f64,
    pub pay: PayBreakdown,
    pub deductions: DeductionProfile,
    pub performance: PerformanceMetric,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollFinalizeResponse {
    #[schema(example = "Payroll processed")]
    pub message: String,
    #[schema(example = 20)]
    pub attendance_records_paid: u64,
    #[schema(example = 2)]
    pub leave_records_paid: u64,
}

/// Payroll preview for one schedule
///
/// Pulls the five payroll inputs concurrently, runs the pay computation and
/// returns the full breakdown. Nothing is written; the preview can be
/// reopened any number of times and always reflects current data.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/{schedule_id}/preview",
    params(
        ("schedule_id" = u64, Path, description = "Employee schedule ID")
    ),
    responses(
        (status = 200, description = "Computed payroll breakdown", body = PayrollPreviewResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn preview_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let schedule_id = path.into_inner();
    let manager_id = auth.user_id;
    let cutoff = Local::now().date_naive();

    // The five inputs land in disjoint fields, so they are fetched with no
    // ordering between them. Each one is fail-open: a failed fetch becomes
    // zeros for that section, not a failed preview.
    let (compensation, work_time, deductions, performance, total_leave_used) = futures::join!(
        rpc::fetch::compensation_details(pool.get_ref(), schedule_id),
        rpc::fetch::total_work_over_time(pool.get_ref(), schedule_id, manager_id),
        rpc::fetch::employee_deductions(pool.get_ref(), schedule_id),
        rpc::fetch::performance_metrics(pool.get_ref(), schedule_id),
        rpc::fetch::leave_days_used(pool.get_ref(), schedule_id, cutoff),
    );

    let pay = compute::compute(&PayInputs {
        base_salary: compensation.base_salary,
        bonus_rate: compensation.bonus_rate,
        commission_rate: compensation.commission_rate,
        over_time_rate: compensation.over_time_rate,
        total_work_time: work_time.total_work_time.clone(),
        total_over_time: work_time.total_over_time.clone(),
        performance_score: performance.performance_score,
        total_leave_used,
        total_deduction: deductions.total_deduction.clone(),
    });

    Ok(HttpResponse::Ok().json(PayrollPreviewResponse {
        schedule_id,
        total_work_time: work_time.total_work_time,
        total_over_time: work_time.total_over_time,
        total_leave_used,
        base_salary: compensation.base_salary,
        bonus_rate: compensation.bonus_rate,
        commission_rate: compensation.commission_rate,
        over_time_rate: compensation.over_time_rate,
        pay,
        deductions,
        performance,
    }))
}

/// Finalize a payroll run
///
/// Marks the schedule's approved attendance and payable leave as paid, as of
/// today. The two updates run one after the other without a shared
/// transaction; if the leave update fails after attendance succeeded the
/// run is partially applied and only the logs say so. Reported counts come
/// from rows actually updated.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/{schedule_id}/finalize",
    params(
        ("schedule_id" = u64, Path, description = "Employee schedule ID")
    ),
    responses(
        (status = 200, description = "Payroll run applied", body = PayrollFinalizeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn finalize_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let schedule_id = path.into_inner();
    let manager_id = auth.user_id;
    let cutoff = Local::now().date_naive();

    let (attendance_ids, leave_ids) = futures::join!(
        rpc::payout::approved_attendance_ids(pool.get_ref(), schedule_id, manager_id),
        rpc::payout::payable_leave_ids(pool.get_ref(), schedule_id, cutoff),
    );

    tracing::info!(
        schedule_id,
        manager_id,
        attendance = attendance_ids.len(),
        leave = leave_ids.len(),
        "Finalizing payroll run"
    );

    // Sequential, not atomic. mark_attendance_paid and apply_leave_payments
    // are both fire-and-forget; failures were already logged inside.
    let attendance_paid = rpc::payout::mark_attendance_paid(pool.get_ref(), &attendance_ids).await;
    let leave_paid = rpc::payout::apply_leave_payments(pool.get_ref(), schedule_id, cutoff).await;

    Ok(HttpResponse::Ok().json(PayrollFinalizeResponse {
        message: "Payroll processed".to_string(),
        attendance_records_paid: attendance_paid,
        leave_records_paid: leave_paid,
    }))
}

/// Schedules under a manager, for the payroll review list
#[utoipa::path(
    get,
    path = "/api/v1/payroll/schedules",
    responses(
        (status = 200, description = "Schedules reporting to this manager", body = [SchedulePayrollRow]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payroll_schedules(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let rows = sqlx::query_as::<_, SchedulePayrollRow>(
        r#"
        SELECT
            s.id AS schedule_id,
            e.id AS employee_id,
            e.name AS employee_name,
            e.position,
            e.department,
            s.shift_start_time,
            s.shift_end_time,
            s.base_salary,
            s.bonus_rate,
            s.commission_rate,
            s.over_time_rate
        FROM employee_schedules s
        JOIN employees e ON e.id = s.employee_id
        WHERE e.manager_id = ?
        ORDER BY e.name
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, manager_id = auth.user_id, "Failed to list payroll schedules");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}
