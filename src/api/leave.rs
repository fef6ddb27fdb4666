use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::leave::{LeaveRecord, LeaveType};
use crate::rpc;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "sick")]
    pub leave_type: LeaveType,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee schedule
    #[schema(example = 1)]
    pub schedule_id: Option<u64>,
    /// Filter by status
    #[schema(example = "pending")]
    pub status: Option<String>,
    /// Page number, 1-based
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Items per page
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRecord>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct DaysUsedQuery {
    /// Count days up to this date; defaults to today
    #[schema(example = "2026-01-31", format = "date", value_type = String)]
    pub cutoff: Option<NaiveDate>,
}

// Typed bind values for the dynamically assembled filter query.
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

// Requests in these states block overlapping submissions and consume the
// allowance for their leave type.
const ACTIVE_LEAVE_STATES: &str = "status IN ('pending', 'approved')";

/// Inclusive day count of a leave request.
fn days_requested(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// A missing allowance row means the leave type is uncapped.
fn exceeds_allowance(used: i64, requested: i64, max_days: Option<i64>) -> bool {
    match max_days {
        Some(max) => used + requested > max,
        None => false,
    }
}

/// Submit a leave request
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body = CreateLeave,
    responses(
        (status = 200, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted",
            "status": "pending"
        })),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let schedule_id: u64 = auth
        .employee_schedule_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee schedule"))?;

    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    let internal = |e: sqlx::Error| {
        tracing::error!(error = %e, schedule_id, "Leave request validation query failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    };

    // An open or granted request touching the same dates blocks a new one
    let overlap_sql = format!(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM leave_requests
            WHERE employee_schedule_id = ?
              AND {}
              AND start_date <= ?
              AND end_date >= ?
        )
        "#,
        ACTIVE_LEAVE_STATES
    );

    let overlapping = sqlx::query_scalar::<_, bool>(&overlap_sql)
        .bind(schedule_id)
        .bind(payload.end_date)
        .bind(payload.start_date)
        .fetch_one(pool.get_ref())
        .await
        .map_err(internal)?;

    if overlapping {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "You already have a leave request covering these dates"
        })));
    }

    // Days already clocked in cannot be converted into leave
    let has_attendance = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM attendance
            WHERE employee_schedule_id = ?
              AND date BETWEEN ? AND ?
        )
        "#,
    )
    .bind(schedule_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .fetch_one(pool.get_ref())
    .await
    .map_err(internal)?;

    if has_attendance {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "You have attendance records within the requested dates"
        })));
    }

    let max_days = sqlx::query_scalar::<_, i64>(
        "SELECT max_days FROM leave_allowances WHERE leave_type = ?",
    )
    .bind(payload.leave_type.to_string())
    .fetch_optional(pool.get_ref())
    .await
    .map_err(internal)?;

    let used_sql = format!(
        r#"
        SELECT CAST(COALESCE(SUM(DATEDIFF(end_date, start_date) + 1), 0) AS SIGNED)
        FROM leave_requests
        WHERE employee_schedule_id = ?
          AND leave_type = ?
          AND {}
        "#,
        ACTIVE_LEAVE_STATES
    );

    let used = sqlx::query_scalar::<_, i64>(&used_sql)
        .bind(schedule_id)
        .bind(payload.leave_type.to_string())
        .fetch_one(pool.get_ref())
        .await
        .map_err(internal)?;

    let requested = days_requested(payload.start_date, payload.end_date);
    if exceeds_allowance(used, requested, max_days) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Requested days exceed the allowance for this leave type",
            "days_used": used,
            "days_requested": requested,
            "max_days": max_days,
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_schedule_id, start_date, end_date, leave_type, status)
        VALUES (?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(schedule_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.leave_type.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, schedule_id, "Failed to create leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request submitted",
        "status": "pending"
    })))
}

/// Paginated leave list with optional schedule/status filter (manager)
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(schedule_id) = query.schedule_id {
        where_sql.push_str(" AND employee_schedule_id = ?");
        args.push(FilterValue::U64(schedule_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, employee_schedule_id, start_date, end_date, leave_type, status, paid, created_at
        FROM leave_requests
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRecord>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/// Fetch one leave request (manager)
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "Leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, LeaveRecord>(
        r#"
        SELECT id, employee_schedule_id, start_date, end_date, leave_type, status, paid, created_at
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match leave {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        }))),
    }
}

async fn set_leave_status(
    pool: &MySqlPool,
    leave_id: u64,
    from: &str,
    to: &str,
) -> actix_web::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?
        WHERE id = ?
          AND status = ?
        "#,
    )
    .bind(to)
    .bind(leave_id)
    .bind(from)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, to, "Leave status change failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(result.rows_affected() > 0)
}

/// Approve a pending leave request (manager)
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "Leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 400, description = "Leave request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    if set_leave_status(pool.get_ref(), path.into_inner(), "pending", "approved").await? {
        Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Leave approved" })))
    } else {
        Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })))
    }
}

/// Reject a pending leave request (manager)
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "Leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 400, description = "Leave request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    if set_leave_status(pool.get_ref(), path.into_inner(), "pending", "rejected").await? {
        Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Leave rejected" })))
    } else {
        Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })))
    }
}

/// Cancel one's own pending leave request
#[utoipa::path(
    delete,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "Leave request to cancel")
    ),
    responses(
        (status = 200, description = "Leave cancelled", body = Object, example = json!({
            "message": "Leave cancelled"
        })),
        (status = 400, description = "Leave request not found, not yours, or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let schedule_id: u64 = auth
        .employee_schedule_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee schedule"))?;

    let leave_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'cancelled'
        WHERE id = ?
          AND employee_schedule_id = ?
          AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .bind(schedule_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Cancel leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found, not yours, or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Leave cancelled" })))
}

/// Paid leave days used by the caller as of a cutoff date
#[utoipa::path(
    get,
    path = "/api/v1/leave/days-used",
    params(DaysUsedQuery),
    responses(
        (status = 200, description = "Days used", body = Object, example = json!({
            "days_used": 3
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_days_used(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DaysUsedQuery>,
) -> actix_web::Result<impl Responder> {
    let schedule_id: u64 = auth
        .employee_schedule_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee schedule"))?;

    let cutoff = query.cutoff.unwrap_or_else(|| Local::now().date_naive());
    let days_used = rpc::fetch::leave_days_used(pool.get_ref(), schedule_id, cutoff).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "days_used": days_used })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn single_day_leave_counts_as_one_day() {
        assert_eq!(days_requested(date("2026-01-05"), date("2026-01-05")), 1);
    }

    #[test]
    fn day_count_is_inclusive_of_both_ends() {
        assert_eq!(days_requested(date("2026-01-05"), date("2026-01-07")), 3);
    }

    #[test]
    fn uncapped_leave_type_never_exceeds() {
        assert!(!exceeds_allowance(100, 100, None));
    }

    #[test]
    fn request_filling_the_allowance_exactly_is_allowed() {
        assert!(!exceeds_allowance(7, 3, Some(10)));
    }

    #[test]
    fn request_past_the_allowance_is_rejected() {
        assert!(exceeds_allowance(8, 3, Some(10)));
    }

    #[test]
    fn cancelled_and_rejected_requests_do_not_block_or_consume() {
        assert!(ACTIVE_LEAVE_STATES.contains("'pending'"));
        assert!(ACTIVE_LEAVE_STATES.contains("'approved'"));
        assert!(!ACTIVE_LEAVE_STATES.contains("cancelled"));
        assert!(!ACTIVE_LEAVE_STATES.contains("rejected"));
    }
}
