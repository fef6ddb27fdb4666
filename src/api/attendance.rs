use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};

#[derive(Deserialize, ToSchema)]
pub struct ReviewAttendance {
    /// "approved" or "rejected"
    #[schema(example = "approved")]
    pub status: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceHistoryQuery {
    /// Employee schedule to inspect
    #[schema(example = 1)]
    pub schedule_id: u64,
    /// Only records from the last N days; omit for the full history
    #[schema(example = 30)]
    pub days: Option<u32>,
}

/// Clock in for today
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-in",
    responses(
        (status = 200, description = "Clocked in", body = Object, example = json!({
            "message": "Clocked in"
        })),
        (status = 400, description = "Already clocked in today", body = Object, example = json!({
            "message": "Already clocked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn clock_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let schedule_id: u64 = auth
        .employee_schedule_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee schedule"))?;

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_schedule_id, date, clock_in, status)
        VALUES (?, CURDATE(), CURTIME(), 'pending')
        "#,
    )
    .bind(schedule_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Clocked in"
        }))),
        Err(e) => {
            // Unique (schedule, date) key rejects a second clock-in
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already clocked in today"
                    })));
                }
            }

            tracing::error!(error = %e, schedule_id, "Clock-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Clock out for today
#[utoipa::path(
    put,
    path = "/api/v1/attendance/clock-out",
    responses(
        (status = 200, description = "Clocked out", body = Object, example = json!({
            "message": "Clocked out"
        })),
        (status = 400, description = "No open clock-in found for today", body = Object, example = json!({
            "message": "No open clock-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn clock_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let schedule_id: u64 = auth
        .employee_schedule_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee schedule"))?;

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET clock_out = CURTIME()
        WHERE employee_schedule_id = ?
          AND date = CURDATE()
          AND clock_out IS NULL
        "#,
    )
    .bind(schedule_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, schedule_id, "Clock-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No open clock-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Clocked out"
    })))
}

/// Approve or reject a pending attendance record (manager)
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{attendance_id}/review",
    request_body = ReviewAttendance,
    params(
        ("attendance_id" = u64, Path, description = "Attendance record to review")
    ),
    responses(
        (status = 200, description = "Attendance reviewed", body = Object, example = json!({
            "message": "Attendance approved"
        })),
        (status = 400, description = "Record not found, already reviewed, or invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn review_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ReviewAttendance>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let attendance_id = path.into_inner();

    let status = match AttendanceStatus::from_str(&payload.status) {
        Ok(s @ (AttendanceStatus::Approved | AttendanceStatus::Rejected)) => s,
        _ => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Status must be approved or rejected"
            })));
        }
    };

    let result = sqlx::query(
        r#"
        UPDATE attendance a
        JOIN employee_schedules s ON s.id = a.employee_schedule_id
        JOIN employees e ON e.id = s.employee_id
        SET a.status = ?
        WHERE a.id = ?
          AND e.manager_id = ?
          AND a.status = 'pending'
        "#,
    )
    .bind(status.to_string())
    .bind(attendance_id)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, attendance_id, "Attendance review failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Attendance record not found or already reviewed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Attendance {status}")
    })))
}

/// Attendance history for a schedule, optionally windowed (manager)
#[utoipa::path(
    get,
    path = "/api/v1/attendance/history",
    params(AttendanceHistoryQuery),
    responses(
        (status = 200, description = "Attendance records, newest first", body = [AttendanceRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn attendance_history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceHistoryQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let mut sql = String::from(
        r#"
        SELECT a.id, a.employee_schedule_id, a.date, a.clock_in, a.clock_out, a.status, a.paid
        FROM attendance a
        JOIN employee_schedules s ON s.id = a.employee_schedule_id
        JOIN employees e ON e.id = s.employee_id
        WHERE a.employee_schedule_id = ?
          AND e.manager_id = ?
        "#,
    );
    if query.days.is_some() {
        sql.push_str(" AND a.date >= CURDATE() - INTERVAL ? DAY");
    }
    sql.push_str(" ORDER BY a.date DESC");

    let mut q = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(query.schedule_id)
        .bind(auth.user_id);
    if let Some(days) = query.days {
        q = q.bind(days);
    }

    let records = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, schedule_id = query.schedule_id, "Failed to fetch attendance history");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(records))
}
