use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::Value;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::model::schedule::EmployeeSchedule;
use crate::utils::sql::{build_update_sql, execute_update};

#[derive(Deserialize, ToSchema)]
pub struct CreateSchedule {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "08:00:00", value_type = String, format = "time")]
    pub shift_start_time: NaiveTime,
    #[schema(example = "17:00:00", value_type = String, format = "time")]
    pub shift_end_time: NaiveTime,
    /// Hourly rate
    #[schema(example = 500.0)]
    pub base_salary: f64,
    #[schema(example = 10.0)]
    pub bonus_rate: f64,
    #[schema(example = 5.0)]
    pub commission_rate: f64,
    #[schema(example = 25.0)]
    pub over_time_rate: f64,
}

/// Create an employee schedule (admin)
#[utoipa::path(
    post,
    path = "/api/v1/schedules",
    request_body = CreateSchedule,
    responses(
        (status = 201, description = "Schedule created"),
        (status = 400, description = "Invalid shift window or negative rate"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn create_schedule(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateSchedule>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if payload.shift_start_time >= payload.shift_end_time {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "shift_start_time must be before shift_end_time"
        })));
    }

    let rates = [
        payload.base_salary,
        payload.bonus_rate,
        payload.commission_rate,
        payload.over_time_rate,
    ];
    if rates.iter().any(|r| *r < 0.0) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Salary and rates must be non-negative"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO employee_schedules
            (employee_id, shift_start_time, shift_end_time,
             base_salary, bonus_rate, commission_rate, over_time_rate)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.shift_start_time)
    .bind(payload.shift_end_time)
    .bind(payload.base_salary)
    .bind(payload.bonus_rate)
    .bind(payload.commission_rate)
    .bind(payload.over_time_rate)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = payload.employee_id, "Failed to create schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Schedule created"
    })))
}

/// Fetch one schedule (manager)
#[utoipa::path(
    get,
    path = "/api/v1/schedules/{schedule_id}",
    params(
        ("schedule_id" = u64, Path, description = "Employee schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule found", body = EmployeeSchedule),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Schedule not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn get_schedule(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let schedule_id = path.into_inner();

    let schedule = sqlx::query_as::<_, EmployeeSchedule>(
        r#"
        SELECT id, employee_id, shift_start_time, shift_end_time,
               base_salary, bonus_rate, commission_rate, over_time_rate
        FROM employee_schedules
        WHERE id = ?
        "#,
    )
    .bind(schedule_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, schedule_id, "Failed to fetch schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match schedule {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Schedule not found"
        }))),
    }
}

/// Partially update a schedule (admin)
///
/// Accepts any subset of the schedule columns as a JSON object and updates
/// exactly those. Unknown columns fail at execution and report 400.
#[utoipa::path(
    put,
    path = "/api/v1/schedules/{schedule_id}",
    request_body = Object,
    params(
        ("schedule_id" = u64, Path, description = "Employee schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule updated"),
        (status = 400, description = "Empty or invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Schedule not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn update_schedule(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let schedule_id = path.into_inner();
    let update = build_update_sql("employee_schedules", &payload, "id", schedule_id as i64)?;

    match execute_update(pool.get_ref(), update).await {
        Ok(0) => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Schedule not found"
        }))),
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Schedule updated"
        }))),
        Err(e) => {
            tracing::error!(error = %e, schedule_id, "Failed to update schedule");
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Update rejected"
            })))
        }
    }
}
