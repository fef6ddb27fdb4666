use chrono::NaiveDate;
use sqlx::MySqlPool;

/// Attendance records approved by this manager and not yet paid out. Uses
/// the same payable predicate as the work-time sum, so a record that never
/// entered the pay figures is never flagged paid.
pub async fn approved_attendance_ids(
    pool: &MySqlPool,
    schedule_id: u64,
    manager_id: u64,
) -> Vec<u64> {
    let sql = format!(
        r#"
        SELECT a.id
        FROM attendance a
        JOIN employee_schedules s ON s.id = a.employee_schedule_id
        JOIN employees e ON e.id = s.employee_id
        WHERE a.employee_schedule_id = ?
          AND e.manager_id = ?
          AND {}
        "#,
        crate::rpc::PAYABLE_ATTENDANCE
    );

    let result = sqlx::query_scalar::<_, u64>(&sql)
        .bind(schedule_id)
        .bind(manager_id)
        .fetch_all(pool)
        .await;

    match result {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!(error = %e, schedule_id, manager_id, "Failed to fetch approved attendance ids");
            Vec::new()
        }
    }
}

/// Approved, unpaid leave records whose start falls on or before the cutoff.
pub async fn payable_leave_ids(pool: &MySqlPool, schedule_id: u64, cutoff: NaiveDate) -> Vec<u64> {
    let result = sqlx::query_scalar::<_, u64>(
        r#"
        SELECT id
        FROM leave_requests
        WHERE employee_schedule_id = ?
          AND status = 'approved'
          AND leave_type <> 'unpaid'
          AND paid = FALSE
          AND start_date <= ?
        "#,
    )
    .bind(schedule_id)
    .bind(cutoff)
    .fetch_all(pool)
    .await;

    match result {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!(error = %e, schedule_id, "Failed to fetch payable leave ids");
            Vec::new()
        }
    }
}

/// Marks a batch of attendance records paid. Fire-and-forget: failures are
/// logged, never surfaced. Returns the number of rows updated.
pub async fn mark_attendance_paid(pool: &MySqlPool, attendance_ids: &[u64]) -> u64 {
    if attendance_ids.is_empty() {
        return 0;
    }

    let placeholders = vec!["?"; attendance_ids.len()].join(", ");
    let sql = format!(
        "UPDATE attendance SET paid = TRUE, paid_at = NOW() WHERE id IN ({placeholders}) AND paid = FALSE"
    );

    let mut query = sqlx::query(&sql);
    for id in attendance_ids {
        query = query.bind(*id);
    }

    match query.execute(pool).await {
        Ok(done) => done.rows_affected(),
        Err(e) => {
            tracing::error!(error = %e, count = attendance_ids.len(), "Failed to mark attendance paid");
            0
        }
    }
}

/// Marks every payable leave record up to the cutoff as paid. Same
/// fire-and-forget contract as `mark_attendance_paid`. This runs after the
/// attendance update with no transaction spanning the two; a failure here
/// leaves attendance already marked, which the caller only sees in the logs.
pub async fn apply_leave_payments(pool: &MySqlPool, schedule_id: u64, cutoff: NaiveDate) -> u64 {
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET paid = TRUE, paid_at = NOW()
        WHERE employee_schedule_id = ?
          AND status = 'approved'
          AND leave_type <> 'unpaid'
          AND paid = FALSE
          AND start_date <= ?
        "#,
    )
    .bind(schedule_id)
    .bind(cutoff)
    .execute(pool)
    .await;

    match result {
        Ok(done) => done.rows_affected(),
        Err(e) => {
            tracing::error!(error = %e, schedule_id, "Failed to apply leave payments");
            0
        }
    }
}
