use crate::api::attendance::{AttendanceHistoryQuery, ReviewAttendance};
use crate::api::leave::{CreateLeave, DaysUsedQuery, LeaveFilter, LeaveListResponse};
use crate::api::payroll::{PayrollFinalizeResponse, PayrollPreviewResponse};
use crate::api::schedule::CreateSchedule;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::leave::{LeaveRecord, LeaveType};
use crate::model::payroll::{
    CompensationProfile, DeductionProfile, PerformanceMetric, WorkTimeSummary,
};
use crate::model::schedule::{EmployeeSchedule, SchedulePayrollRow};
use crate::pay::compute::PayBreakdown;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Management API",
        version = "1.0.0",
        description = r#"
## Payroll Management System

Backend for manager-driven payroll review: attendance and leave feed an
hourly-rate pay computation, and approved records are paid out per schedule.

### Key Features
- **Payroll**
  - Preview a schedule's pay breakdown (gross, bonuses, net) from current data
  - Finalize a run: mark approved attendance and payable leave as paid
- **Attendance**
  - Clock in/out per schedule, manager approval, history
- **Leave**
  - Request, approve/reject, cancel, and days-used tracking

### Security
Endpoints under the API prefix require a **JWT Bearer token**; payroll and
review operations additionally require the Manager or Admin role.
"#,
    ),
    paths(
        crate::api::payroll::preview_payroll,
        crate::api::payroll::finalize_payroll,
        crate::api::payroll::list_payroll_schedules,

        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::review_attendance,
        crate::api::attendance::attendance_history,

        crate::api::leave::create_leave,
        crate::api::leave::leave_list,
        crate::api::leave::get_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,
        crate::api::leave::cancel_leave,
        crate::api::leave::leave_days_used,

        crate::api::schedule::create_schedule,
        crate::api::schedule::get_schedule,
        crate::api::schedule::update_schedule
    ),
    components(
        schemas(
            PayrollPreviewResponse,
            PayrollFinalizeResponse,
            PayBreakdown,
            CompensationProfile,
            WorkTimeSummary,
            DeductionProfile,
            PerformanceMetric,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceHistoryQuery,
            ReviewAttendance,
            LeaveRecord,
            LeaveType,
            LeaveFilter,
            LeaveListResponse,
            CreateLeave,
            DaysUsedQuery,
            EmployeeSchedule,
            SchedulePayrollRow,
            CreateSchedule
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Payroll", description = "Payroll preview and finalization APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Schedule", description = "Employee schedule APIs"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
