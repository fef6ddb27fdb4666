//! Data layer for the payroll run: the read procedures a preview needs and
//! the two payout mutations a finalize issues.
//!
//! Every read here is fail-open on purpose: a query error is logged and the
//! caller gets the type's default (zeros, empty list) instead of an error.
//! Payroll review must stay usable when a single side table is missing a
//! row, and a schedule with no deductions is a normal state, not a fault.

pub mod fetch;
pub mod payout;

/// Attendance rows eligible for payout: approved, not yet paid, and closed
/// with a clock-out. The work-time sum and the payable-id fetch must agree
/// on this predicate; if they drift, finalize flags records as paid whose
/// hours never entered the pay computation.
pub(crate) const PAYABLE_ATTENDANCE: &str =
    "a.status = 'approved' AND a.paid = FALSE AND a.clock_out IS NOT NULL";

#[cfg(test)]
mod tests {
    use super::PAYABLE_ATTENDANCE;

    #[test]
    fn payable_attendance_requires_a_closed_record() {
        assert!(PAYABLE_ATTENDANCE.contains("a.clock_out IS NOT NULL"));
        assert!(PAYABLE_ATTENDANCE.contains("a.status = 'approved'"));
        assert!(PAYABLE_ATTENDANCE.contains("a.paid = FALSE"));
    }
}
