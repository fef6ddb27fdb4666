pub mod attendance;
pub mod leave;
pub mod payroll;
pub mod schedule;
