use serde::Serialize;
use utoipa::ToSchema;

/// Paid hours credited per approved leave day.
pub const HOURS_PER_LEAVE_DAY: f64 = 8.0;

/// Divisor applied to the performance score inside gross pay.
///
/// Gross pay scales the score by 1/10_000 while the bonus summary scales it
/// by 1/100. The two figures disagree on purpose: payroll has not yet
/// confirmed which scaling is intended, so both are kept as-is under
/// separate constants rather than silently unified.
pub const GROSS_PERF_DIVISOR: f64 = 100.0 * 100.0;

/// Divisor applied to the performance score inside the bonus summary.
pub const BONUS_PERF_DIVISOR: f64 = 100.0;

/// Everything the pay run needs, already fetched. `base_salary` is an
/// hourly rate; the `*_rate` fields are percentages of it.
#[derive(Debug, Clone, Default)]
pub struct PayInputs {
    pub base_salary: f64,
    pub bonus_rate: f64,
    pub commission_rate: f64,
    pub over_time_rate: f64,
    /// Accumulated regular time as `HH:MM[:SS]`; seconds are ignored.
    pub total_work_time: String,
    /// Accumulated overtime as `HH:MM[:SS]`.
    pub total_over_time: String,
    pub performance_score: f64,
    pub total_leave_used: i64,
    /// Deduction total as a decimal string; unparseable values count as 0.
    pub total_deduction: String,
}

/// Line-by-line result of a pay computation, in the currency unit of
/// `base_salary`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayBreakdown {
    #[schema(example = 4000.0)]
    pub regular_pay: f64,
    #[schema(example = 1250.0)]
    pub overtime_pay: f64,
    #[schema(example = 50.0)]
    pub bonus_pay: f64,
    #[schema(example = 25.0)]
    pub commission_pay: f64,
    #[schema(example = 4.0)]
    pub performance_pay: f64,
    #[schema(example = 4000.0)]
    pub leave_payment: f64,
    #[schema(example = 9329.0)]
    pub gross_pay: f64,
    #[schema(example = 5725.0)]
    pub total_bonuses: f64,
    #[schema(example = 300.0)]
    pub total_deduction: f64,
    #[schema(example = 9029.0)]
    pub net_pay: f64,
}

/// Converts `HH:MM[:SS]` into fractional hours. Seconds are dropped, and
/// anything unparseable counts as zero hours rather than erroring: a missing
/// or garbled timesheet must never block a pay run.
pub fn parse_time_to_hours(time: &str) -> f64 {
    let mut parts = time.split(':');
    let hours = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
    let minutes = parts.next().and_then(|p| p.trim().parse::<f64>().ok());

    match (hours, minutes) {
        (Some(h), Some(m)) => h + m / 60.0,
        (Some(h), None) if !time.contains(':') => h,
        _ => 0.0,
    }
}

/// Parses a decimal amount stored as a string, treating anything else as 0.
pub fn parse_amount(amount: &str) -> f64 {
    amount.trim().parse::<f64>().unwrap_or(0.0)
}

fn leave_payment(total_leave_used: i64, base_salary: f64) -> f64 {
    total_leave_used as f64 * HOURS_PER_LEAVE_DAY * base_salary
}

/// Pure pay computation. No I/O, no state; identical inputs always produce
/// identical outputs, so repeated previews of the same schedule agree.
pub fn compute(inputs: &PayInputs) -> PayBreakdown {
    let regular_hours = parse_time_to_hours(&inputs.total_work_time);
    let overtime_hours = parse_time_to_hours(&inputs.total_over_time);

    let regular_pay = regular_hours * inputs.base_salary;
    let overtime_pay = overtime_hours * inputs.base_salary * (1.0 + inputs.over_time_rate / 100.0);
    let bonus_pay = inputs.base_salary * inputs.bonus_rate / 100.0;
    let commission_pay = inputs.base_salary * inputs.commission_rate / 100.0;
    let leave_payment = leave_payment(inputs.total_leave_used, inputs.base_salary);

    let performance_pay = inputs.base_salary * inputs.performance_score / GROSS_PERF_DIVISOR;
    let gross_pay =
        regular_pay + overtime_pay + bonus_pay + commission_pay + performance_pay + leave_payment;

    // The bonus summary values the performance score 100x higher than gross
    // pay does; see GROSS_PERF_DIVISOR.
    let bonus_performance_pay = inputs.base_salary * inputs.performance_score / BONUS_PERF_DIVISOR;
    let total_bonuses =
        overtime_pay + bonus_pay + commission_pay + bonus_performance_pay + leave_payment;

    let total_deduction = parse_amount(&inputs.total_deduction);
    let net_pay = gross_pay - total_deduction;

    PayBreakdown {
        regular_pay,
        overtime_pay,
        bonus_pay,
        commission_pay,
        performance_pay,
        leave_payment,
        gross_pay,
        total_bonuses,
        total_deduction,
        net_pay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> PayInputs {
        PayInputs {
            base_salary: 500.0,
            bonus_rate: 10.0,
            commission_rate: 5.0,
            over_time_rate: 25.0,
            total_work_time: "8:00".into(),
            total_over_time: "2:00".into(),
            performance_score: 80.0,
            total_leave_used: 1,
            total_deduction: "300".into(),
        }
    }

    #[test]
    fn parses_hours_and_minutes() {
        assert_eq!(parse_time_to_hours("8:00"), 8.0);
        assert_eq!(parse_time_to_hours("1:30"), 1.5);
        assert_eq!(parse_time_to_hours("0:45"), 0.75);
    }

    #[test]
    fn seconds_are_ignored() {
        assert_eq!(parse_time_to_hours("8:30:59"), 8.5);
    }

    #[test]
    fn malformed_time_is_zero_hours() {
        assert_eq!(parse_time_to_hours(""), 0.0);
        assert_eq!(parse_time_to_hours("bogus"), 0.0);
        assert_eq!(parse_time_to_hours("8:xx"), 0.0);
        assert_eq!(parse_time_to_hours(":"), 0.0);
    }

    #[test]
    fn malformed_amount_is_zero() {
        assert_eq!(parse_amount("300"), 300.0);
        assert_eq!(parse_amount("  12.5 "), 12.5);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("n/a"), 0.0);
    }

    #[test]
    fn leave_payment_is_days_times_eight_hourly() {
        for days in 0..5 {
            let pay = compute(&PayInputs {
                base_salary: 125.0,
                total_leave_used: days,
                ..PayInputs::default()
            });
            assert_eq!(pay.leave_payment, days as f64 * 8.0 * 125.0);
        }
    }

    #[test]
    fn all_zero_inputs_yield_zero_pay() {
        let pay = compute(&PayInputs {
            total_work_time: "0:00".into(),
            total_over_time: "0:00".into(),
            total_deduction: "0".into(),
            ..PayInputs::default()
        });
        assert_eq!(pay.gross_pay, 0.0);
        assert_eq!(pay.net_pay, 0.0);
        assert_eq!(pay.total_bonuses, 0.0);
    }

    #[test]
    fn worked_example() {
        let pay = compute(&inputs());

        assert_eq!(pay.regular_pay, 4000.0);
        // 2h * 500 * 1.25
        assert_eq!(pay.overtime_pay, 1250.0);
        assert_eq!(pay.bonus_pay, 50.0);
        assert_eq!(pay.commission_pay, 25.0);
        // gross pay side: 500 * 80 / 10_000
        assert_eq!(pay.performance_pay, 4.0);
        assert_eq!(pay.leave_payment, 4000.0);
        assert_eq!(pay.gross_pay, 4000.0 + 1250.0 + 50.0 + 25.0 + 4.0 + 4000.0);
        // bonus summary side uses 500 * 80 / 100 = 400 instead
        assert_eq!(pay.total_bonuses, 1250.0 + 50.0 + 25.0 + 400.0 + 4000.0);
        assert_eq!(pay.net_pay, pay.gross_pay - 300.0);
    }

    #[test]
    fn net_is_gross_minus_deduction() {
        for deduction in ["0", "300", "1234.56"] {
            let mut i = inputs();
            i.total_deduction = deduction.into();
            let pay = compute(&i);
            assert_eq!(pay.net_pay, pay.gross_pay - parse_amount(deduction));
        }
    }

    #[test]
    fn higher_overtime_rate_strictly_raises_overtime_and_gross() {
        let low = compute(&inputs());
        let mut raised = inputs();
        raised.over_time_rate = 50.0;
        let high = compute(&raised);

        assert!(high.overtime_pay > low.overtime_pay);
        assert!(high.gross_pay > low.gross_pay);
    }

    #[test]
    fn computation_is_deterministic() {
        let a = compute(&inputs());
        let b = compute(&inputs());
        assert_eq!(a, b);
    }

    #[test]
    fn empty_timesheet_does_not_block_the_run() {
        let mut i = inputs();
        i.total_work_time = String::new();
        let pay = compute(&i);
        assert_eq!(pay.regular_pay, 0.0);
        // everything else still contributes
        assert!(pay.gross_pay > 0.0);
    }
}
