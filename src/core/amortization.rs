use super::error::{CalcError, CalcResult, ensure_positive};
use super::primitives::{periodic_payment, round_to};
use super::types::{AmortizationPeriod, AmortizationSchedule, PaymentTiming, RateSpec};

pub const MAX_TERM_YEARS: f64 = 150.0;
pub const MAX_PERIODS_PER_YEAR: u32 = 365;

pub fn build_amortization_table(
    principal: f64,
    annual_rate_percent: f64,
    term_years: f64,
    periods_per_year: u32,
    rounding_digits: u32,
) -> CalcResult<AmortizationSchedule> {
    let schedule = amortize(principal, annual_rate_percent, term_years, periods_per_year)?;
    Ok(round_schedule(&schedule, rounding_digits))
}

/// Full-precision schedule. The last period settles whatever dust the
/// iteration left behind, so the final ending balance is exactly zero, and
/// every period after the balance reaches zero is zero-filled.
pub fn amortize(
    principal: f64,
    annual_rate_percent: f64,
    term_years: f64,
    periods_per_year: u32,
) -> CalcResult<AmortizationSchedule> {
    ensure_positive("principal", principal)?;
    if !term_years.is_finite() || term_years <= 0.0 || term_years > MAX_TERM_YEARS {
        return Err(CalcError::invalid(
            "term years",
            format!("must be greater than 0 and at most {MAX_TERM_YEARS}"),
        ));
    }
    if periods_per_year == 0 || periods_per_year > MAX_PERIODS_PER_YEAR {
        return Err(CalcError::invalid(
            "periods per year",
            format!("must be between 1 and {MAX_PERIODS_PER_YEAR}"),
        ));
    }
    let rate_spec = RateSpec::new(annual_rate_percent, periods_per_year)?;

    let num_periods = (term_years * periods_per_year as f64).round() as u32;
    if num_periods == 0 {
        return Err(CalcError::invalid(
            "term years",
            "is shorter than a single payment period",
        ));
    }

    let rate = rate_spec.periodic_rate();
    let payment = periodic_payment(rate, num_periods, principal, 0.0, PaymentTiming::End);
    let settle_threshold = principal * 1e-9;

    let mut periods = Vec::with_capacity(num_periods as usize);
    let mut balance = principal;
    let mut paid_off = false;
    for period in 1..=num_periods {
        if paid_off {
            periods.push(AmortizationPeriod::paid_off(period));
            continue;
        }

        let interest_portion = balance * rate;
        let mut principal_portion = payment - interest_portion;
        let mut period_payment = payment;
        if period == num_periods || principal_portion >= balance - settle_threshold {
            principal_portion = balance;
            period_payment = interest_portion + balance;
        }

        let ending_balance = balance - principal_portion;
        periods.push(AmortizationPeriod {
            period,
            starting_balance: balance,
            payment: period_payment,
            interest_portion,
            principal_portion,
            ending_balance,
        });

        paid_off = ending_balance <= 0.0;
        balance = ending_balance.max(0.0);
    }

    let total_interest = periods.iter().map(|p| p.interest_portion).sum();
    Ok(AmortizationSchedule {
        rate: rate_spec,
        principal,
        term_years,
        payment,
        total_interest,
        periods,
    })
}

pub fn round_schedule(schedule: &AmortizationSchedule, digits: u32) -> AmortizationSchedule {
    AmortizationSchedule {
        rate: schedule.rate,
        principal: round_to(schedule.principal, digits),
        term_years: schedule.term_years,
        payment: round_to(schedule.payment, digits),
        total_interest: round_to(schedule.total_interest, digits),
        periods: schedule
            .periods
            .iter()
            .map(|p| round_period(p, digits))
            .collect(),
    }
}

pub(crate) fn round_period(period: &AmortizationPeriod, digits: u32) -> AmortizationPeriod {
    AmortizationPeriod {
        period: period.period,
        starting_balance: round_to(period.starting_balance, digits),
        payment: round_to(period.payment, digits),
        interest_portion: round_to(period.interest_portion, digits),
        principal_portion: round_to(period.principal_portion, digits),
        ending_balance: round_to(period.ending_balance, digits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn monthly_car_loan_fixture() {
        let schedule = build_amortization_table(30_000.0, 4.5, 6.0, 12, 2).expect("valid loan");
        assert_eq!(schedule.periods.len(), 72);
        assert_approx(schedule.payment, 476.22);
        assert_approx(schedule.periods[0].payment, 476.22);
        assert_approx(schedule.periods[0].starting_balance, 30_000.0);
        assert_approx(schedule.periods[0].interest_portion, 112.5);
        assert_eq!(schedule.periods[71].period, 72);
        assert_eq!(schedule.last_ending_balance(), 0.0);
    }

    #[test]
    fn yearly_loan_ends_at_zero() {
        let schedule = build_amortization_table(10_000.0, 7.0, 6.0, 1, 2).expect("valid loan");
        assert_eq!(schedule.periods.len(), 6);
        assert_eq!(schedule.periods[0].period, 1);
        assert_eq!(schedule.periods[5].period, 6);
        assert_eq!(schedule.last_ending_balance(), 0.0);
    }

    #[test]
    fn zero_rate_loan_repays_straight_line() {
        let schedule = build_amortization_table(1_200.0, 0.0, 1.0, 12, 2).expect("valid loan");
        assert_approx(schedule.payment, 100.0);
        assert_approx(schedule.total_interest, 0.0);
        for period in &schedule.periods {
            assert_approx(period.principal_portion, 100.0);
            assert_approx(period.interest_portion, 0.0);
        }
        assert_eq!(schedule.last_ending_balance(), 0.0);
    }

    #[test]
    fn rejects_invalid_parameters_before_computing() {
        let err = build_amortization_table(-1.0, 5.0, 10.0, 12, 2).expect_err("negative principal");
        assert_eq!(err.parameter(), Some("principal"));

        let err = build_amortization_table(1_000.0, 5.0, 151.0, 12, 2).expect_err("term too long");
        assert_eq!(err.parameter(), Some("term years"));

        let err = build_amortization_table(1_000.0, 5.0, 0.0, 12, 2).expect_err("zero term");
        assert_eq!(err.parameter(), Some("term years"));

        let err = build_amortization_table(1_000.0, 101.0, 10.0, 12, 2).expect_err("rate too high");
        assert_eq!(err.parameter(), Some("annual rate percent"));

        let err = build_amortization_table(1_000.0, 5.0, 10.0, 0, 2).expect_err("no periods");
        assert_eq!(err.parameter(), Some("periods per year"));
    }

    #[test]
    fn rejects_term_shorter_than_one_period() {
        let err = build_amortization_table(1_000.0, 5.0, 0.2, 1, 2).expect_err("too short");
        assert_eq!(err.parameter(), Some("term years"));
    }

    #[test]
    fn full_precision_schedule_settles_exactly() {
        let schedule = amortize(250_000.0, 3.25, 30.0, 12).expect("valid loan");
        let last = schedule.periods.last().expect("non-empty");
        assert_eq!(last.ending_balance, 0.0);
        assert!((last.payment - schedule.payment).abs() < 1e-6);
    }

    #[test]
    fn paid_off_periods_are_zero_filled() {
        let period = AmortizationPeriod::paid_off(9);
        assert_eq!(period.period, 9);
        assert_eq!(period.payment, 0.0);
        assert_eq!(period.ending_balance, 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_schedule_is_complete_and_chained(
            principal in 1u32..5_000_000,
            rate_bp in 0u32..2_500,
            years in 1u32..40,
            frequency_index in 0usize..5,
        ) {
            let periods_per_year = [1u32, 2, 4, 12, 365][frequency_index];
            let schedule = build_amortization_table(
                principal as f64,
                rate_bp as f64 / 100.0,
                years as f64,
                periods_per_year,
                2,
            ).expect("valid loan");

            prop_assert_eq!(schedule.periods.len(), (years * periods_per_year) as usize);
            prop_assert!(schedule.last_ending_balance().abs() <= 0.01);
            for pair in schedule.periods.windows(2) {
                prop_assert_eq!(pair[1].starting_balance, pair[0].ending_balance);
            }
            for p in &schedule.periods {
                prop_assert!(p.interest_portion >= 0.0);
                prop_assert!((p.starting_balance - p.principal_portion - p.ending_balance).abs() <= 0.016);
                prop_assert!((p.interest_portion + p.principal_portion - p.payment).abs() <= 0.016);
            }
        }
    }
}
