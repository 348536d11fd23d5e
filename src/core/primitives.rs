//! Time-value-of-money primitives.
//!
//! Sign convention: a positive present value and a positive payment are both
//! deposits into the account, and `future_value` returns the resulting
//! balance. Withdrawals are negative payments. Loans follow the same rule
//! from the lender's side: `periodic_payment` returns the positive level
//! payment that runs `present_value` down to `future_value`.

use super::error::{CalcError, CalcResult};
use super::types::PaymentTiming;

/// Level payment that amortizes `present_value` down to `future_value` over
/// `num_periods` periods at `rate` per period. `num_periods` must be > 0.
pub fn periodic_payment(
    rate: f64,
    num_periods: u32,
    present_value: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> f64 {
    let n = num_periods as f64;
    if rate == 0.0 {
        return (present_value - future_value) / n;
    }
    let growth = (1.0 + rate).powf(n);
    (present_value * growth - future_value) * rate / ((growth - 1.0) * timing.factor(rate))
}

pub fn future_value(
    rate: f64,
    num_periods: u32,
    payment: f64,
    present_value: f64,
    timing: PaymentTiming,
) -> f64 {
    let n = num_periods as f64;
    if rate == 0.0 {
        return present_value + payment * n;
    }
    let growth = (1.0 + rate).powf(n);
    present_value * growth + payment * (growth - 1.0) / rate * timing.factor(rate)
}

pub fn present_value(
    rate: f64,
    num_periods: u32,
    payment: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> f64 {
    let n = num_periods as f64;
    if rate == 0.0 {
        return future_value - payment * n;
    }
    let growth = (1.0 + rate).powf(n);
    (future_value - payment * (growth - 1.0) / rate * timing.factor(rate)) / growth
}

pub fn number_of_periods(
    rate: f64,
    payment: f64,
    present_value: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> CalcResult<f64> {
    let periods = if rate == 0.0 {
        if payment == 0.0 {
            return Err(CalcError::Domain(
                "a zero rate with no payment never changes the balance".to_string(),
            ));
        }
        (future_value - present_value) / payment
    } else {
        if rate <= -1.0 {
            return Err(CalcError::Domain(format!(
                "periodic rate {rate} wipes out the balance every period"
            )));
        }
        let annuity = payment * timing.factor(rate) / rate;
        let numerator = future_value + annuity;
        let denominator = present_value + annuity;
        if denominator == 0.0 || numerator / denominator <= 0.0 {
            return Err(CalcError::Domain(format!(
                "goal {future_value} is unreachable from {present_value} with payment {payment}"
            )));
        }
        (numerator / denominator).ln() / (1.0 + rate).ln()
    };

    if !periods.is_finite() || periods < 0.0 {
        return Err(CalcError::Domain(format!(
            "goal {future_value} is already exceeded or unreachable from {present_value}"
        )));
    }
    Ok(periods)
}

pub fn compound_interest(
    principal: f64,
    years: f64,
    annual_rate_percent: f64,
    periods_per_year: u32,
) -> f64 {
    let periods = periods_per_year as f64;
    principal * (1.0 + annual_rate_percent / 100.0 / periods).powf(periods * years)
}

pub fn simple_interest(principal: f64, annual_rate_percent: f64, years: f64) -> f64 {
    principal * (annual_rate_percent / 100.0) * years
}

pub fn to_decimal_fraction(percent: f64) -> CalcResult<f64> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(CalcError::Range {
            name: "percent",
            value: percent,
        });
    }
    Ok(percent / 100.0)
}

pub fn equated_monthly_installment(principal: f64, annual_rate_percent: f64, months: u32) -> f64 {
    periodic_payment(
        annual_rate_percent / 100.0 / 12.0,
        months,
        principal,
        0.0,
        PaymentTiming::End,
    )
}

pub fn doubling_time_continuous(annual_rate_percent: f64) -> CalcResult<f64> {
    if !annual_rate_percent.is_finite() || annual_rate_percent <= 0.0 {
        return Err(CalcError::Domain(
            "money never doubles without a positive rate".to_string(),
        ));
    }
    Ok(std::f64::consts::LN_2 / (annual_rate_percent / 100.0))
}

pub fn round_to(value: f64, digits: u32) -> f64 {
    let scale = 10_f64.powi(digits as i32);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn ceil_to(value: f64, digits: u32) -> f64 {
    let scale = 10_f64.powi(digits as i32);
    let ceiled = (value * scale).ceil() / scale;
    if ceiled == 0.0 { 0.0 } else { ceiled }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn periodic_payment_matches_loan_fixtures() {
        let monthly = periodic_payment(0.045 / 12.0, 72, 30_000.0, 0.0, PaymentTiming::End);
        assert_approx(round_to(monthly, 2), 476.22);

        let monthly = periodic_payment(0.075 / 12.0, 180, 200_000.0, 0.0, PaymentTiming::End);
        assert_approx(round_to(monthly, 2), 1854.02);
    }

    #[test]
    fn periodic_payment_zero_rate_is_straight_line() {
        assert_eq!(
            periodic_payment(0.0, 48, 12_000.0, 0.0, PaymentTiming::End),
            12_000.0 / 48.0
        );
        assert_eq!(
            periodic_payment(0.0, 7, 1_000.0, 0.0, PaymentTiming::Begin),
            1_000.0 / 7.0
        );
    }

    #[test]
    fn periodic_payment_begin_is_discounted_by_one_period() {
        let end = periodic_payment(0.01, 24, 10_000.0, 0.0, PaymentTiming::End);
        let begin = periodic_payment(0.01, 24, 10_000.0, 0.0, PaymentTiming::Begin);
        assert_approx(begin * 1.01, end);
    }

    #[test]
    fn future_value_lump_sum() {
        let fv = future_value(0.05, 5, 0.0, 5_000.0, PaymentTiming::End);
        assert_approx(round_to(fv, 2), 6416.79);
    }

    #[test]
    fn future_value_yearly_payments() {
        let fv = future_value(0.02, 5, 1_000.0, 0.0, PaymentTiming::End);
        assert_approx(round_to(fv, 2), 5204.04);
    }

    #[test]
    fn future_value_zero_rate_sums_payments() {
        assert_approx(
            future_value(0.0, 10, 100.0, 500.0, PaymentTiming::Begin),
            1_500.0,
        );
    }

    #[test]
    fn future_value_negative_rate_depreciates() {
        let fv = future_value(-0.10, 2, 0.0, 1_000.0, PaymentTiming::End);
        assert_approx(fv, 810.0);
    }

    #[test]
    fn number_of_periods_zero_rate_is_linear() {
        let n = number_of_periods(0.0, 1_000.0, 0.0, 12_000.0, PaymentTiming::End)
            .expect("reachable");
        assert_approx(n, 12.0);
    }

    #[test]
    fn number_of_periods_inverts_future_value() {
        let fv = future_value(0.005, 120, 500.0, 10_000.0, PaymentTiming::End);
        let n = number_of_periods(0.005, 500.0, 10_000.0, fv, PaymentTiming::End)
            .expect("reachable");
        assert_approx(n, 120.0);
    }

    #[test]
    fn number_of_periods_rejects_unreachable_goal() {
        let err = number_of_periods(0.0, 0.0, 100.0, 1_000.0, PaymentTiming::End)
            .expect_err("no growth");
        assert!(matches!(err, CalcError::Domain(_)));

        let err = number_of_periods(-0.01, 1.0, 100.0, 1_000_000.0, PaymentTiming::End)
            .expect_err("negative rate cannot reach the goal");
        assert!(matches!(err, CalcError::Domain(_)));
    }

    #[test]
    fn number_of_periods_rejects_goal_already_exceeded() {
        let err = number_of_periods(0.005, 100.0, 5_000.0, 1_000.0, PaymentTiming::End)
            .expect_err("already above goal");
        assert!(matches!(err, CalcError::Domain(_)));
    }

    #[test]
    fn compound_interest_monthly() {
        let value = compound_interest(1_000.0, 5.0, 8.0, 12);
        assert_approx(round_to(value, 2), 1489.85);
    }

    #[test]
    fn simple_interest_is_linear() {
        assert_approx(simple_interest(1_000.0, 5.0, 3.0), 150.0);
    }

    #[test]
    fn to_decimal_fraction_converts_and_rejects() {
        assert_approx(to_decimal_fraction(80.0).expect("in range"), 0.8);
        assert_approx(to_decimal_fraction(5.0).expect("in range"), 0.05);
        assert!(matches!(
            to_decimal_fraction(200.0),
            Err(CalcError::Range { .. })
        ));
        assert!(to_decimal_fraction(-0.1).is_err());
    }

    #[test]
    fn doubling_time_continuous_fixtures() {
        assert_approx(round_to(doubling_time_continuous(6.0).expect("positive"), 2), 11.55);
        assert_approx(round_to(doubling_time_continuous(10.0).expect("positive"), 2), 6.93);
        assert!(doubling_time_continuous(0.0).is_err());
    }

    #[test]
    fn equated_monthly_installment_is_positive() {
        assert!(equated_monthly_installment(1_000.0, 7.5, 36) > 1_000.0 / 36.0);
    }

    #[test]
    fn round_to_normalizes_negative_zero() {
        let rounded = round_to(-0.000_001, 2);
        assert!(rounded.is_sign_positive());
        assert_approx(round_to(2.345_6, 2), 2.35);
        assert_approx(ceil_to(2.341, 2), 2.35);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_present_value_inverts_future_value(
            rate_bp in -50i32..200,
            periods in 1u32..600,
            payment in -2_000i32..5_000,
            pv in 0u32..1_000_000,
            begin in proptest::bool::ANY,
        ) {
            let rate = rate_bp as f64 / 10_000.0;
            let timing = if begin { PaymentTiming::Begin } else { PaymentTiming::End };
            let fv = future_value(rate, periods, payment as f64, pv as f64, timing);
            let back = present_value(rate, periods, payment as f64, fv, timing);
            let scale = (pv as f64).abs().max(1.0);
            prop_assert!(((back - pv as f64) / scale).abs() <= 1e-6, "pv {pv} came back as {back}");
        }

        #[test]
        fn prop_payment_amortizes_to_zero(
            rate_bp in 0i32..150,
            periods in 1u32..480,
            pv in 1u32..2_000_000,
        ) {
            let rate = rate_bp as f64 / 10_000.0;
            let pmt = periodic_payment(rate, periods, pv as f64, 0.0, PaymentTiming::End);
            let remaining = future_value(rate, periods, -pmt, pv as f64, PaymentTiming::End);
            prop_assert!(remaining.abs() <= 1e-6 * pv as f64);
        }
    }
}
