use serde::Serialize;

use crate::config::CalculatorDefaults;
use crate::core::{
    CalcError, CalcResult, MAX_PROJECTION_YEARS, PaymentTiming, ensure_non_negative,
    ensure_percent, ensure_positive, future_value, present_value, round_to,
};

pub const DEFAULT_START_AGE: u32 = 30;
pub const DEFAULT_END_AGE: u32 = 90;
pub const DEFAULT_INITIAL_BALANCE: f64 = 100_000.0;
pub const DEFAULT_COAST_INTEREST: f64 = 7.0;
pub const DEFAULT_DISCOUNT_RATE: f64 = 2.0;
pub const DEFAULT_SMALL_CONTRIBUTION: f64 = 5_000.0;
pub const DEFAULT_SMALL_CONTRIBUTION_UNTIL_AGE: u32 = 35;
pub const DEFAULT_HEAVY_CONTRIBUTION: f64 = 30_000.0;
pub const DEFAULT_HEAVY_CONTRIBUTION_UNTIL_AGE: u32 = 45;
pub const DEFAULT_COAST_SPENDING: f64 = 60_000.0;

const START_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;
const RETIREMENT_NUMBER_MULTIPLE: f64 = 25.0;
const WITHDRAWAL_RATES: [f64; 3] = [2.0, 3.0, 4.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoastFireRequest {
    pub start_age: u32,
    pub end_age: u32,
    pub start_year: i32,
    pub initial_balance: f64,
    pub interest: f64,
    pub discount_rate: f64,
    pub small_contribution: f64,
    pub small_contribution_until_age: u32,
    pub heavy_contribution: f64,
    pub heavy_contribution_until_age: u32,
    pub desired_annual_spending: f64,
}

impl CoastFireRequest {
    pub fn starting_in(start_year: i32) -> Self {
        Self {
            start_age: DEFAULT_START_AGE,
            end_age: DEFAULT_END_AGE,
            start_year,
            initial_balance: DEFAULT_INITIAL_BALANCE,
            interest: DEFAULT_COAST_INTEREST,
            discount_rate: DEFAULT_DISCOUNT_RATE,
            small_contribution: DEFAULT_SMALL_CONTRIBUTION,
            small_contribution_until_age: DEFAULT_SMALL_CONTRIBUTION_UNTIL_AGE,
            heavy_contribution: DEFAULT_HEAVY_CONTRIBUTION,
            heavy_contribution_until_age: DEFAULT_HEAVY_CONTRIBUTION_UNTIL_AGE,
            desired_annual_spending: DEFAULT_COAST_SPENDING,
        }
    }

    fn contribution_at(&self, age: u32) -> f64 {
        if age < self.small_contribution_until_age {
            self.small_contribution
        } else if age < self.heavy_contribution_until_age {
            self.heavy_contribution
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoastFireYear {
    pub age: u32,
    pub year: i32,
    pub contribution: f64,
    pub starting_balance: f64,
    pub ending_balance: f64,
    pub two_percent_withdrawal: f64,
    pub three_percent_withdrawal: f64,
    pub four_percent_withdrawal: f64,
    pub two_percent_withdrawal_present_value: f64,
    pub three_percent_withdrawal_present_value: f64,
    pub four_percent_withdrawal_present_value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoastFireResult {
    pub retirement_number: f64,
    pub flip_age: Option<u32>,
    pub years: Vec<CoastFireYear>,
}

fn validate(request: &CoastFireRequest) -> CalcResult<()> {
    if request.end_age <= request.start_age {
        return Err(CalcError::invalid("end age", "must be greater than start age"));
    }
    if request.end_age - request.start_age > MAX_PROJECTION_YEARS {
        return Err(CalcError::invalid(
            "end age",
            format!("must be within {MAX_PROJECTION_YEARS} years of start age"),
        ));
    }
    if !START_YEARS.contains(&request.start_year) {
        return Err(CalcError::invalid(
            "start year",
            format!(
                "must be between {} and {}",
                START_YEARS.start(),
                START_YEARS.end()
            ),
        ));
    }
    ensure_non_negative("initial balance", request.initial_balance)?;
    ensure_percent("interest", request.interest)?;
    ensure_percent("discount rate", request.discount_rate)?;
    ensure_non_negative("small contribution", request.small_contribution)?;
    ensure_non_negative("heavy contribution", request.heavy_contribution)?;
    ensure_positive("desired annual spending", request.desired_annual_spending)?;
    Ok(())
}

/// From the flip age on, every year withdraws the desired spending.
pub fn coast_fire_savings(
    request: &CoastFireRequest,
    defaults: &CalculatorDefaults,
) -> CalcResult<CoastFireResult> {
    validate(request)?;

    let digits = defaults.rounding_digits;
    let rate = request.interest / 100.0;
    let discount = request.discount_rate / 100.0;
    let retirement_number = request.desired_annual_spending * RETIREMENT_NUMBER_MULTIPLE;

    let mut flip_age = None;
    let mut balance = request.initial_balance;
    let mut years = Vec::with_capacity((request.end_age - request.start_age + 1) as usize);
    for (offset, age) in (request.start_age..=request.end_age).enumerate() {
        if flip_age.is_none() && balance >= retirement_number {
            flip_age = Some(age);
        }
        let flow = match flip_age {
            Some(_) => -request.desired_annual_spending,
            None => request.contribution_at(age),
        };
        let ending = future_value(rate, 1, 0.0, balance, PaymentTiming::End) + flow;

        let [two, three, four] = WITHDRAWAL_RATES.map(|pct| balance * pct / 100.0);
        let discounted =
            |amount: f64| present_value(discount, offset as u32, 0.0, amount, PaymentTiming::End);

        years.push(CoastFireYear {
            age,
            year: request.start_year + offset as i32,
            contribution: round_to(flow, digits),
            starting_balance: round_to(balance, digits),
            ending_balance: round_to(ending, digits),
            two_percent_withdrawal: round_to(two, digits),
            three_percent_withdrawal: round_to(three, digits),
            four_percent_withdrawal: round_to(four, digits),
            two_percent_withdrawal_present_value: round_to(discounted(two), digits),
            three_percent_withdrawal_present_value: round_to(discounted(three), digits),
            four_percent_withdrawal_present_value: round_to(discounted(four), digits),
        });
        balance = ending;
    }

    tracing::debug!(years = years.len(), ?flip_age, "built coast fire table");
    Ok(CoastFireResult {
        retirement_number,
        flip_age,
        years,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn default_curve_contributes_then_flips_to_withdrawals() {
        let defaults = CalculatorDefaults::default();
        let result = coast_fire_savings(&CoastFireRequest::starting_in(2024), &defaults)
            .expect("valid request");

        assert_approx(result.retirement_number, 1_500_000.0);
        assert_eq!(result.years.len(), 61);
        assert_eq!(result.flip_age, Some(56));

        let first = result.years[0];
        assert_eq!((first.age, first.year), (30, 2024));
        assert_approx(first.contribution, 5_000.0);
        assert_approx(first.ending_balance, 112_000.0);
        assert_approx(result.years[1].starting_balance, 112_000.0);
        assert_approx(result.years[1].ending_balance, 124_840.0);

        assert_approx(result.years[5].contribution, 30_000.0);
        assert_approx(result.years[15].contribution, 0.0);
        assert!(result.years[26..].iter().all(|y| y.contribution == -60_000.0));
        assert!(result.years[..26].iter().all(|y| y.contribution >= 0.0));
    }

    #[test]
    fn withdrawal_variants_are_discounted_to_start_year() {
        let defaults = CalculatorDefaults::default();
        let result = coast_fire_savings(&CoastFireRequest::starting_in(2024), &defaults)
            .expect("valid request");

        let first = result.years[0];
        assert_approx(first.two_percent_withdrawal, 2_000.0);
        assert_approx(first.four_percent_withdrawal, 4_000.0);
        assert_approx(first.four_percent_withdrawal_present_value, 4_000.0);

        let second = result.years[1];
        assert_approx(second.three_percent_withdrawal, 3_360.0);
        assert!((second.three_percent_withdrawal_present_value - 3_360.0 / 1.02).abs() <= 0.005);
    }

    #[test]
    fn rich_start_flips_immediately() {
        let defaults = CalculatorDefaults::default();
        let request = CoastFireRequest {
            initial_balance: 2_000_000.0,
            ..CoastFireRequest::starting_in(2024)
        };
        let result = coast_fire_savings(&request, &defaults).expect("valid request");
        assert_eq!(result.flip_age, Some(30));
        assert_approx(result.years[0].ending_balance, 2_080_000.0);
    }

    #[test]
    fn last_accepted_start_year_labels_every_row() {
        let defaults = CalculatorDefaults::default();
        let result = coast_fire_savings(&CoastFireRequest::starting_in(9999), &defaults)
            .expect("valid request");
        assert_eq!(result.years.last().map(|y| y.year), Some(9999 + 60));
    }

    #[test]
    fn validation() {
        let defaults = CalculatorDefaults::default();
        let cases = [
            (
                CoastFireRequest { end_age: 30, ..CoastFireRequest::starting_in(2024) },
                "end age",
            ),
            (
                CoastFireRequest { interest: 120.0, ..CoastFireRequest::starting_in(2024) },
                "interest",
            ),
            (
                CoastFireRequest {
                    desired_annual_spending: 0.0,
                    ..CoastFireRequest::starting_in(2024)
                },
                "desired annual spending",
            ),
            (CoastFireRequest::starting_in(i32::MAX), "start year"),
            (CoastFireRequest::starting_in(0), "start year"),
        ];
        for (request, name) in cases {
            let err = coast_fire_savings(&request, &defaults).expect_err("invalid request");
            assert_eq!(err.parameter(), Some(name));
        }
    }
}
