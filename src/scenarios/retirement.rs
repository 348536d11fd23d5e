use serde::Serialize;

use crate::config::CalculatorDefaults;
use crate::core::{
    CalcResult, PaymentTiming, ensure_positive, ensure_within, future_value, round_to,
};

pub const DEFAULT_RETIREMENT_NUMBER: f64 = 1_000_000.0;
pub const DEFAULT_TAKE_OUT_PERCENTAGE: f64 = 3.0;
pub const DEFAULT_WITHDRAWAL_YEARS: u32 = 35;

pub const MAX_TAKE_OUT_PERCENTAGE: f64 = 10.0;
pub const MAX_WITHDRAWAL_YEARS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithdrawalRequest {
    pub retirement_number: f64,
    pub take_out_percentage: f64,
    pub number_of_years: u32,
}

impl Default for WithdrawalRequest {
    fn default() -> Self {
        Self {
            retirement_number: DEFAULT_RETIREMENT_NUMBER,
            take_out_percentage: DEFAULT_TAKE_OUT_PERCENTAGE,
            number_of_years: DEFAULT_WITHDRAWAL_YEARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalYear {
    pub year: u32,
    pub take_out_percentage: f64,
    pub starting_retirement_number: f64,
    pub withdrawal: f64,
    pub ending_retirement_number: f64,
}

/// Withdraws the same amount every year, a share of the original number, and
/// lets the balance go negative. The maximum take-out yields one year only.
pub fn withdrawal_calc(
    request: &WithdrawalRequest,
    defaults: &CalculatorDefaults,
) -> CalcResult<Vec<WithdrawalYear>> {
    ensure_positive("retirement number", request.retirement_number)?;
    ensure_within(
        "take out percentage",
        request.take_out_percentage,
        MAX_TAKE_OUT_PERCENTAGE,
    )?;
    ensure_within(
        "number of years",
        request.number_of_years as f64,
        MAX_WITHDRAWAL_YEARS as f64,
    )?;

    let digits = defaults.rounding_digits;
    let rate = defaults.interest / 100.0;
    let withdrawal = request.retirement_number * request.take_out_percentage / 100.0;
    let years = if request.take_out_percentage == MAX_TAKE_OUT_PERCENTAGE {
        1
    } else {
        request.number_of_years
    };

    let mut rows = Vec::with_capacity(years as usize);
    let mut balance = request.retirement_number;
    for year in 1..=years {
        let ending = future_value(rate, 1, 0.0, balance - withdrawal, PaymentTiming::End);
        rows.push(WithdrawalYear {
            year,
            take_out_percentage: request.take_out_percentage,
            starting_retirement_number: round_to(balance, digits),
            withdrawal: round_to(withdrawal, digits),
            ending_retirement_number: round_to(ending, digits),
        });
        balance = ending;
    }

    tracing::debug!(years = rows.len(), withdrawal, "built withdrawal table");
    Ok(rows)
}
