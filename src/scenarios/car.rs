use serde::Serialize;

use crate::config::CalculatorDefaults;
use crate::core::{
    AmortizationPeriod, CalcError, CalcResult, PaymentTiming, RandomRange, build_amortization_table,
    ensure_percent, ensure_positive, ensure_within, periodic_payment, round_to,
};

pub const DEFAULT_CAR_LOAN: f64 = 35_000.0;
pub const DEFAULT_CAR_INTEREST: f64 = 7.0;
pub const DEFAULT_CAR_YEARS: u32 = 5;
pub const MAX_CAR_YEARS: u32 = 100;

pub const DEFAULT_CAR_VALUE: f64 = 35_000.0;
pub const DEFAULT_DEPRECIATION_YEARS: u32 = 10;

const FIRST_YEAR_LOSS: (u32, u32) = (20, 30);
const EARLY_YEARS_LOSS: (u32, u32) = (15, 18);
const LAST_EARLY_YEAR: u32 = 6;
const LOSS_BUDGET: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarLoanRequest {
    pub car_loan: f64,
    pub interest: f64,
    pub years: u32,
}

impl Default for CarLoanRequest {
    fn default() -> Self {
        Self {
            car_loan: DEFAULT_CAR_LOAN,
            interest: DEFAULT_CAR_INTEREST,
            years: DEFAULT_CAR_YEARS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarLoanResult {
    pub car_loan: f64,
    pub interest: f64,
    pub years: u32,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub yearly_schedule: Vec<AmortizationPeriod>,
}

pub fn car_loan(request: &CarLoanRequest, defaults: &CalculatorDefaults) -> CalcResult<CarLoanResult> {
    ensure_positive("car loan", request.car_loan)?;
    ensure_percent("interest", request.interest)?;
    ensure_within("years", request.years as f64, MAX_CAR_YEARS as f64)?;

    let schedule = build_amortization_table(
        request.car_loan,
        request.interest,
        request.years as f64,
        1,
        defaults.rounding_digits,
    )?;

    let months = request.years * 12;
    let monthly_payment = periodic_payment(
        request.interest / 100.0 / 12.0,
        months,
        request.car_loan,
        0.0,
        PaymentTiming::End,
    );
    let total_interest = monthly_payment * months as f64 - request.car_loan;

    Ok(CarLoanResult {
        car_loan: request.car_loan,
        interest: request.interest,
        years: request.years,
        monthly_payment: round_to(monthly_payment, defaults.rounding_digits),
        total_interest: round_to(total_interest, defaults.rounding_digits),
        yearly_schedule: schedule.periods,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarDepreciationRequest {
    pub car_value: f64,
    pub years: u32,
}

impl Default for CarDepreciationRequest {
    fn default() -> Self {
        Self {
            car_value: DEFAULT_CAR_VALUE,
            years: DEFAULT_DEPRECIATION_YEARS,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationYear {
    pub year: u32,
    pub depreciation_percentage: u32,
    pub depreciation: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDepreciationResult {
    pub car_value: f64,
    pub years: u32,
    pub first_year_percentage: u32,
    pub early_years_percentage: u32,
    pub later_years_percentage: u32,
    pub depreciation: Vec<DepreciationYear>,
}

/// Rough value-loss estimate. The first year loses 20-30%, years two to six
/// lose 15-18% each, and later years lose whatever is left of a 60% budget
/// after those two draws. Each loss applies to the previous year's value.
/// Horizons long enough for the rounded value to stall are rejected.
pub fn car_depreciation<R>(
    request: &CarDepreciationRequest,
    random: &mut R,
    defaults: &CalculatorDefaults,
) -> CalcResult<CarDepreciationResult>
where
    R: RandomRange + ?Sized,
{
    ensure_positive("car value", request.car_value)?;
    ensure_within("years", request.years as f64, MAX_CAR_YEARS as f64)?;

    let first = random.random_range(FIRST_YEAR_LOSS.0, FIRST_YEAR_LOSS.1);
    let early = random.random_range(EARLY_YEARS_LOSS.0, EARLY_YEARS_LOSS.1);
    let later = LOSS_BUDGET - first - early;

    let mut value = request.car_value;
    let mut previous = round_to(value, defaults.rounding_digits);
    let mut depreciation = Vec::with_capacity(request.years as usize);
    for year in 1..=request.years {
        let percentage = match year {
            1 => first,
            2..=LAST_EARLY_YEAR => early,
            _ => later,
        };
        let lost = value * percentage as f64 / 100.0;
        value -= lost;
        let rounded = round_to(value, defaults.rounding_digits);
        if rounded >= previous {
            return Err(CalcError::invalid(
                "years",
                format!(
                    "must be at most {} for a car valued at {}, the value stops falling after that",
                    year - 1,
                    request.car_value
                ),
            ));
        }
        previous = rounded;
        depreciation.push(DepreciationYear {
            year,
            depreciation_percentage: percentage,
            depreciation: round_to(lost, defaults.rounding_digits),
            value: rounded,
        });
    }

    Ok(CarDepreciationResult {
        car_value: request.car_value,
        years: request.years,
        first_year_percentage: first,
        early_years_percentage: early,
        later_years_percentage: later,
        depreciation,
    })
}
