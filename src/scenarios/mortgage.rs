use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::config::CalculatorDefaults;
use crate::core::{
    AmortizationPeriod, CalcError, CalcResult, amortize, ensure_non_negative, ensure_percent,
    ensure_within, round_period, round_to,
};

pub const DEFAULT_PROPERTY_VALUE: f64 = 300_000.0;
pub const DEFAULT_DOWN_PAYMENT: f64 = 60_000.0;
pub const DEFAULT_MORTGAGE_INTEREST: f64 = 3.8;
pub const DEFAULT_LOAN_TERM_YEARS: u32 = 30;
pub const DEFAULT_PMI: f64 = 0.5;
pub const DEFAULT_PROPERTY_INSURANCE: f64 = 1_000.0;
pub const DEFAULT_MONTHLY_HOA: f64 = 0.0;
pub const MAX_LOAN_TERM_YEARS: u32 = 100;

const PAYMENTS_PER_YEAR: u32 = 12;
const PMI_FREE_DOWN_PAYMENT_SHARE: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MortgageRequest {
    pub property_value: f64,
    pub down_payment: f64,
    pub interest_rate: f64,
    pub loan_term_years: u32,
    pub start_date: NaiveDate,
    pub pmi: f64,
    pub property_insurance: f64,
    pub monthly_hoa: f64,
    pub include_yearly_breakdown: bool,
}

impl MortgageRequest {
    pub fn starting(start_date: NaiveDate) -> Self {
        Self {
            property_value: DEFAULT_PROPERTY_VALUE,
            down_payment: DEFAULT_DOWN_PAYMENT,
            interest_rate: DEFAULT_MORTGAGE_INTEREST,
            loan_term_years: DEFAULT_LOAN_TERM_YEARS,
            start_date,
            pmi: DEFAULT_PMI,
            property_insurance: DEFAULT_PROPERTY_INSURANCE,
            monthly_hoa: DEFAULT_MONTHLY_HOA,
            include_yearly_breakdown: false,
        }
    }

    pub fn loan_amount(&self) -> f64 {
        self.property_value - self.down_payment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgagePeriod {
    pub period: u32,
    pub payment_date: NaiveDate,
    pub payment: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub starting_balance: f64,
    pub ending_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageYear {
    pub year: i32,
    pub starting_balance: f64,
    pub ending_balance: f64,
    pub total_payment: f64,
    pub total_principal_paid: f64,
    pub total_interest_paid: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageResult {
    pub property_value: f64,
    pub down_payment: f64,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub loan_term_years: u32,
    pub start_date: NaiveDate,
    pub pmi: f64,
    pub property_insurance: f64,
    pub monthly_hoa: f64,
    pub monthly_payment: f64,
    pub monthly_pmi: f64,
    pub monthly_property_insurance: f64,
    pub total_monthly_payment: f64,
    pub total_interest: f64,
    pub periods: Vec<MortgagePeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_breakdown: Option<Vec<MortgageYear>>,
}

fn validate(request: &MortgageRequest) -> CalcResult<()> {
    if !request.loan_amount().is_finite() || request.loan_amount() <= 0.0 {
        return Err(CalcError::invalid(
            "loan amount",
            "(property value minus down payment) must be > 0",
        ));
    }
    ensure_non_negative("down payment", request.down_payment)?;
    ensure_within(
        "loan term years",
        request.loan_term_years as f64,
        MAX_LOAN_TERM_YEARS as f64,
    )?;
    ensure_percent("interest rate", request.interest_rate)?;
    ensure_percent("pmi", request.pmi)?;
    ensure_non_negative("property insurance", request.property_insurance)?;
    ensure_non_negative("monthly hoa", request.monthly_hoa)?;
    Ok(())
}

/// Payments fall on the first of the month, starting with the first
/// month-start on or after `start`.
pub fn first_payment_date(start: NaiveDate) -> CalcResult<NaiveDate> {
    let month_start = start.with_day(1).unwrap_or(start);
    if month_start == start {
        return Ok(start);
    }
    month_start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| CalcError::invalid("start date", "is out of range"))
}

pub fn mortgage(request: &MortgageRequest, defaults: &CalculatorDefaults) -> CalcResult<MortgageResult> {
    validate(request)?;
    let digits = defaults.rounding_digits;
    let loan_amount = request.loan_amount();

    let schedule = amortize(
        loan_amount,
        request.interest_rate,
        request.loan_term_years as f64,
        PAYMENTS_PER_YEAR,
    )?;
    let first_date = first_payment_date(request.start_date)?;

    let mut dated = Vec::with_capacity(schedule.periods.len());
    for period in &schedule.periods {
        let payment_date = first_date
            .checked_add_months(Months::new(period.period - 1))
            .ok_or_else(|| CalcError::invalid("start date", "is out of range"))?;
        dated.push((payment_date, *period));
    }

    let yearly_breakdown = request
        .include_yearly_breakdown
        .then(|| yearly_breakdown(&dated, digits));

    let periods = dated
        .iter()
        .map(|(payment_date, period)| {
            let p = round_period(period, digits);
            MortgagePeriod {
                period: p.period,
                payment_date: *payment_date,
                payment: p.payment,
                principal_portion: p.principal_portion,
                interest_portion: p.interest_portion,
                starting_balance: p.starting_balance,
                ending_balance: p.ending_balance,
            }
        })
        .collect::<Vec<_>>();

    let monthly_pmi = if request.down_payment < request.property_value * PMI_FREE_DOWN_PAYMENT_SHARE {
        loan_amount * request.pmi / 100.0 / PAYMENTS_PER_YEAR as f64
    } else {
        0.0
    };
    let monthly_property_insurance = request.property_insurance / PAYMENTS_PER_YEAR as f64;
    let total_monthly_payment =
        schedule.payment + monthly_pmi + monthly_property_insurance + request.monthly_hoa;

    tracing::debug!(
        periods = periods.len(),
        loan_amount,
        "built mortgage schedule"
    );

    Ok(MortgageResult {
        property_value: request.property_value,
        down_payment: request.down_payment,
        loan_amount: round_to(loan_amount, digits),
        interest_rate: request.interest_rate,
        loan_term_years: request.loan_term_years,
        start_date: first_date,
        pmi: request.pmi,
        property_insurance: request.property_insurance,
        monthly_hoa: request.monthly_hoa,
        monthly_payment: round_to(schedule.payment, digits),
        monthly_pmi: round_to(monthly_pmi, digits),
        monthly_property_insurance: round_to(monthly_property_insurance, digits),
        total_monthly_payment: round_to(total_monthly_payment, digits),
        total_interest: round_to(schedule.total_interest, digits),
        periods,
        yearly_breakdown,
    })
}

fn yearly_breakdown(dated: &[(NaiveDate, AmortizationPeriod)], digits: u32) -> Vec<MortgageYear> {
    let mut years: Vec<MortgageYear> = Vec::new();
    for (date, period) in dated {
        match years.last_mut() {
            Some(current) if current.year == date.year() => {
                current.ending_balance = period.ending_balance;
                current.total_payment += period.payment;
                current.total_principal_paid += period.principal_portion;
                current.total_interest_paid += period.interest_portion;
            }
            _ => years.push(MortgageYear {
                year: date.year(),
                starting_balance: period.starting_balance,
                ending_balance: period.ending_balance,
                total_payment: period.payment,
                total_principal_paid: period.principal_portion,
                total_interest_paid: period.interest_portion,
            }),
        }
    }

    years
        .into_iter()
        .map(|y| MortgageYear {
            year: y.year,
            starting_balance: round_to(y.starting_balance, digits),
            ending_balance: round_to(y.ending_balance, digits),
            total_payment: round_to(y.total_payment, digits),
            total_principal_paid: round_to(y.total_principal_paid, digits),
            total_interest_paid: round_to(y.total_interest_paid, digits),
        })
        .collect()
}
