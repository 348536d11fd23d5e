use serde::Serialize;

use crate::config::CalculatorDefaults;
use crate::core::{
    AmortizationPeriod, CalcResult, Frequency, PaymentTiming, build_amortization_table,
    periodic_payment, round_to,
};

pub const DEFAULT_LOAN_AMOUNT: f64 = 30_000.0;
pub const DEFAULT_LOAN_YEARS: f64 = 6.0;
pub const DEFAULT_LOAN_INTEREST: f64 = 4.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanRequest {
    pub loan_amount: f64,
    pub number_of_years: f64,
    pub rate_of_interest: f64,
    pub frequency: Frequency,
}

impl LoanRequest {
    pub fn with_defaults(defaults: &CalculatorDefaults) -> Self {
        Self {
            loan_amount: DEFAULT_LOAN_AMOUNT,
            number_of_years: DEFAULT_LOAN_YEARS,
            rate_of_interest: DEFAULT_LOAN_INTEREST,
            frequency: defaults.default_frequency(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResult {
    pub loan_amount: f64,
    pub number_of_years: f64,
    pub rate_of_interest: f64,
    pub frequency: Frequency,
    pub payment: f64,
    pub total_interest: f64,
    pub periods: Vec<AmortizationPeriod>,
}

pub fn loan_payment(request: &LoanRequest) -> f64 {
    let periods_per_year = request.frequency.periods_per_year();
    let periods = (request.number_of_years * periods_per_year as f64).round() as u32;
    periodic_payment(
        request.rate_of_interest / 100.0 / periods_per_year as f64,
        periods.max(1),
        request.loan_amount,
        0.0,
        PaymentTiming::End,
    )
}

pub fn loan_schedule(request: &LoanRequest, defaults: &CalculatorDefaults) -> CalcResult<LoanResult> {
    let schedule = build_amortization_table(
        request.loan_amount,
        request.rate_of_interest,
        request.number_of_years,
        request.frequency.periods_per_year(),
        defaults.rounding_digits,
    )?;
    tracing::debug!(
        periods = schedule.periods.len(),
        frequency = request.frequency.name(),
        "built loan schedule"
    );

    Ok(LoanResult {
        loan_amount: request.loan_amount,
        number_of_years: request.number_of_years,
        rate_of_interest: request.rate_of_interest,
        frequency: request.frequency,
        payment: schedule.payment,
        total_interest: round_to(schedule.total_interest, defaults.rounding_digits),
        periods: schedule.periods,
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
    fn loan_payment_fixtures() {
        let request = LoanRequest {
            loan_amount: 200_000.0,
            number_of_years: 15.0,
            rate_of_interest: 7.5,
            frequency: Frequency::Monthly,
        };
        assert_approx(round_to(loan_payment(&request), 2), 1854.02);
        let request = LoanRequest::with_defaults(&CalculatorDefaults::default());
        assert_approx(round_to(loan_payment(&request), 2), 476.22);
    }

    #[test]
    fn yearly_payment_is_larger_than_monthly() {
        let monthly = loan_payment(&LoanRequest {
            loan_amount: 10_000.0,
            number_of_years: 5.0,
            rate_of_interest: 7.0,
            frequency: Frequency::Monthly,
        });
        let yearly = loan_payment(&LoanRequest {
            loan_amount: 10_000.0,
            number_of_years: 5.0,
            rate_of_interest: 7.0,
            frequency: Frequency::Yearly,
        });
        assert!(yearly > monthly * 11.0);
    }

    #[test]
    fn loan_schedule_echoes_parameters() {
        let defaults = CalculatorDefaults::default();
        let result =
            loan_schedule(&LoanRequest::with_defaults(&defaults), &defaults).expect("valid loan");
        assert_eq!(result.periods.len(), 72);
        assert_approx(result.payment, 476.22);
        assert_approx(result.loan_amount, DEFAULT_LOAN_AMOUNT);
        assert_eq!(result.frequency, Frequency::Monthly);
        assert_eq!(result.periods.last().map(|p| p.ending_balance), Some(0.0));
    }

    #[test]
    fn loan_schedule_propagates_validation_errors() {
        let defaults = CalculatorDefaults::default();
        let request = LoanRequest {
            rate_of_interest: 101.0,
            ..LoanRequest::with_defaults(&defaults)
        };
        let err = loan_schedule(&request, &defaults).expect_err("rate out of range");
        assert_eq!(err.parameter(), Some("annual rate percent"));
    }

    #[test]
    fn default_frequency_follows_configuration() {
        let defaults = CalculatorDefaults::from_lookup(|key| {
            (key == "DEFAULT_FREQUENCY").then(|| "1".to_string())
        });
        let result =
            loan_schedule(&LoanRequest::with_defaults(&defaults), &defaults).expect("valid loan");
        assert_eq!(result.frequency, Frequency::Yearly);
        assert_eq!(result.periods.len(), 6);
    }
}
