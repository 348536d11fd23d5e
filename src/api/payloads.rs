use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::CalculatorDefaults;
use crate::core::{CalcError, CalcResult, convert_frequency};
use crate::scenarios::analytics::{Asset, AssetsLiabilitiesRequest, Liability};
use crate::scenarios::car::{CarDepreciationRequest, CarLoanRequest};
use crate::scenarios::coast_fire::CoastFireRequest;
use crate::scenarios::fi::{
    ChildrenCostRequest, CompoundInterestRequest, DEFAULT_ADDED_TIME_MONTHLY_INVESTMENT,
    DEFAULT_RULE_OF_72_AMOUNT, DEFAULT_RULE_OF_72_INTEREST, DEFAULT_TOTAL_ADDITIONAL_EXPENSE,
    InvestmentFeesRequest, SavingsRateRequest, TimeToFiRequest,
};
use crate::scenarios::health::{BmiImperialRequest, BmiMetricRequest};
use crate::scenarios::life_event::{LifeEventKind, LifeEventRequest, TrackContributions};
use crate::scenarios::loan::LoanRequest;
use crate::scenarios::mortgage::MortgageRequest;
use crate::scenarios::retirement::WithdrawalRequest;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct LoanPayload {
    loan_amount: Option<f64>,
    number_of_years: Option<f64>,
    rate_of_interest: Option<f64>,
    frequency: Option<String>,
}

impl LoanPayload {
    pub(crate) fn into_request(self, defaults: &CalculatorDefaults) -> CalcResult<LoanRequest> {
        let mut request = LoanRequest::with_defaults(defaults);
        if let Some(v) = self.loan_amount {
            request.loan_amount = v;
        }
        if let Some(v) = self.number_of_years {
            request.number_of_years = v;
        }
        if let Some(v) = self.rate_of_interest {
            request.rate_of_interest = v;
        }
        if let Some(v) = self.frequency {
            request.frequency = convert_frequency(&v)?;
        }
        Ok(request)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CarLoanPayload {
    car_loan: Option<f64>,
    interest: Option<f64>,
    years: Option<u32>,
}

impl CarLoanPayload {
    pub(crate) fn into_request(self) -> CarLoanRequest {
        let mut request = CarLoanRequest::default();
        if let Some(v) = self.car_loan {
            request.car_loan = v;
        }
        if let Some(v) = self.interest {
            request.interest = v;
        }
        if let Some(v) = self.years {
            request.years = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CarDepreciationPayload {
    car_value: Option<f64>,
    years: Option<u32>,
    pub(crate) seed: Option<u64>,
}

impl CarDepreciationPayload {
    pub(crate) fn to_request(&self) -> CarDepreciationRequest {
        let mut request = CarDepreciationRequest::default();
        if let Some(v) = self.car_value {
            request.car_value = v;
        }
        if let Some(v) = self.years {
            request.years = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct MortgagePayload {
    property_value: Option<f64>,
    down_payment: Option<f64>,
    interest_rate: Option<f64>,
    loan_term_years: Option<u32>,
    start_date: Option<NaiveDate>,
    pmi: Option<f64>,
    property_insurance: Option<f64>,
    monthly_hoa: Option<f64>,
    include_yearly_breakdown: Option<bool>,
}

impl MortgagePayload {
    pub(crate) fn into_request(self, today: NaiveDate) -> MortgageRequest {
        let mut request = MortgageRequest::starting(self.start_date.unwrap_or(today));
        if let Some(v) = self.property_value {
            request.property_value = v;
        }
        if let Some(v) = self.down_payment {
            request.down_payment = v;
        }
        if let Some(v) = self.interest_rate {
            request.interest_rate = v;
        }
        if let Some(v) = self.loan_term_years {
            request.loan_term_years = v;
        }
        if let Some(v) = self.pmi {
            request.pmi = v;
        }
        if let Some(v) = self.property_insurance {
            request.property_insurance = v;
        }
        if let Some(v) = self.monthly_hoa {
            request.monthly_hoa = v;
        }
        if let Some(v) = self.include_yearly_breakdown {
            request.include_yearly_breakdown = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WithdrawalPayload {
    retirement_number: Option<f64>,
    take_out_percentage: Option<f64>,
    number_of_years: Option<u32>,
}

impl WithdrawalPayload {
    pub(crate) fn into_request(self) -> WithdrawalRequest {
        let mut request = WithdrawalRequest::default();
        if let Some(v) = self.retirement_number {
            request.retirement_number = v;
        }
        if let Some(v) = self.take_out_percentage {
            request.take_out_percentage = v;
        }
        if let Some(v) = self.number_of_years {
            request.number_of_years = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct TimeToFiPayload {
    starting_amount: Option<f64>,
    monthly_investment: Option<f64>,
    desired_years_expenses_for_fi: Option<u32>,
    desired_annual_spending: Option<f64>,
}

impl TimeToFiPayload {
    pub(crate) fn into_request(self) -> TimeToFiRequest {
        let mut request = TimeToFiRequest::default();
        if let Some(v) = self.starting_amount {
            request.starting_amount = v;
        }
        if let Some(v) = self.monthly_investment {
            request.monthly_investment = v;
        }
        if let Some(v) = self.desired_years_expenses_for_fi {
            request.desired_years_expenses_for_fi = v;
        }
        if let Some(v) = self.desired_annual_spending {
            request.desired_annual_spending = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RuleOf72Payload {
    starting_amount: Option<f64>,
    interest: Option<f64>,
}

impl RuleOf72Payload {
    pub(crate) fn resolve(&self) -> (f64, f64) {
        (
            self.starting_amount.unwrap_or(DEFAULT_RULE_OF_72_AMOUNT),
            self.interest.unwrap_or(DEFAULT_RULE_OF_72_INTEREST),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct BmiImperialPayload {
    weight: Option<f64>,
    feet: Option<f64>,
    inches: Option<f64>,
}

impl BmiImperialPayload {
    pub(crate) fn into_request(self) -> BmiImperialRequest {
        let mut request = BmiImperialRequest::default();
        if let Some(v) = self.weight {
            request.weight = v;
        }
        if let Some(v) = self.feet {
            request.feet = v;
        }
        if let Some(v) = self.inches {
            request.inches = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct BmiMetricPayload {
    weight: Option<f64>,
    height: Option<f64>,
}

impl BmiMetricPayload {
    pub(crate) fn into_request(self) -> BmiMetricRequest {
        let mut request = BmiMetricRequest::default();
        if let Some(v) = self.weight {
            request.weight = v;
        }
        if let Some(v) = self.height {
            request.height = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct AddedTimePayload {
    monthly_investment: Option<f64>,
    total_additional_expense: Option<f64>,
}

impl AddedTimePayload {
    pub(crate) fn resolve(&self) -> (f64, f64) {
        (
            self.monthly_investment
                .unwrap_or(DEFAULT_ADDED_TIME_MONTHLY_INVESTMENT),
            self.total_additional_expense
                .unwrap_or(DEFAULT_TOTAL_ADDITIONAL_EXPENSE),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CompoundInterestPayload {
    starting_amount: Option<f64>,
    monthly_investment: Option<f64>,
    interest_rate: Option<f64>,
    number_of_years: Option<u32>,
    investment_fees: Option<f64>,
    tax_drag: Option<f64>,
}

impl CompoundInterestPayload {
    pub(crate) fn into_request(self, defaults: &CalculatorDefaults) -> CompoundInterestRequest {
        let mut request = CompoundInterestRequest::with_defaults(defaults);
        if let Some(v) = self.starting_amount {
            request.starting_amount = v;
        }
        if let Some(v) = self.monthly_investment {
            request.monthly_investment = v;
        }
        if let Some(v) = self.interest_rate {
            request.interest_rate = v;
        }
        if let Some(v) = self.number_of_years {
            request.number_of_years = v;
        }
        if let Some(v) = self.investment_fees {
            request.investment_fees = v;
        }
        if let Some(v) = self.tax_drag {
            request.tax_drag = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct InvestmentFeesPayload {
    age_at_career_start: Option<u32>,
    interest_return_while_working: Option<f64>,
    interest_return_while_retired: Option<f64>,
    tax_drag: Option<f64>,
    annual_savings_first_decade: Option<f64>,
    annual_savings_second_decade: Option<f64>,
    annual_withdrawal_third_decade: Option<f64>,
}

impl InvestmentFeesPayload {
    pub(crate) fn into_request(self) -> InvestmentFeesRequest {
        let mut request = InvestmentFeesRequest::default();
        if let Some(v) = self.age_at_career_start {
            request.age_at_career_start = v;
        }
        if let Some(v) = self.interest_return_while_working {
            request.interest_return_while_working = v;
        }
        if let Some(v) = self.interest_return_while_retired {
            request.interest_return_while_retired = v;
        }
        if let Some(v) = self.tax_drag {
            request.tax_drag = v;
        }
        if let Some(v) = self.annual_savings_first_decade {
            request.annual_savings_first_decade = v;
        }
        if let Some(v) = self.annual_savings_second_decade {
            request.annual_savings_second_decade = v;
        }
        if let Some(v) = self.annual_withdrawal_third_decade {
            request.annual_withdrawal_third_decade = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ChildrenCostPayload {
    annual_expenses_start: Option<f64>,
    annual_expenses_increment: Option<f64>,
    children: Option<Vec<u32>>,
    interests: Option<Vec<f64>>,
    years: Option<u32>,
}

impl ChildrenCostPayload {
    pub(crate) fn into_request(self, defaults: &CalculatorDefaults) -> ChildrenCostRequest {
        let mut request = ChildrenCostRequest::with_defaults(defaults);
        if let Some(v) = self.annual_expenses_start {
            request.annual_expenses_start = v;
        }
        if let Some(v) = self.annual_expenses_increment {
            request.annual_expenses_increment = v;
        }
        if let Some(v) = self.children {
            request.children = v;
        }
        if let Some(v) = self.interests {
            request.interests = v;
        }
        if let Some(v) = self.years {
            request.years = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct SavingsRatePayload {
    salary: Option<f64>,
    match_and_profit_sharing: Option<f64>,
    federal_income_tax: Option<f64>,
    state_income_tax: Option<f64>,
    fica: Option<f64>,
    health_and_dental_insurance: Option<f64>,
    other_deductible_benefits: Option<f64>,
    hsa_investment: Option<f64>,
    four_oh_one_k_or_four_oh_three_b: Option<f64>,
    four_five_seven_b: Option<f64>,
    sep_ira: Option<f64>,
    other_tax_deferred: Option<f64>,
    roth_ira: Option<f64>,
    taxable_account: Option<f64>,
    education: Option<f64>,
    mortgage_principal: Option<f64>,
    student_loan_principal: Option<f64>,
    other_post_tax_investment: Option<f64>,
    current_nest_egg: Option<f64>,
}

impl SavingsRatePayload {
    pub(crate) fn into_request(self) -> SavingsRateRequest {
        let mut request = SavingsRateRequest::default();
        if let Some(v) = self.salary {
            request.salary = v;
        }
        if let Some(v) = self.match_and_profit_sharing {
            request.match_and_profit_sharing = v;
        }
        if let Some(v) = self.federal_income_tax {
            request.federal_income_tax = v;
        }
        if let Some(v) = self.state_income_tax {
            request.state_income_tax = v;
        }
        if let Some(v) = self.fica {
            request.fica = v;
        }
        if let Some(v) = self.health_and_dental_insurance {
            request.health_and_dental_insurance = v;
        }
        if let Some(v) = self.other_deductible_benefits {
            request.other_deductible_benefits = v;
        }
        if let Some(v) = self.hsa_investment {
            request.hsa_investment = v;
        }
        if let Some(v) = self.four_oh_one_k_or_four_oh_three_b {
            request.four_oh_one_k_or_four_oh_three_b = v;
        }
        if let Some(v) = self.four_five_seven_b {
            request.four_five_seven_b = v;
        }
        if let Some(v) = self.sep_ira {
            request.sep_ira = v;
        }
        if let Some(v) = self.other_tax_deferred {
            request.other_tax_deferred = v;
        }
        if let Some(v) = self.roth_ira {
            request.roth_ira = v;
        }
        if let Some(v) = self.taxable_account {
            request.taxable_account = v;
        }
        if let Some(v) = self.education {
            request.education = v;
        }
        if let Some(v) = self.mortgage_principal {
            request.mortgage_principal = v;
        }
        if let Some(v) = self.student_loan_principal {
            request.student_loan_principal = v;
        }
        if let Some(v) = self.other_post_tax_investment {
            request.other_post_tax_investment = v;
        }
        if let Some(v) = self.current_nest_egg {
            request.current_nest_egg = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CoastFirePayload {
    start_age: Option<u32>,
    end_age: Option<u32>,
    start_year: Option<i32>,
    initial_balance: Option<f64>,
    interest: Option<f64>,
    discount_rate: Option<f64>,
    small_contribution: Option<f64>,
    small_contribution_until_age: Option<u32>,
    heavy_contribution: Option<f64>,
    heavy_contribution_until_age: Option<u32>,
    desired_annual_spending: Option<f64>,
}

impl CoastFirePayload {
    pub(crate) fn into_request(self, current_year: i32) -> CoastFireRequest {
        let mut request = CoastFireRequest::starting_in(self.start_year.unwrap_or(current_year));
        if let Some(v) = self.start_age {
            request.start_age = v;
        }
        if let Some(v) = self.end_age {
            request.end_age = v;
        }
        if let Some(v) = self.initial_balance {
            request.initial_balance = v;
        }
        if let Some(v) = self.interest {
            request.interest = v;
        }
        if let Some(v) = self.discount_rate {
            request.discount_rate = v;
        }
        if let Some(v) = self.small_contribution {
            request.small_contribution = v;
        }
        if let Some(v) = self.small_contribution_until_age {
            request.small_contribution_until_age = v;
        }
        if let Some(v) = self.heavy_contribution {
            request.heavy_contribution = v;
        }
        if let Some(v) = self.heavy_contribution_until_age {
            request.heavy_contribution_until_age = v;
        }
        if let Some(v) = self.desired_annual_spending {
            request.desired_annual_spending = v;
        }
        request
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct LifeEventPayload {
    #[serde(rename = "type")]
    event_type: Option<String>,
    assets: Vec<Asset>,
    monthly_contributions: Option<TrackContributions>,
    monthly_cost: Option<f64>,
    years: Option<u32>,
}

fn parse_life_event_kind(raw: &str) -> CalcResult<LifeEventKind> {
    let wanted = raw.trim().to_lowercase();
    LifeEventKind::ALL
        .into_iter()
        .find(|kind| kind.name() == wanted)
        .ok_or_else(|| {
            let names = LifeEventKind::ALL.map(LifeEventKind::name).join(", ");
            CalcError::invalid("type", format!("must be one of the following: {names}"))
        })
}

impl LifeEventPayload {
    pub(crate) fn into_request(self) -> CalcResult<LifeEventRequest> {
        let Some(raw) = self.event_type else {
            return Err(CalcError::invalid("type", "is required"));
        };
        let mut request = LifeEventRequest::new(parse_life_event_kind(&raw)?, self.assets);
        if let Some(v) = self.monthly_contributions {
            request.monthly_contributions = v;
        }
        if let Some(v) = self.monthly_cost {
            request.monthly_cost = v;
        }
        if let Some(v) = self.years {
            request.years = v;
        }
        Ok(request)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct AssetsLiabilitiesPayload {
    assets: Vec<Asset>,
    liabilities: Vec<Liability>,
    monthly_income: Option<f64>,
}

impl AssetsLiabilitiesPayload {
    pub(crate) fn into_request(self) -> AssetsLiabilitiesRequest {
        AssetsLiabilitiesRequest {
            assets: self.assets,
            liabilities: self.liabilities,
            monthly_income: self.monthly_income.unwrap_or(0.0),
        }
    }
}
