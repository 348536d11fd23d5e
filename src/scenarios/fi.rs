//! Financial-independence calculators.
//!
//! None of these build a table. Each one runs a handful of `future_value` or
//! `number_of_periods` evaluations over a list of candidate interest rates
//! taken from [`CalculatorDefaults`] and rounds at the end.

use serde::Serialize;

use crate::config::CalculatorDefaults;
use crate::core::{
    CalcError, CalcResult, MAX_PROJECTION_YEARS, PaymentTiming, ceil_to, ensure_non_negative,
    ensure_positive, ensure_within, future_value, number_of_periods, round_to,
};

const NEST_EGG_MULTIPLE: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestYears {
    pub interest: f64,
    pub years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestValue {
    pub interest: f64,
    pub value: f64,
}

/// Years (not months) for monthly deposits on top of `start` to reach `goal`.
/// A goal that is already met takes zero years.
fn years_to_goal(
    annual_rate_percent: f64,
    monthly: f64,
    start: f64,
    goal: f64,
    timing: PaymentTiming,
) -> CalcResult<f64> {
    if start >= goal {
        return Ok(0.0);
    }
    let months = number_of_periods(annual_rate_percent / 100.0 / 12.0, monthly, start, goal, timing)?;
    Ok(months / 12.0)
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole * 100.0 }
}

// --- time to FI ---

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeToFiRequest {
    pub starting_amount: f64,
    pub monthly_investment: f64,
    pub desired_years_expenses_for_fi: u32,
    pub desired_annual_spending: f64,
}

impl Default for TimeToFiRequest {
    fn default() -> Self {
        Self {
            starting_amount: 800_000.0,
            monthly_investment: 5_000.0,
            desired_years_expenses_for_fi: 25,
            desired_annual_spending: 100_000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeToFiResult {
    pub starting_amount: f64,
    pub monthly_investment: f64,
    pub desired_years_expenses_for_fi: u32,
    pub desired_annual_spending: f64,
    pub desired_retirement_savings_for_fi: f64,
    pub current_deficit: f64,
    pub years: Vec<InterestYears>,
}

pub fn time_to_fi(request: &TimeToFiRequest, defaults: &CalculatorDefaults) -> CalcResult<TimeToFiResult> {
    ensure_non_negative("starting amount", request.starting_amount)?;
    ensure_non_negative("monthly investment", request.monthly_investment)?;
    ensure_positive(
        "desired years expenses for fi",
        request.desired_years_expenses_for_fi as f64,
    )?;
    ensure_positive("desired annual spending", request.desired_annual_spending)?;

    let target = request.desired_years_expenses_for_fi as f64 * request.desired_annual_spending;
    let years = defaults
        .interests
        .iter()
        .map(|&interest| {
            let years = years_to_goal(
                interest,
                request.monthly_investment,
                request.starting_amount,
                target,
                PaymentTiming::End,
            )?;
            Ok(InterestYears {
                interest,
                years: round_to(years, 1),
            })
        })
        .collect::<CalcResult<Vec<_>>>()?;

    Ok(TimeToFiResult {
        starting_amount: request.starting_amount,
        monthly_investment: request.monthly_investment,
        desired_years_expenses_for_fi: request.desired_years_expenses_for_fi,
        desired_annual_spending: request.desired_annual_spending,
        desired_retirement_savings_for_fi: target,
        current_deficit: target - request.starting_amount,
        years,
    })
}

// --- rule of 72 ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOf72Row {
    pub starting_amount: f64,
    pub interest: f64,
    pub modifier: u32,
    pub ending_amount: f64,
    pub years: f64,
}

pub const DEFAULT_RULE_OF_72_AMOUNT: f64 = 100_000.0;
pub const DEFAULT_RULE_OF_72_INTEREST: f64 = 8.0;

/// Rules of 72, 114 and 144: rough years to double, triple and quadruple.
pub fn rule_of_72(starting_amount: f64, interest: f64) -> CalcResult<Vec<RuleOf72Row>> {
    ensure_non_negative("starting amount", starting_amount)?;
    ensure_positive("interest", interest)?;

    let starting_amount = starting_amount.round();
    Ok([(72.0, 2), (114.0, 3), (144.0, 4)]
        .into_iter()
        .map(|(rule, modifier)| RuleOf72Row {
            starting_amount,
            interest,
            modifier,
            ending_amount: starting_amount * modifier as f64,
            years: round_to(rule / interest, 1),
        })
        .collect())
}

// --- added time to FI ---

pub const DEFAULT_ADDED_TIME_MONTHLY_INVESTMENT: f64 = 10_000.0;
pub const DEFAULT_TOTAL_ADDITIONAL_EXPENSE: f64 = 422_000.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedTimeResult {
    pub monthly_investment: f64,
    pub total_additional_expense: f64,
    pub years: Vec<InterestYears>,
}

pub fn added_time_to_fi(
    monthly_investment: f64,
    total_additional_expense: f64,
    defaults: &CalculatorDefaults,
) -> CalcResult<AddedTimeResult> {
    ensure_positive("monthly investment", monthly_investment)?;
    ensure_non_negative("total additional expense", total_additional_expense)?;

    let monthly_investment = monthly_investment.round();
    let total_additional_expense = total_additional_expense.round();
    let years = defaults
        .interests
        .iter()
        .map(|&interest| {
            let years = years_to_goal(
                interest,
                monthly_investment,
                0.0,
                total_additional_expense,
                PaymentTiming::End,
            )?;
            Ok(InterestYears {
                interest,
                years: round_to(years, 1),
            })
        })
        .collect::<CalcResult<Vec<_>>>()?;

    Ok(AddedTimeResult {
        monthly_investment,
        total_additional_expense,
        years,
    })
}

// --- ten million dream ---

pub const DEFAULT_TEN_MILLION_MONTHLY_INVESTMENT: f64 = 10_000.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MillionGoal {
    pub million: f64,
    pub years: Vec<InterestYears>,
}

pub fn ten_million_dream(
    monthly_investment: f64,
    defaults: &CalculatorDefaults,
) -> CalcResult<Vec<MillionGoal>> {
    ensure_positive("monthly investment", monthly_investment)?;

    defaults
        .ten_million
        .iter()
        .map(|&million| {
            let years = defaults
                .ten_million_interests
                .iter()
                .map(|&interest| {
                    let years =
                        years_to_goal(interest, monthly_investment, 0.0, million, PaymentTiming::Begin)?;
                    Ok(InterestYears {
                        interest,
                        years: round_to(years, 1),
                    })
                })
                .collect::<CalcResult<Vec<_>>>()?;
            Ok(MillionGoal { million, years })
        })
        .collect()
}

// --- compound interest ---

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompoundInterestRequest {
    pub starting_amount: f64,
    pub monthly_investment: f64,
    pub interest_rate: f64,
    pub number_of_years: u32,
    pub investment_fees: f64,
    pub tax_drag: f64,
}

impl CompoundInterestRequest {
    pub fn with_defaults(defaults: &CalculatorDefaults) -> Self {
        Self {
            starting_amount: 0.0,
            monthly_investment: 5_000.0,
            interest_rate: defaults.interest,
            number_of_years: 25,
            investment_fees: defaults.investment_fee,
            tax_drag: defaults.tax_drag,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundInterestRow {
    pub starting_amount: f64,
    pub monthly_investment: f64,
    pub interest: f64,
    pub number_of_years: u32,
    pub investment_fees: f64,
    pub tax_drag: f64,
    pub frequency: u32,
    pub compounded_beginning: f64,
    pub compounded_end: f64,
}

pub fn compound_interest(
    request: &CompoundInterestRequest,
    defaults: &CalculatorDefaults,
) -> CalcResult<Vec<CompoundInterestRow>> {
    ensure_non_negative("starting amount", request.starting_amount)?;
    ensure_non_negative("monthly investment", request.monthly_investment)?;
    ensure_within(
        "number of years",
        request.number_of_years as f64,
        MAX_PROJECTION_YEARS as f64,
    )?;
    ensure_non_negative("investment fees", request.investment_fees)?;
    ensure_non_negative("tax drag", request.tax_drag)?;

    let net_rate = request.interest_rate - request.investment_fees - request.tax_drag;
    defaults
        .frequencies
        .iter()
        .map(|&frequency| {
            if frequency == 0 {
                return Err(CalcError::invalid("frequency", "must be > 0"));
            }
            let rate = net_rate / 100.0 / frequency as f64;
            let periods = request.number_of_years * frequency;
            let payment = request.monthly_investment * 12.0 / frequency as f64;
            let grow = |timing| future_value(rate, periods, payment, request.starting_amount, timing);
            Ok(CompoundInterestRow {
                starting_amount: request.starting_amount,
                monthly_investment: request.monthly_investment,
                interest: request.interest_rate,
                number_of_years: request.number_of_years,
                investment_fees: request.investment_fees,
                tax_drag: request.tax_drag,
                frequency,
                compounded_beginning: ceil_to(grow(PaymentTiming::Begin), 0),
                compounded_end: ceil_to(grow(PaymentTiming::End), 0),
            })
        })
        .collect()
}

// --- investment fees effect ---

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentFeesRequest {
    pub age_at_career_start: u32,
    pub interest_return_while_working: f64,
    pub interest_return_while_retired: f64,
    pub tax_drag: f64,
    pub annual_savings_first_decade: f64,
    pub annual_savings_second_decade: f64,
    pub annual_withdrawal_third_decade: f64,
}

impl Default for InvestmentFeesRequest {
    fn default() -> Self {
        Self {
            age_at_career_start: 32,
            interest_return_while_working: 8.0,
            interest_return_while_retired: 5.0,
            tax_drag: 0.30,
            annual_savings_first_decade: 50_000.0,
            annual_savings_second_decade: 100_000.0,
            annual_withdrawal_third_decade: 70_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeValue {
    pub age: u32,
    pub value: f64,
    pub interest: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEffect {
    pub fee: f64,
    pub values: Vec<AgeValue>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentFeesResult {
    pub age_at_career_start: u32,
    pub interest_return_while_working: f64,
    pub interest_return_while_retired: f64,
    pub tax_drag: f64,
    pub annual_savings_first_decade: f64,
    pub annual_savings_second_decade: f64,
    pub annual_withdrawal_third_decade: f64,
    pub annual_withdrawal_fourth_decade: f64,
    pub annual_withdrawal_fifth_decade: f64,
    pub annual_withdrawal_sixth_decade: f64,
    pub annual_withdrawal_seventh_decade: f64,
    pub fees: Vec<FeeEffect>,
}

const DECADE_MONTHS: u32 = 120;
const WITHDRAWAL_STEP_UP: f64 = 1.25;

/// Two decades of saving followed by five decades of retirement, once per
/// default fee. Retirement withdrawals step up by a quarter in the fourth and
/// fifth decades and then stay flat. Each retirement value draws its decade's
/// withdrawal from the balance at retirement for the whole span up to that
/// decade.
pub fn investment_fees_effect(
    request: &InvestmentFeesRequest,
    defaults: &CalculatorDefaults,
) -> CalcResult<InvestmentFeesResult> {
    ensure_positive("age at career start", request.age_at_career_start as f64)?;
    ensure_non_negative("tax drag", request.tax_drag)?;
    ensure_non_negative("annual savings first decade", request.annual_savings_first_decade)?;
    ensure_non_negative("annual savings second decade", request.annual_savings_second_decade)?;
    ensure_non_negative(
        "annual withdrawal third decade",
        request.annual_withdrawal_third_decade,
    )?;

    let third = request.annual_withdrawal_third_decade;
    let fourth = ceil_to(WITHDRAWAL_STEP_UP * third, 0);
    let fifth = ceil_to(WITHDRAWAL_STEP_UP * fourth, 0);
    let withdrawals = [third, fourth, fifth, fifth, fifth];

    let age = request.age_at_career_start;
    let fees = defaults
        .fees
        .iter()
        .map(|&fee| {
            let working = (request.interest_return_while_working - request.tax_drag - fee) / 100.0;
            let retired = (request.interest_return_while_retired - request.tax_drag - fee) / 100.0;
            let working_shown = round_to(working * 100.0, 1);
            let retired_shown = round_to(retired * 100.0, 1);

            let after_first = future_value(
                working / 12.0,
                DECADE_MONTHS,
                request.annual_savings_first_decade / 12.0,
                0.0,
                PaymentTiming::Begin,
            );
            let at_retirement = future_value(
                working / 12.0,
                DECADE_MONTHS,
                request.annual_savings_second_decade / 12.0,
                after_first,
                PaymentTiming::Begin,
            );

            let mut values = vec![
                AgeValue {
                    age: age + 10,
                    value: ceil_to(after_first, 0),
                    interest: working_shown,
                },
                AgeValue {
                    age: age + 20,
                    value: ceil_to(at_retirement, 0),
                    interest: working_shown,
                },
            ];
            for (decade, withdrawal) in (1u32..).zip(withdrawals) {
                let balance = future_value(
                    retired / 12.0,
                    DECADE_MONTHS * decade,
                    -withdrawal / 12.0,
                    at_retirement,
                    PaymentTiming::Begin,
                );
                values.push(AgeValue {
                    age: age + 20 + 10 * decade,
                    value: ceil_to(balance, 0),
                    interest: retired_shown,
                });
            }
            FeeEffect { fee, values }
        })
        .collect();

    Ok(InvestmentFeesResult {
        age_at_career_start: age,
        interest_return_while_working: request.interest_return_while_working,
        interest_return_while_retired: request.interest_return_while_retired,
        tax_drag: request.tax_drag,
        annual_savings_first_decade: request.annual_savings_first_decade,
        annual_savings_second_decade: request.annual_savings_second_decade,
        annual_withdrawal_third_decade: third,
        annual_withdrawal_fourth_decade: fourth,
        annual_withdrawal_fifth_decade: fifth,
        annual_withdrawal_sixth_decade: fifth,
        annual_withdrawal_seventh_decade: fifth,
        fees,
    })
}

// --- cost of raising children ---

pub const DEFAULT_CHILD_REARING_YEARS: u32 = 18;

#[derive(Debug, Clone, PartialEq)]
pub struct ChildrenCostRequest {
    pub annual_expenses_start: f64,
    pub annual_expenses_increment: f64,
    pub children: Vec<u32>,
    pub interests: Vec<f64>,
    pub years: u32,
}

impl ChildrenCostRequest {
    pub fn with_defaults(defaults: &CalculatorDefaults) -> Self {
        Self {
            annual_expenses_start: 5_000.0,
            annual_expenses_increment: 4_000.0,
            children: defaults.children.clone(),
            interests: defaults.interests.clone(),
            years: DEFAULT_CHILD_REARING_YEARS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenCost {
    pub children: u32,
    pub years: u32,
    pub annual_expenses: f64,
    pub total_expenses: f64,
    pub cost: Vec<InterestValue>,
}

pub fn cost_of_raising_children(
    request: &ChildrenCostRequest,
    defaults: &CalculatorDefaults,
) -> CalcResult<Vec<ChildrenCost>> {
    ensure_non_negative("annual expenses start", request.annual_expenses_start)?;
    ensure_non_negative("annual expenses increment", request.annual_expenses_increment)?;
    ensure_within(
        "years",
        request.years as f64,
        MAX_PROJECTION_YEARS as f64,
    )?;
    if request.children.contains(&0) {
        return Err(CalcError::invalid("children", "must all be > 0"));
    }

    let digits = defaults.rounding_digits;
    Ok(request
        .children
        .iter()
        .map(|&children| {
            let annual_expenses = request.annual_expenses_start
                + request.annual_expenses_increment * (children - 1) as f64;
            let cost = request
                .interests
                .iter()
                .map(|&interest| InterestValue {
                    interest,
                    value: round_to(
                        future_value(
                            interest / 100.0 / 12.0,
                            request.years * 12,
                            annual_expenses / 12.0,
                            0.0,
                            PaymentTiming::Begin,
                        ),
                        digits,
                    ),
                })
                .collect();
            ChildrenCost {
                children,
                years: request.years,
                annual_expenses: round_to(annual_expenses, digits),
                total_expenses: round_to(annual_expenses * request.years as f64, digits),
                cost,
            }
        })
        .collect())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyCost {
    pub name: &'static str,
    pub children: Vec<ChildrenCost>,
}

const FAMILIES: [(&str, f64, f64); 4] = [
    ("The Frugal Family", 5_000.0, 4_000.0),
    ("The Moderate Spenders", 9_000.0, 5_000.0),
    ("The Department of Agriculture Estimate", 13_000.0, 10_000.0),
    ("The Upper Crust", 30_000.0, 30_000.0),
];

pub fn cost_of_raising_children_families(defaults: &CalculatorDefaults) -> CalcResult<Vec<FamilyCost>> {
    FAMILIES
        .iter()
        .map(|&(name, start, increment)| {
            let request = ChildrenCostRequest {
                annual_expenses_start: start,
                annual_expenses_increment: increment,
                ..ChildrenCostRequest::with_defaults(defaults)
            };
            Ok(FamilyCost {
                name,
                children: cost_of_raising_children(&request, defaults)?,
            })
        })
        .collect()
}

// --- savings rate ---

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsRateRequest {
    pub salary: f64,
    pub match_and_profit_sharing: f64,
    pub federal_income_tax: f64,
    pub state_income_tax: f64,
    pub fica: f64,
    pub health_and_dental_insurance: f64,
    pub other_deductible_benefits: f64,
    pub hsa_investment: f64,
    pub four_oh_one_k_or_four_oh_three_b: f64,
    pub four_five_seven_b: f64,
    pub sep_ira: f64,
    pub other_tax_deferred: f64,
    pub roth_ira: f64,
    pub taxable_account: f64,
    pub education: f64,
    pub mortgage_principal: f64,
    pub student_loan_principal: f64,
    pub other_post_tax_investment: f64,
    pub current_nest_egg: f64,
}

impl Default for SavingsRateRequest {
    fn default() -> Self {
        Self {
            salary: 300_000.0,
            match_and_profit_sharing: 20_000.0,
            federal_income_tax: 50_000.0,
            state_income_tax: 10_000.0,
            fica: 12_000.0,
            health_and_dental_insurance: 15_000.0,
            other_deductible_benefits: 0.0,
            hsa_investment: 7_000.0,
            four_oh_one_k_or_four_oh_three_b: 19_500.0,
            four_five_seven_b: 19_500.0,
            sep_ira: 0.0,
            other_tax_deferred: 0.0,
            roth_ira: 12_000.0,
            taxable_account: 16_000.0,
            education: 10_000.0,
            mortgage_principal: 18_000.0,
            student_loan_principal: 12_000.0,
            other_post_tax_investment: 0.0,
            current_nest_egg: 0.0,
        }
    }
}

impl SavingsRateRequest {
    fn named_fields(&self) -> [(&'static str, f64); 19] {
        [
            ("salary", self.salary),
            ("match and profit sharing", self.match_and_profit_sharing),
            ("federal income tax", self.federal_income_tax),
            ("state income tax", self.state_income_tax),
            ("fica", self.fica),
            ("health and dental insurance", self.health_and_dental_insurance),
            ("other deductible benefits", self.other_deductible_benefits),
            ("hsa investment", self.hsa_investment),
            ("401k or 403b", self.four_oh_one_k_or_four_oh_three_b),
            ("457b", self.four_five_seven_b),
            ("sep ira", self.sep_ira),
            ("other tax deferred", self.other_tax_deferred),
            ("roth ira", self.roth_ira),
            ("taxable account", self.taxable_account),
            ("education", self.education),
            ("mortgage principal", self.mortgage_principal),
            ("student loan principal", self.student_loan_principal),
            ("other post tax investment", self.other_post_tax_investment),
            ("current nest egg", self.current_nest_egg),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRateResult {
    pub salary: f64,
    pub match_and_profit_sharing: f64,
    pub federal_income_tax: f64,
    pub state_income_tax: f64,
    pub fica: f64,
    pub health_and_dental_insurance: f64,
    pub other_deductible_benefits: f64,
    pub hsa_investment: f64,
    pub four_oh_one_k_or_four_oh_three_b: f64,
    pub four_five_seven_b: f64,
    pub sep_ira: f64,
    pub other_tax_deferred: f64,
    pub roth_ira: f64,
    pub taxable_account: f64,
    pub education: f64,
    pub mortgage_principal: f64,
    pub student_loan_principal: f64,
    pub other_post_tax_investment: f64,
    pub current_nest_egg: f64,
    pub post_tax_income: f64,
    pub take_home_pay: f64,
    pub annual_spending: f64,
    pub all_contributions: f64,
    pub monthly_contribution: f64,
    pub max_potential_contribution: f64,
    pub savings_rate_net: f64,
    pub savings_rate_gross: f64,
    pub required_nest_egg_for_fi: f64,
    pub years: Vec<InterestYears>,
}

pub fn savings_rate(
    request: &SavingsRateRequest,
    defaults: &CalculatorDefaults,
) -> CalcResult<SavingsRateResult> {
    for (name, value) in request.named_fields() {
        ensure_non_negative(name, value)?;
    }

    let r = request;
    let compensation = r.salary + r.match_and_profit_sharing;
    let income_taxes = r.federal_income_tax + r.state_income_tax + r.fica;
    let post_tax_income = r.salary - income_taxes;
    let pre_tax_spending = r.health_and_dental_insurance + r.other_deductible_benefits;
    let pre_tax_investments = r.hsa_investment
        + r.four_oh_one_k_or_four_oh_three_b
        + r.four_five_seven_b
        + r.sep_ira
        + r.other_tax_deferred;
    let post_tax_investments = r.roth_ira
        + r.taxable_account
        + r.education
        + r.mortgage_principal
        + r.student_loan_principal
        + r.other_post_tax_investment;

    let take_home_pay = post_tax_income - pre_tax_spending - pre_tax_investments;
    let annual_spending = take_home_pay - post_tax_investments;
    let all_contributions = r.match_and_profit_sharing + pre_tax_investments + post_tax_investments;
    let monthly_contribution = all_contributions / 12.0;
    let max_potential_contribution = take_home_pay + r.match_and_profit_sharing + pre_tax_investments;
    let required_nest_egg_for_fi = annual_spending * NEST_EGG_MULTIPLE;

    let digits = defaults.rounding_digits;
    let years = defaults
        .interests
        .iter()
        .map(|&interest| {
            let years = years_to_goal(
                interest,
                monthly_contribution,
                r.current_nest_egg,
                required_nest_egg_for_fi,
                PaymentTiming::End,
            )?;
            Ok(InterestYears {
                interest,
                years: round_to(years, digits),
            })
        })
        .collect::<CalcResult<Vec<_>>>()?;

    Ok(SavingsRateResult {
        salary: r.salary,
        match_and_profit_sharing: r.match_and_profit_sharing,
        federal_income_tax: r.federal_income_tax,
        state_income_tax: r.state_income_tax,
        fica: r.fica,
        health_and_dental_insurance: r.health_and_dental_insurance,
        other_deductible_benefits: r.other_deductible_benefits,
        hsa_investment: r.hsa_investment,
        four_oh_one_k_or_four_oh_three_b: r.four_oh_one_k_or_four_oh_three_b,
        four_five_seven_b: r.four_five_seven_b,
        sep_ira: r.sep_ira,
        other_tax_deferred: r.other_tax_deferred,
        roth_ira: r.roth_ira,
        taxable_account: r.taxable_account,
        education: r.education,
        mortgage_principal: r.mortgage_principal,
        student_loan_principal: r.student_loan_principal,
        other_post_tax_investment: r.other_post_tax_investment,
        current_nest_egg: r.current_nest_egg,
        post_tax_income: round_to(post_tax_income, digits),
        take_home_pay: round_to(take_home_pay, digits),
        annual_spending: round_to(annual_spending, digits),
        all_contributions: round_to(all_contributions, digits),
        monthly_contribution: round_to(monthly_contribution, digits),
        max_potential_contribution: round_to(max_potential_contribution, digits),
        savings_rate_net: round_to(percent_of(all_contributions, max_potential_contribution), digits),
        savings_rate_gross: round_to(percent_of(all_contributions, compensation), digits),
        required_nest_egg_for_fi: round_to(required_nest_egg_for_fi, digits),
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

    fn years_of(rows: &[InterestYears]) -> Vec<f64> {
        rows.iter().map(|r| r.years).collect()
    }

    #[test]
    fn time_to_fi_defaults() {
        let defaults = CalculatorDefaults::default();
        let result = time_to_fi(&TimeToFiRequest::default(), &defaults).expect("valid request");
        assert_approx(result.desired_retirement_savings_for_fi, 2_500_000.0);
        assert_approx(result.current_deficit, 1_700_000.0);
        assert_eq!(years_of(&result.years), vec![18.5, 13.9, 11.1, 9.3]);
    }

    #[test]
    fn time_to_fi_when_already_there() {
        let defaults = CalculatorDefaults::default();
        let request = TimeToFiRequest {
            starting_amount: 3_000_000.0,
            ..TimeToFiRequest::default()
        };
        let result = time_to_fi(&request, &defaults).expect("valid request");
        assert!(result.years.iter().all(|y| y.years == 0.0));
        assert!(result.current_deficit < 0.0);
    }

    #[test]
    fn rule_of_72_rows() {
        let rows = rule_of_72(350_000.4, 8.0).expect("valid request");
        assert_eq!(rows.len(), 3);
        assert_approx(rows[0].starting_amount, 350_000.0);
        assert_eq!(rows.iter().map(|r| r.modifier).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_approx(rows[0].years, 9.0);
        assert_approx(rows[1].years, 14.3);
        assert_approx(rows[2].years, 18.0);
        for row in &rows {
            assert_approx(row.ending_amount, row.starting_amount * row.modifier as f64);
        }
    }

    #[test]
    fn rule_of_72_needs_positive_interest() {
        let err = rule_of_72(100_000.0, 0.0).expect_err("zero interest");
        assert_eq!(err.parameter(), Some("interest"));
    }

    #[test]
    fn added_time_defaults() {
        let defaults = CalculatorDefaults::default();
        let result = added_time_to_fi(
            DEFAULT_ADDED_TIME_MONTHLY_INVESTMENT,
            DEFAULT_TOTAL_ADDITIONAL_EXPENSE,
            &defaults,
        )
        .expect("valid request");
        assert_eq!(years_of(&result.years), vec![3.4, 3.3, 3.2, 3.1]);
    }

    #[test]
    fn ten_million_dream_covers_every_goal_and_rate() {
        let defaults = CalculatorDefaults::default();
        let goals = ten_million_dream(10_000.0, &defaults).expect("valid request");
        assert_eq!(goals.len(), defaults.ten_million.len());
        assert!(goals.iter().all(|g| g.years.len() == 11));

        let one_million = &goals[0];
        assert_approx(one_million.years[0].years, 8.3);
        assert_approx(one_million.years[7].years, 6.6);
        let ten_million = &goals[9];
        assert_approx(ten_million.years[0].years, 83.3);
        assert_approx(ten_million.years[7].years, 27.5);
    }

    #[test]
    fn compound_interest_per_frequency() {
        let defaults = CalculatorDefaults::default();
        let rows = compound_interest(&CompoundInterestRequest::with_defaults(&defaults), &defaults)
            .expect("valid request");
        assert_eq!(rows.iter().map(|r| r.frequency).collect::<Vec<_>>(), vec![365, 12, 1]);

        let monthly = rows[1];
        assert!((monthly.compounded_beginning - 3_482_295.0).abs() <= 1.0);
        assert!((monthly.compounded_end - 3_464_970.0).abs() <= 1.0);
        let yearly = rows[2];
        assert!((yearly.compounded_end - 3_291_871.0).abs() <= 1.0);
        for row in &rows {
            assert!(row.compounded_beginning > row.compounded_end);
            assert_eq!(row.compounded_end.fract(), 0.0);
        }
    }

    #[test]
    fn compound_interest_fee_and_tax_drag_come_from_configuration() {
        let baseline = CalculatorDefaults::default();
        let costly = CalculatorDefaults::from_lookup(|key| match key {
            "DEFAULT_FEE" => Some("1.0".to_string()),
            "DEFAULT_TAX_DRAG" => Some("1.0".to_string()),
            _ => None,
        });
        let request = CompoundInterestRequest::with_defaults(&costly);
        assert_approx(request.investment_fees, 1.0);
        assert_approx(request.tax_drag, 1.0);

        let cheap = compound_interest(&CompoundInterestRequest::with_defaults(&baseline), &baseline)
            .expect("valid request");
        let expensive = compound_interest(&request, &costly).expect("valid request");
        assert!(expensive[1].compounded_end < cheap[1].compounded_end);
    }

    #[test]
    fn investment_fees_effect_defaults() {
        let defaults = CalculatorDefaults::default();
        let result = investment_fees_effect(&InvestmentFeesRequest::default(), &defaults)
            .expect("valid request");

        assert_approx(result.annual_withdrawal_fourth_decade, 87_500.0);
        assert_approx(result.annual_withdrawal_fifth_decade, 109_375.0);
        assert_approx(result.annual_withdrawal_seventh_decade, 109_375.0);
        assert_eq!(result.fees.len(), defaults.fees.len());

        let cheapest = &result.fees[0];
        let ages = cheapest.values.iter().map(|v| v.age).collect::<Vec<_>>();
        assert_eq!(ages, vec![42, 52, 62, 72, 82, 92, 102]);
        assert_approx(cheapest.values[0].interest, 7.6);
        assert!((cheapest.values[0].value - 750_221.0).abs() <= 1.0);
        assert!((cheapest.values[1].value - 3_100_779.0).abs() <= 1.0);
        assert!((cheapest.values[2].value - 4_017_456.0).abs() <= 1.0);
        assert_approx(cheapest.values[2].interest, 4.6);

        let priciest = &result.fees[6];
        assert!(priciest.values[1].value < cheapest.values[1].value);
    }

    #[test]
    fn cost_of_raising_children_defaults() {
        let defaults = CalculatorDefaults::default();
        let request = ChildrenCostRequest::with_defaults(&defaults);
        let costs = cost_of_raising_children(&request, &defaults).expect("valid request");

        assert_eq!(costs.len(), 4);
        assert_approx(costs[0].annual_expenses, 5_000.0);
        assert_approx(costs[0].total_expenses, 90_000.0);
        assert_approx(costs[2].annual_expenses, 13_000.0);
        assert!((costs[0].cost[0].value - 108_405.36).abs() <= 0.01);
        assert!((costs[0].cost[3].value - 201_369.46).abs() <= 0.01);
    }

    #[test]
    fn cost_of_raising_children_rejects_zero_children() {
        let defaults = CalculatorDefaults::default();
        let request = ChildrenCostRequest {
            children: vec![1, 0],
            ..ChildrenCostRequest::with_defaults(&defaults)
        };
        let err = cost_of_raising_children(&request, &defaults).expect_err("zero children");
        assert_eq!(err.parameter(), Some("children"));
    }

    #[test]
    fn families_are_ordered_by_spending() {
        let defaults = CalculatorDefaults::default();
        let families = cost_of_raising_children_families(&defaults).expect("valid defaults");
        assert_eq!(families.len(), 4);
        assert_eq!(families[0].name, "The Frugal Family");
        assert_eq!(families[3].name, "The Upper Crust");
        assert_approx(families[3].children[1].annual_expenses, 60_000.0);
        for pair in families.windows(2) {
            assert!(pair[1].children[0].total_expenses > pair[0].children[0].total_expenses);
        }
    }

    #[test]
    fn savings_rate_defaults() {
        let defaults = CalculatorDefaults::default();
        let result = savings_rate(&SavingsRateRequest::default(), &defaults).expect("valid request");

        assert_approx(result.post_tax_income, 228_000.0);
        assert_approx(result.take_home_pay, 167_000.0);
        assert_approx(result.annual_spending, 99_000.0);
        assert_approx(result.all_contributions, 134_000.0);
        assert_approx(result.monthly_contribution, 11_166.67);
        assert_approx(result.max_potential_contribution, 233_000.0);
        assert_approx(result.savings_rate_net, 57.51);
        assert_approx(result.required_nest_egg_for_fi, 2_475_000.0);
        assert_eq!(years_of(&result.years), vec![15.73, 13.85, 12.46, 11.38]);
    }

    #[test]
    fn savings_rate_rejects_negative_inputs() {
        let defaults = CalculatorDefaults::default();
        let request = SavingsRateRequest {
            roth_ira: -1.0,
            ..SavingsRateRequest::default()
        };
        let err = savings_rate(&request, &defaults).expect_err("negative field");
        assert_eq!(err.parameter(), Some("roth ira"));
    }
}
