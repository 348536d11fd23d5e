use serde::{Deserialize, Serialize};

use crate::config::CalculatorDefaults;
use crate::core::{CalcResult, ensure_non_negative, round_to};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Cash,
    Car,
    House,
    Investment,
    Stock,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum LiabilityType {
    #[serde(rename = "personal loan")]
    PersonalLoan,
    #[serde(rename = "student loan")]
    StudentLoan,
    #[serde(rename = "auto loan")]
    AutoLoan,
    #[serde(rename = "auto lease")]
    AutoLease,
    #[serde(rename = "credit card")]
    CreditCard,
    #[serde(rename = "rent")]
    Rent,
    #[serde(rename = "mortgage")]
    Mortgage,
    #[serde(rename = "house renovation")]
    HouseRenovation,
    #[serde(rename = "rv")]
    Rv,
    #[default]
    #[serde(rename = "other")]
    #[serde(other)]
    Other,
}

impl LiabilityType {
    pub fn counts_toward_debt_to_income(self) -> bool {
        !matches!(self, LiabilityType::HouseRenovation | LiabilityType::Rv)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub type_name: AssetType,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liability {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub type_name: LiabilityType,
    pub value: f64,
    #[serde(default)]
    pub monthly_payment: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssetsLiabilitiesRequest {
    pub assets: Vec<Asset>,
    pub liabilities: Vec<Liability>,
    pub monthly_income: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratios {
    pub debt_to_income_ratio: f64,
    pub cash_to_cc_ratio: f64,
    pub cc_to_cash_ratio: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsLiabilitiesResult {
    pub assets: Vec<Asset>,
    pub liabilities: Vec<Liability>,
    pub assets_total: f64,
    pub assets_mean: f64,
    pub liabilities_total: f64,
    pub liabilities_mean: f64,
    pub analytics: Ratios,
}

fn ratio_percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

fn total_of<T>(items: &[T], value: impl Fn(&T) -> f64) -> f64 {
    items.iter().map(value).sum()
}

/// Totals, means and ratios over a snapshot of assets and liabilities.
///
/// Cash-to-credit-card divides cash by credit-card debt, and
/// credit-card-to-cash divides the other way. A zero denominator yields 0.
pub fn analyze(
    request: &AssetsLiabilitiesRequest,
    defaults: &CalculatorDefaults,
) -> CalcResult<AssetsLiabilitiesResult> {
    for asset in &request.assets {
        ensure_non_negative("asset value", asset.value)?;
    }
    for liability in &request.liabilities {
        ensure_non_negative("liability value", liability.value)?;
        ensure_non_negative("liability monthly payment", liability.monthly_payment)?;
    }
    ensure_non_negative("monthly income", request.monthly_income)?;

    let digits = defaults.rounding_digits;
    let assets_total = total_of(&request.assets, |a| a.value);
    let liabilities_total = total_of(&request.liabilities, |l| l.value);

    let cash = request
        .assets
        .iter()
        .filter(|a| a.type_name == AssetType::Cash)
        .map(|a| a.value)
        .sum::<f64>();
    let credit_card = request
        .liabilities
        .iter()
        .filter(|l| l.type_name == LiabilityType::CreditCard)
        .map(|l| l.value)
        .sum::<f64>();
    let monthly_debt_payments = request
        .liabilities
        .iter()
        .filter(|l| l.type_name.counts_toward_debt_to_income())
        .map(|l| l.monthly_payment)
        .sum::<f64>();

    let analytics = Ratios {
        debt_to_income_ratio: round_to(
            ratio_percent(monthly_debt_payments, request.monthly_income),
            digits,
        ),
        cash_to_cc_ratio: round_to(ratio_percent(cash, credit_card), digits),
        cc_to_cash_ratio: round_to(ratio_percent(credit_card, cash), digits),
    };

    Ok(AssetsLiabilitiesResult {
        assets: request.assets.clone(),
        liabilities: request.liabilities.clone(),
        assets_total: round_to(assets_total, digits),
        assets_mean: round_to(mean(assets_total, request.assets.len()), digits),
        liabilities_total: round_to(liabilities_total, digits),
        liabilities_mean: round_to(mean(liabilities_total, request.liabilities.len()), digits),
        analytics,
    })
}
