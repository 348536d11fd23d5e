use serde::{Deserialize, Serialize};

use super::error::{CalcError, CalcResult};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Daily,
    Monthly,
    Quarterly,
    HalfYear,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Daily,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::HalfYear,
        Frequency::Yearly,
    ];

    pub fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Daily => 365,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::HalfYear => 2,
            Frequency::Yearly => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::HalfYear => "half-year",
            Frequency::Yearly => "yearly",
        }
    }

    pub fn from_periods_per_year(periods: u32) -> Option<Self> {
        Frequency::ALL
            .into_iter()
            .find(|f| f.periods_per_year() == periods)
    }
}

pub fn convert_frequency(name: &str) -> CalcResult<Frequency> {
    Frequency::ALL
        .into_iter()
        .find(|f| f.name() == name)
        .ok_or_else(|| {
            let names = Frequency::ALL.map(Frequency::name).join(",");
            CalcError::invalid("frequency", format!("must be one of the following: {names}"))
        })
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentTiming {
    #[default]
    End,
    Begin,
}

impl PaymentTiming {
    pub(crate) fn factor(self, rate: f64) -> f64 {
        match self {
            PaymentTiming::End => 1.0,
            PaymentTiming::Begin => 1.0 + rate,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSpec {
    pub annual_rate_percent: f64,
    pub periods_per_year: u32,
}

impl RateSpec {
    pub fn new(annual_rate_percent: f64, periods_per_year: u32) -> CalcResult<Self> {
        if !annual_rate_percent.is_finite() || !(0.0..=100.0).contains(&annual_rate_percent) {
            return Err(CalcError::invalid(
                "annual rate percent",
                "must be between 0 and 100",
            ));
        }
        if periods_per_year == 0 {
            return Err(CalcError::invalid("periods per year", "must be > 0"));
        }
        Ok(Self {
            annual_rate_percent,
            periods_per_year,
        })
    }

    pub fn periodic_rate(self) -> f64 {
        (self.annual_rate_percent / 100.0) / self.periods_per_year as f64
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationPeriod {
    pub period: u32,
    pub starting_balance: f64,
    pub payment: f64,
    pub interest_portion: f64,
    pub principal_portion: f64,
    pub ending_balance: f64,
}

impl AmortizationPeriod {
    pub(crate) fn paid_off(period: u32) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationSchedule {
    pub rate: RateSpec,
    pub principal: f64,
    pub term_years: f64,
    pub payment: f64,
    pub total_interest: f64,
    pub periods: Vec<AmortizationPeriod>,
}

impl AmortizationSchedule {
    pub fn last_ending_balance(&self) -> f64 {
        self.periods.last().map_or(0.0, |p| p.ending_balance)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPeriod {
    pub year: u32,
    pub value: f64,
    pub contribution: f64,
    pub value_with_contributions: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionTrack {
    pub name: String,
    pub start_amount: f64,
    pub monthly_contribution: f64,
    pub monthly_cost: Option<f64>,
    pub annual_rate_percent: f64,
    pub periods: Vec<ProjectionPeriod>,
}

impl ProjectionTrack {
    pub fn is_empty(&self) -> bool {
        self.start_amount == 0.0 && self.monthly_contribution == 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackValues {
    pub name: String,
    pub value: f64,
    pub contribution: f64,
    pub value_with_contributions: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedYear {
    pub year: u32,
    pub tracks: Vec<TrackValues>,
    pub total_value: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedProjection {
    pub track_names: Vec<String>,
    pub years: Vec<CombinedYear>,
}
