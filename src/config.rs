use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::Frequency;

const MAX_ROUNDING_DIGITS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalculatorDefaults {
    pub rounding_digits: u32,
    pub frequency: u32,
    pub interest: f64,
    pub average_bank_interest: f64,
    pub investment_fee: f64,
    pub tax_drag: f64,
    pub interests: Vec<f64>,
    pub frequencies: Vec<u32>,
    pub fees: Vec<f64>,
    pub children: Vec<u32>,
    pub ten_million: Vec<f64>,
    pub ten_million_interests: Vec<f64>,
    pub cors_origins: Vec<String>,
}

impl Default for CalculatorDefaults {
    fn default() -> Self {
        Self {
            rounding_digits: 2,
            frequency: 12,
            interest: 7.0,
            average_bank_interest: 0.06,
            investment_fee: 0.50,
            tax_drag: 0.50,
            interests: vec![2.0, 4.0, 6.0, 8.0],
            frequencies: vec![365, 12, 1],
            fees: vec![0.10, 0.50, 1.00, 1.50, 2.00, 2.50, 3.00],
            children: vec![1, 2, 3, 4],
            ten_million: vec![
                1_000_000.0,
                2_000_000.0,
                3_000_000.0,
                4_000_000.0,
                5_000_000.0,
                6_000_000.0,
                7_000_000.0,
                8_000_000.0,
                9_000_000.0,
                10_000_000.0,
                100_000_000.0,
            ],
            ten_million_interests: (0..=10).map(f64::from).collect(),
            cors_origins: vec![
                "http://localhost:4100".to_string(),
                "http://localhost:1337".to_string(),
            ],
        }
    }
}

impl CalculatorDefaults {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut defaults = Self::default();
        override_from(&lookup, "DEFAULT_ROUNDING_DIGIT", &mut defaults.rounding_digits);
        if defaults.rounding_digits > MAX_ROUNDING_DIGITS {
            tracing::warn!(
                digits = defaults.rounding_digits,
                max = MAX_ROUNDING_DIGITS,
                "clamping rounding digits"
            );
            defaults.rounding_digits = MAX_ROUNDING_DIGITS;
        }
        override_from(&lookup, "DEFAULT_FREQUENCY", &mut defaults.frequency);
        if Frequency::from_periods_per_year(defaults.frequency).is_none() {
            tracing::warn!(
                periods = defaults.frequency,
                "ignoring unsupported default frequency"
            );
            defaults.frequency = Frequency::Monthly.periods_per_year();
        }
        override_from(&lookup, "DEFAULT_INTEREST", &mut defaults.interest);
        override_from(
            &lookup,
            "DEFAULT_AVERAGE_BANK_INTEREST",
            &mut defaults.average_bank_interest,
        );
        override_from(&lookup, "DEFAULT_FEE", &mut defaults.investment_fee);
        override_from(&lookup, "DEFAULT_TAX_DRAG", &mut defaults.tax_drag);
        if let Some(origins) = lookup("CORS_ORIGINS") {
            defaults.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        defaults
    }

    pub fn default_frequency(&self) -> Frequency {
        Frequency::from_periods_per_year(self.frequency).unwrap_or(Frequency::Monthly)
    }
}

fn override_from<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => tracing::warn!(key, value = %raw, "ignoring unparsable default override"),
    }
}
