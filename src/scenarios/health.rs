use crate::config::CalculatorDefaults;
use crate::core::{CalcError, CalcResult, ensure_non_negative, ensure_positive, round_to};

pub const DEFAULT_WEIGHT_LBS: f64 = 165.0;
pub const DEFAULT_HEIGHT_FEET: f64 = 6.0;
pub const DEFAULT_HEIGHT_INCHES: f64 = 0.0;
pub const DEFAULT_WEIGHT_KGS: f64 = 75.0;
pub const DEFAULT_HEIGHT_CMS: f64 = 183.0;

const IMPERIAL_BMI_FACTOR: f64 = 703.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiImperialRequest {
    pub weight: f64,
    pub feet: f64,
    pub inches: f64,
}

impl Default for BmiImperialRequest {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT_LBS,
            feet: DEFAULT_HEIGHT_FEET,
            inches: DEFAULT_HEIGHT_INCHES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiMetricRequest {
    pub weight: f64,
    pub height: f64,
}

impl Default for BmiMetricRequest {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT_KGS,
            height: DEFAULT_HEIGHT_CMS,
        }
    }
}

pub fn bmi_imperial(
    request: &BmiImperialRequest,
    defaults: &CalculatorDefaults,
) -> CalcResult<f64> {
    ensure_positive("weight", request.weight)?;
    ensure_non_negative("feet", request.feet)?;
    ensure_non_negative("inches", request.inches)?;
    let total_inches = request.feet * 12.0 + request.inches;
    if total_inches <= 0.0 {
        return Err(CalcError::invalid("height", "must be > 0"));
    }

    let bmi = request.weight / (total_inches * total_inches) * IMPERIAL_BMI_FACTOR;
    Ok(round_to(bmi, defaults.rounding_digits))
}

pub fn bmi_metric(request: &BmiMetricRequest, defaults: &CalculatorDefaults) -> CalcResult<f64> {
    ensure_positive("weight", request.weight)?;
    ensure_positive("height", request.height)?;

    let meters = request.height / 100.0;
    Ok(round_to(request.weight / (meters * meters), defaults.rounding_digits))
}
