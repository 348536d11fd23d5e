use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{name} {constraint}")]
    InvalidParameter {
        name: &'static str,
        constraint: String,
    },
    #[error("no finite solution: {0}")]
    Domain(String),
    #[error("{name} must be between 0 and 100, got {value}")]
    Range { name: &'static str, value: f64 },
}

impl CalcError {
    pub fn invalid(name: &'static str, constraint: impl Into<String>) -> Self {
        CalcError::InvalidParameter {
            name,
            constraint: constraint.into(),
        }
    }

    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            CalcError::InvalidParameter { name, .. } | CalcError::Range { name, .. } => Some(name),
            CalcError::Domain(_) => None,
        }
    }
}

pub type CalcResult<T> = Result<T, CalcError>;

pub(crate) fn ensure_positive(name: &'static str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid(name, "must be > 0"));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid(name, "cannot be negative"));
    }
    Ok(())
}

pub(crate) fn ensure_percent(name: &'static str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(CalcError::invalid(name, "must be between 0 and 100"));
    }
    Ok(())
}

/// Accepts `0 < value <= max`.
pub(crate) fn ensure_within(name: &'static str, value: f64, max: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 || value > max {
        return Err(CalcError::invalid(
            name,
            format!("must be greater than 0 and at most {max}"),
        ));
    }
    Ok(())
}
