use std::collections::BTreeSet;

use super::error::{CalcError, CalcResult, ensure_non_negative};
use super::primitives::{future_value, round_to};
use super::types::{
    CombinedProjection, CombinedYear, PaymentTiming, ProjectionPeriod, ProjectionTrack,
    TrackValues,
};

pub const MAX_PROJECTION_YEARS: u32 = 150;

/// Year-by-year balance of one asset, compounded monthly.
///
/// `value` compounds with the net monthly flow `monthly_contribution -
/// monthly_cost`, while `value_with_contributions` ignores the cost.
pub fn build_projection_table(
    name: &str,
    start_amount: f64,
    years: u32,
    monthly_contribution: f64,
    monthly_cost: Option<f64>,
    annual_rate_percent: f64,
    rounding_digits: u32,
) -> CalcResult<ProjectionTrack> {
    ensure_non_negative("start amount", start_amount)?;
    ensure_non_negative("monthly contribution", monthly_contribution)?;
    if let Some(cost) = monthly_cost {
        ensure_non_negative("monthly cost", cost)?;
    }
    if years == 0 || years > MAX_PROJECTION_YEARS {
        return Err(CalcError::invalid(
            "years",
            format!("must be between 1 and {MAX_PROJECTION_YEARS}"),
        ));
    }
    if !annual_rate_percent.is_finite() || !(-100.0..=100.0).contains(&annual_rate_percent) {
        return Err(CalcError::invalid(
            "annual rate percent",
            "must be between -100 and 100",
        ));
    }

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let net_flow = monthly_contribution - monthly_cost.unwrap_or(0.0);
    let yearly_contribution = monthly_contribution * 12.0;

    let mut value = start_amount;
    let mut value_with_contributions = start_amount;
    let mut periods = Vec::with_capacity(years as usize);
    for year in 1..=years {
        value = future_value(monthly_rate, 12, net_flow, value, PaymentTiming::End);
        value_with_contributions = future_value(
            monthly_rate,
            12,
            monthly_contribution,
            value_with_contributions,
            PaymentTiming::End,
        );
        periods.push(ProjectionPeriod {
            year,
            value: round_to(value, rounding_digits),
            contribution: round_to(yearly_contribution, rounding_digits),
            value_with_contributions: round_to(value_with_contributions, rounding_digits),
        });
    }

    Ok(ProjectionTrack {
        name: name.to_string(),
        start_amount,
        monthly_contribution,
        monthly_cost,
        annual_rate_percent,
        periods,
    })
}

/// Outer-joins tracks by year. Empty tracks are left out entirely; a year
/// missing from a kept track contributes zeros for that track.
pub fn combine_projection_tracks(tracks: &[ProjectionTrack]) -> CombinedProjection {
    let kept = tracks
        .iter()
        .filter(|track| !track.is_empty())
        .collect::<Vec<_>>();

    let years = kept
        .iter()
        .flat_map(|track| track.periods.iter().map(|p| p.year))
        .collect::<BTreeSet<_>>();

    let combined_years = years
        .into_iter()
        .map(|year| {
            let values = kept
                .iter()
                .map(|track| {
                    let period = track
                        .periods
                        .iter()
                        .find(|p| p.year == year)
                        .copied()
                        .unwrap_or_default();
                    TrackValues {
                        name: track.name.clone(),
                        value: period.value,
                        contribution: period.contribution,
                        value_with_contributions: period.value_with_contributions,
                    }
                })
                .collect::<Vec<_>>();
            let total_value = values.iter().map(|v| v.value).sum();
            CombinedYear {
                year,
                tracks: values,
                total_value,
            }
        })
        .collect();

    CombinedProjection {
        track_names: kept.iter().map(|t| t.name.clone()).collect(),
        years: combined_years,
    }
}
