use serde::{Deserialize, Serialize};

use super::analytics::{Asset, AssetType};
use super::car::{DEFAULT_CAR_INTEREST, DEFAULT_CAR_LOAN, DEFAULT_CAR_YEARS};
use crate::config::CalculatorDefaults;
use crate::core::{
    CalcResult, CombinedProjection, ProjectionTrack, build_projection_table,
    combine_projection_tracks, ensure_non_negative, equated_monthly_installment, round_to,
};

pub const DEFAULT_CHILD_MONTHLY_COST: f64 = 1_000.0;
pub const DEFAULT_CHILD_YEARS: u32 = 18;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum LifeEventKind {
    #[serde(rename = "having a child")]
    HavingAChild,
    #[serde(rename = "buying a car")]
    BuyingACar,
}

impl LifeEventKind {
    pub const ALL: [LifeEventKind; 2] = [LifeEventKind::HavingAChild, LifeEventKind::BuyingACar];

    pub fn name(self) -> &'static str {
        match self {
            LifeEventKind::HavingAChild => "having a child",
            LifeEventKind::BuyingACar => "buying a car",
        }
    }

    pub fn default_monthly_cost(self) -> f64 {
        match self {
            LifeEventKind::HavingAChild => DEFAULT_CHILD_MONTHLY_COST,
            LifeEventKind::BuyingACar => {
                equated_monthly_installment(DEFAULT_CAR_LOAN, DEFAULT_CAR_INTEREST, DEFAULT_CAR_YEARS * 12)
            }
        }
    }

    pub fn default_years(self) -> u32 {
        match self {
            LifeEventKind::HavingAChild => DEFAULT_CHILD_YEARS,
            LifeEventKind::BuyingACar => DEFAULT_CAR_YEARS,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackContributions {
    pub cash: f64,
    pub stock: f64,
    pub investment: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LifeEventRequest {
    pub kind: LifeEventKind,
    pub assets: Vec<Asset>,
    pub monthly_contributions: TrackContributions,
    pub monthly_cost: f64,
    pub years: u32,
}

impl LifeEventRequest {
    pub fn new(kind: LifeEventKind, assets: Vec<Asset>) -> Self {
        Self {
            kind,
            assets,
            monthly_contributions: TrackContributions::default(),
            monthly_cost: kind.default_monthly_cost(),
            years: kind.default_years(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeEventResult {
    pub kind: LifeEventKind,
    pub years: u32,
    pub monthly_cost: f64,
    pub tracks: Vec<ProjectionTrack>,
    pub combined: CombinedProjection,
}

fn assets_of(assets: &[Asset], type_name: AssetType) -> f64 {
    assets
        .iter()
        .filter(|a| a.type_name == type_name)
        .map(|a| a.value)
        .sum()
}

pub fn life_event(request: &LifeEventRequest, defaults: &CalculatorDefaults) -> CalcResult<LifeEventResult> {
    for asset in &request.assets {
        ensure_non_negative("asset value", asset.value)?;
    }
    ensure_non_negative("monthly cost", request.monthly_cost)?;

    let digits = defaults.rounding_digits;
    let contributions = request.monthly_contributions;
    let plan = [
        (
            AssetType::Cash,
            "cash",
            contributions.cash,
            Some(request.monthly_cost),
            defaults.average_bank_interest,
        ),
        (
            AssetType::Stock,
            "stock",
            contributions.stock,
            None,
            defaults.interest,
        ),
        (
            AssetType::Investment,
            "investment",
            contributions.investment,
            None,
            defaults.interest,
        ),
    ];

    let all_tracks = plan
        .into_iter()
        .map(|(type_name, name, contribution, cost, rate)| {
            build_projection_table(
                name,
                assets_of(&request.assets, type_name),
                request.years,
                contribution,
                cost,
                rate,
                digits,
            )
        })
        .collect::<CalcResult<Vec<_>>>()?;

    let combined = combine_projection_tracks(&all_tracks);
    let tracks = all_tracks
        .into_iter()
        .filter(|track| !track.is_empty())
        .collect::<Vec<_>>();

    tracing::debug!(
        event = request.kind.name(),
        tracks = tracks.len(),
        "built life event projection"
    );

    Ok(LifeEventResult {
        kind: request.kind,
        years: request.years,
        monthly_cost: round_to(request.monthly_cost, digits),
        tracks,
        combined,
    })
}
