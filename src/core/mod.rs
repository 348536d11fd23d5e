mod amortization;
mod error;
mod primitives;
mod projection;
mod random;
mod types;

pub use amortization::{
    MAX_PERIODS_PER_YEAR, MAX_TERM_YEARS, amortize, build_amortization_table, round_schedule,
};
pub(crate) use amortization::round_period;
pub use error::{CalcError, CalcResult};
pub(crate) use error::{ensure_non_negative, ensure_percent, ensure_positive, ensure_within};
pub use primitives::{
    ceil_to, compound_interest, doubling_time_continuous, equated_monthly_installment,
    future_value, number_of_periods, periodic_payment, present_value, round_to, simple_interest,
    to_decimal_fraction,
};
pub use projection::{MAX_PROJECTION_YEARS, build_projection_table, combine_projection_tracks};
pub use random::{FixedRange, RandomRange, RngRange};
pub use types::{
    AmortizationPeriod, AmortizationSchedule, CombinedProjection, CombinedYear, Frequency,
    PaymentTiming, ProjectionPeriod, ProjectionTrack, RateSpec, TrackValues, convert_frequency,
};
