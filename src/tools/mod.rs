pub mod ai_format;
pub mod breakdown;
pub mod build;
pub mod chain;
pub mod evaluate;
pub mod instruments;
pub mod market;
pub mod paper;
pub mod response_types;
pub mod snapshots;
pub mod strategies;

use anyhow::Result;
use chrono::NaiveDate;
use garde::Validate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::config::ServerConfig;
use crate::data::{Instrument, QuoteSource};
use crate::engine::types::{EvaluationConfig, ViewMode};

/// Curve settings shared by the payoff tools. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema, Validate)]
pub struct CurveOptions {
    /// Contract multiplier per lot. Defaults to the instrument's lot size,
    /// then to the server default.
    #[garde(inner(range(min = 1)))]
    pub lot_size: Option<u32>,
    /// Instrument symbol (e.g. "NIFTY") used to resolve the lot size
    #[garde(inner(length(min = 1, max = 20), pattern(r"^[A-Za-z0-9._-]+$")))]
    pub instrument: Option<String>,
    /// "`expiry_only`" (default) or "`all_intrinsic`"
    #[garde(skip)]
    pub view_mode: Option<ViewMode>,
    /// Visible window factor around spot; >1 narrows, <1 widens (default 1)
    #[garde(inner(range(min = 0.01, max = 100.0)))]
    pub zoom: Option<f64>,
    /// Number of curve samples
    #[garde(inner(range(min = 2, max = 5000)))]
    pub sample_points: Option<usize>,
    /// Full strike list of the chain; drives the price range when given
    #[serde(default)]
    #[garde(length(max = 10_000))]
    pub available_strikes: Vec<f64>,
}

/// Explicit lot size, else the instrument's, else the server default.
pub fn resolve_lot_size(
    explicit: Option<u32>,
    instrument: Option<&Instrument>,
    default: u32,
) -> u32 {
    explicit
        .or_else(|| instrument.map(|i| i.lot_size))
        .unwrap_or(default)
}

/// Turn tool-level options into an engine config.
pub fn evaluation_config(
    source: &dyn QuoteSource,
    server: &ServerConfig,
    options: &CurveOptions,
    snapshot_expiry: Option<NaiveDate>,
) -> Result<EvaluationConfig> {
    let instrument = match options.instrument.as_deref() {
        Some(symbol) if options.lot_size.is_none() => Some(source.instrument(symbol)?),
        _ => None,
    };
    let lot_size = resolve_lot_size(options.lot_size, instrument.as_ref(), server.default_lot_size);

    Ok(EvaluationConfig::new(lot_size)
        .with_view(options.view_mode.unwrap_or_default(), snapshot_expiry)
        .with_zoom(options.zoom.unwrap_or(1.0))
        .with_sample_points(options.sample_points.unwrap_or(server.sample_points))
        .with_strike_universe(options.available_strikes.clone()))
}

/// Seeded generator when `seed` is given, OS entropy otherwise.
pub fn rng_for(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
