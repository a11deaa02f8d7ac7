use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use crate::data::{synthetic, Instrument, QuoteSource};
use crate::engine::cache::EvaluationCache;
use crate::engine::types::{Evaluation, EvaluationConfig, OptionLeg};
use crate::strategies::{build_legs, find_strategy};

use super::ai_format;
use super::response_types::BuildStrategyResponse;

#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub strategy: String,
    pub instrument: String,
    pub expiry: Option<NaiveDate>,
    pub far_expiry: Option<NaiveDate>,
    /// Multiplies every template leg's quantity.
    pub quantity: u32,
    pub lot_size: Option<u32>,
    pub as_of: Option<NaiveDate>,
    pub seed: Option<u64>,
    pub sample_points: usize,
}

/// Legs and evaluation produced for one build request.
#[derive(Debug, Clone)]
pub struct BuiltPosition {
    pub as_of: NaiveDate,
    pub expiry: NaiveDate,
    pub far_expiry: Option<NaiveDate>,
    pub lot_size: u32,
    pub legs: Vec<OptionLeg>,
    pub evaluation: Evaluation,
}

fn listed(instrument: &Instrument, expiry: NaiveDate) -> Result<NaiveDate> {
    if !instrument.lists_expiry(expiry) {
        bail!(
            "expiry {expiry} is not listed for {}. Listed: {:?}",
            instrument.symbol,
            instrument.expiries
        );
    }
    Ok(expiry)
}

pub fn execute(
    source: &dyn QuoteSource,
    cache: &EvaluationCache,
    default_lot_size: u32,
    req: &BuildRequest,
) -> Result<BuildStrategyResponse> {
    let Some(def) = find_strategy(&req.strategy) else {
        bail!(
            "Unknown strategy '{}'. Call list_strategies to see available names.",
            req.strategy
        );
    };
    let instrument = source.instrument(&req.instrument)?;
    let as_of = req.as_of.unwrap_or_else(super::today);

    let expiry = match req.expiry {
        Some(e) => listed(&instrument, e)?,
        None => instrument
            .nearest_expiry(as_of)
            .with_context(|| format!("{} has no listed expiries", instrument.symbol))?,
    };
    let far_expiry = if def.is_multi_expiration() {
        match req.far_expiry {
            Some(far) if far <= expiry => {
                bail!("far_expiry {far} must be after expiry {expiry}")
            }
            Some(far) => Some(listed(&instrument, far)?),
            None => instrument.next_expiry_after(expiry),
        }
    } else {
        None
    };

    tracing::info!(
        strategy = %def.name,
        symbol = %instrument.symbol,
        %expiry,
        ?far_expiry,
        "build_strategy"
    );

    let mut rng = super::rng_for(req.seed);
    let rows = source.chain(&instrument.symbol, None, as_of, &mut rng)?;
    let quotes = synthetic::quote_records(&rows);

    let mut legs = build_legs(
        &def,
        instrument.spot_price,
        instrument.strike_interval,
        &quotes,
        expiry,
        far_expiry,
    );
    let multiplier = req.quantity.max(1);
    for leg in &mut legs {
        leg.quantity = leg.quantity.saturating_mul(multiplier);
    }

    let mut strikes: Vec<f64> = rows
        .iter()
        .filter(|r| r.expiry == expiry)
        .map(|r| r.strike)
        .collect();
    strikes.dedup();

    let lot_size = super::resolve_lot_size(req.lot_size, Some(&instrument), default_lot_size);
    let config = EvaluationConfig::new(lot_size)
        .with_sample_points(req.sample_points)
        .with_strike_universe(strikes);
    let evaluation = cache.evaluate(&legs, instrument.spot_price, &config);

    let built = BuiltPosition {
        as_of,
        expiry,
        far_expiry,
        lot_size,
        legs,
        evaluation: (*evaluation).clone(),
    };
    Ok(ai_format::format_build(&def, &instrument, built))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SyntheticSource;
    use crate::engine::types::{Action, Bound, OptionType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(strategy: &str, instrument: &str) -> BuildRequest {
        BuildRequest {
            strategy: strategy.to_string(),
            instrument: instrument.to_string(),
            expiry: None,
            far_expiry: None,
            quantity: 1,
            lot_size: None,
            as_of: Some(date(2025, 10, 20)),
            seed: Some(42),
            sample_points: 300,
        }
    }

    #[test]
    fn iron_condor_on_nifty() {
        let source = SyntheticSource::default();
        let cache = EvaluationCache::new(16);
        let resp = execute(&source, &cache, 50, &request("iron_condor", "nifty")).unwrap();
        assert_eq!(resp.instrument, "NIFTY");
        assert_eq!(resp.lot_size, 50);
        assert_eq!(resp.expiry, date(2025, 10, 28));
        assert_eq!(resp.far_expiry, None);
        let strikes: Vec<f64> = resp.legs.iter().map(|l| l.strike).collect();
        assert_eq!(strikes, vec![22_150.0, 22_100.0, 22_000.0, 21_950.0]);
        assert!(resp.legs.iter().all(|l| l.premium > 0.0));
        assert!(!resp.evaluation.max_loss.is_unbounded());
        assert!(resp.evaluation.net_premium > 0.0);
        assert_eq!(resp.evaluation.breakevens.len(), 2);
    }

    #[test]
    fn calendar_picks_next_expiry() {
        let source = SyntheticSource::default();
        let cache = EvaluationCache::new(16);
        let resp = execute(&source, &cache, 50, &request("call_calendar_spread", "NIFTY")).unwrap();
        assert_eq!(resp.far_expiry, Some(date(2025, 11, 4)));
        assert_eq!(resp.legs[0].expiry, Some(date(2025, 10, 28)));
        assert_eq!(resp.legs[1].expiry, Some(date(2025, 11, 4)));
        // Far-dated leg carries more time value
        assert!(resp.legs[1].premium > resp.legs[0].premium);
    }

    #[test]
    fn calendar_on_last_expiry_falls_back() {
        let source = SyntheticSource::default();
        let cache = EvaluationCache::new(16);
        let mut req = request("put_calendar_spread", "TCS");
        req.expiry = Some(date(2025, 11, 28));
        let resp = execute(&source, &cache, 50, &req).unwrap();
        assert_eq!(resp.far_expiry, None);
        assert!(resp.legs.iter().all(|l| l.expiry == Some(date(2025, 11, 28))));
    }

    #[test]
    fn quantity_and_lot_override() {
        let source = SyntheticSource::default();
        let cache = EvaluationCache::new(16);
        let mut req = request("long_call_butterfly", "TCS");
        req.quantity = 3;
        req.lot_size = Some(10);
        let resp = execute(&source, &cache, 50, &req).unwrap();
        let qty: Vec<u32> = resp.legs.iter().map(|l| l.quantity).collect();
        assert_eq!(qty, vec![3, 6, 3]);
        assert_eq!(resp.lot_size, 10);
        assert_eq!(resp.legs[1].action, Action::Sell);
    }

    #[test]
    fn long_call_has_unbounded_profit() {
        let source = SyntheticSource::default();
        let cache = EvaluationCache::new(16);
        let resp = execute(&source, &cache, 50, &request("long_call", "BANKNIFTY")).unwrap();
        assert_eq!(resp.legs[0].option_type, OptionType::Call);
        assert_eq!(resp.legs[0].strike, 47_300.0);
        assert_eq!(resp.evaluation.max_profit, Bound::Unbounded);
    }

    #[test]
    fn same_seed_same_premiums() {
        let source = SyntheticSource::default();
        let cache = EvaluationCache::new(16);
        let a = execute(&source, &cache, 50, &request("short_strangle", "NIFTY")).unwrap();
        let b = execute(&source, &cache, 50, &request("short_strangle", "NIFTY")).unwrap();
        let pa: Vec<f64> = a.legs.iter().map(|l| l.premium).collect();
        let pb: Vec<f64> = b.legs.iter().map(|l| l.premium).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn rejects_unknown_inputs() {
        let source = SyntheticSource::default();
        let cache = EvaluationCache::new(16);
        let err = execute(&source, &cache, 50, &request("jade_lizard", "NIFTY")).unwrap_err();
        assert!(err.to_string().contains("Unknown strategy"));
        let err = execute(&source, &cache, 50, &request("long_call", "SENSEX")).unwrap_err();
        assert!(err.to_string().contains("unknown instrument"));
        let mut req = request("long_call", "TCS");
        req.expiry = Some(date(2025, 11, 4));
        assert!(execute(&source, &cache, 50, &req).is_err());
        let mut req = request("call_calendar_spread", "NIFTY");
        req.far_expiry = Some(date(2025, 10, 28));
        assert!(execute(&source, &cache, 50, &req).is_err());
    }
}
