pub mod butterflies;
pub mod calendar;
pub mod helpers;
pub mod iron;
pub mod singles;
pub mod spreads;

use chrono::NaiveDate;

use crate::data::instruments::atm_strike;
use crate::data::QuoteRecord;
use crate::engine::types::{ExpirationCycle, OptionLeg, OptionType, StrategyDef};

pub fn all_strategies() -> Vec<StrategyDef> {
    let mut strategies = Vec::new();
    strategies.extend(singles::all());
    strategies.extend(spreads::all());
    strategies.extend(butterflies::all());
    strategies.extend(iron::all());
    strategies.extend(calendar::all());
    strategies
}

pub fn find_strategy(name: &str) -> Option<StrategyDef> {
    let name = name.trim();
    all_strategies()
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

fn quoted_premium(
    quotes: &[QuoteRecord],
    strike: f64,
    expiry: NaiveDate,
    option_type: OptionType,
) -> Option<f64> {
    quotes
        .iter()
        .find(|q| q.expiry == expiry && (q.strike - strike).abs() < 1e-6)
        .map(|q| match option_type {
            OptionType::Call => q.call_premium,
            OptionType::Put => q.put_premium,
        })
}

/// Resolve a template into concrete legs.
///
/// Strikes are placed at `ATM + offset × strike_interval` where ATM is spot
/// rounded to the interval. Premiums come from the matching quote (0 when the
/// chain has no such strike). Far-term legs use `secondary`, falling back to
/// `primary` when no second expiry is available.
pub fn build_legs(
    def: &StrategyDef,
    spot: f64,
    strike_interval: f64,
    quotes: &[QuoteRecord],
    primary: NaiveDate,
    secondary: Option<NaiveDate>,
) -> Vec<OptionLeg> {
    let atm = atm_strike(spot, strike_interval);

    if def.is_multi_expiration() && secondary.is_none() {
        tracing::warn!(strategy = %def.name, "no far expiry available, using {primary}");
    }

    def.legs
        .iter()
        .map(|leg_def| {
            let strike = atm + f64::from(leg_def.strike_offset) * strike_interval;
            let expiry = match leg_def.expiration_cycle {
                ExpirationCycle::Primary => primary,
                ExpirationCycle::Secondary => secondary.unwrap_or(primary),
            };
            let premium = quoted_premium(quotes, strike, expiry, leg_def.option_type)
                .unwrap_or_else(|| {
                    tracing::warn!(strike, %expiry, "no quote for strike, premium set to 0");
                    0.0
                });

            OptionLeg::new(
                leg_def.option_type,
                leg_def.action,
                strike,
                premium,
                leg_def.qty,
            )
            .with_expiry(expiry)
        })
        .collect()
}
