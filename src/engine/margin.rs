//! Approximate capital requirement with credit-spread hedge recognition.
//!
//! Short legs are paired greedily with long legs of the same type that cap
//! their loss: calls with a strictly higher strike, puts with a strictly
//! lower one. Hedged lots are charged the spread width. Unhedged short calls
//! make the margin unbounded; unhedged short puts are charged half their
//! notional. Premium paid is added and premium received is subtracted.
//!
//! This is a heuristic, not an exchange SPAN computation.

use super::types::{Action, Bound, OptionLeg, OptionType};

/// Fraction of notional charged per unhedged short put lot.
const NAKED_PUT_NOTIONAL_FRACTION: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
struct Lot {
    strike: f64,
    qty: f64,
}

/// Margin for `legs`; the caller has already applied any snapshot filter.
pub fn margin_required(legs: &[OptionLeg], lot_size: f64) -> Bound {
    if legs.is_empty() {
        return Bound::Finite(0.0);
    }

    let Some(call_margin) = side_margin(legs, OptionType::Call, lot_size) else {
        tracing::debug!("unhedged short call, margin unbounded");
        return Bound::Unbounded;
    };
    let Some(put_margin) = side_margin(legs, OptionType::Put, lot_size) else {
        return Bound::Unbounded;
    };

    let premium_flow = |action: Action| -> f64 {
        legs.iter()
            .filter(|l| l.action == action)
            .map(|l| l.premium() * l.lots() * lot_size)
            .sum()
    };
    let paid = premium_flow(Action::Buy);
    let received = premium_flow(Action::Sell);

    let total = call_margin + put_margin + paid - received;
    Bound::Finite(total.round().max(0.0))
}

/// Spread margin for one option type, or `None` when a short call is left
/// unhedged.
fn side_margin(legs: &[OptionLeg], option_type: OptionType, lot_size: f64) -> Option<f64> {
    let collect = |action: Action| -> Vec<Lot> {
        legs.iter()
            .filter(|l| l.option_type == option_type && l.action == action)
            .map(|l| Lot {
                strike: l.strike(),
                qty: l.lots(),
            })
            .collect()
    };
    let mut shorts = collect(Action::Sell);
    let mut longs = collect(Action::Buy);

    // Nearest protective strike first: ascending for calls, descending for puts.
    match option_type {
        OptionType::Call => {
            shorts.sort_by(|a, b| a.strike.total_cmp(&b.strike));
            longs.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        }
        OptionType::Put => {
            shorts.sort_by(|a, b| b.strike.total_cmp(&a.strike));
            longs.sort_by(|a, b| b.strike.total_cmp(&a.strike));
        }
    }

    let mut margin = 0.0;
    for short in &shorts {
        let mut remaining = short.qty;

        for long in &mut longs {
            let protects = match option_type {
                OptionType::Call => long.strike > short.strike,
                OptionType::Put => long.strike < short.strike,
            };
            if long.qty <= 0.0 || !protects {
                continue;
            }
            let hedged = remaining.min(long.qty);
            margin += (long.strike - short.strike).abs() * lot_size * hedged;
            long.qty -= hedged;
            remaining -= hedged;
            if remaining <= 0.0 {
                break;
            }
        }

        if remaining > 0.0 {
            match option_type {
                OptionType::Call => return None,
                OptionType::Put => {
                    margin += short.strike * lot_size * remaining * NAKED_PUT_NOTIONAL_FRACTION;
                }
            }
        }
    }

    Some(margin)
}
