use super::types::{Action, Bound, OptionLeg, OptionType, PricePoint, StdDevBands};

/// Assumed annual volatility for the σ reference bands.
pub const ASSUMED_ANNUAL_VOL: f64 = 0.20;
/// Assumed days to expiry for the σ reference bands.
pub const ASSUMED_DAYS_TO_EXPIRY: f64 = 30.0;

/// Zero crossings of the sampled curve, linearly interpolated, rounded to
/// whole price units, deduplicated and ascending.
pub fn breakevens(curve: &[PricePoint]) -> Vec<f64> {
    let mut found: Vec<f64> = Vec::new();

    for pair in curve.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let crosses = (prev.payoff <= 0.0 && curr.payoff >= 0.0)
            || (prev.payoff >= 0.0 && curr.payoff <= 0.0);
        if !crosses {
            continue;
        }

        let dx = curr.price - prev.price;
        let dy = curr.payoff - prev.payoff;
        let x = if dy.abs() < 1e-9 || dx == 0.0 {
            f64::midpoint(prev.price, curr.price)
        } else {
            prev.price - prev.payoff / (dy / dx)
        };
        found.push(x.round());
    }

    found.sort_by(f64::total_cmp);
    found.dedup();
    found
}

/// Share of sampled prices with strictly positive P&L, in percent to one
/// decimal. This counts samples; it is not weighted by any price distribution.
pub fn probability_of_profit(curve: &[PricePoint]) -> f64 {
    if curve.is_empty() {
        return 0.0;
    }
    let profitable = curve.iter().filter(|p| p.payoff > 0.0).count();
    let pct = profitable as f64 / curve.len() as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Highest and lowest sampled payoff; `(0, 0)` for an empty curve.
pub fn curve_extrema(curve: &[PricePoint]) -> (f64, f64) {
    if curve.is_empty() {
        return (0.0, 0.0);
    }
    curve.iter().fold((f64::MIN, f64::MAX), |(hi, lo), p| {
        (hi.max(p.payoff), lo.min(p.payoff))
    })
}

/// Any long call makes upside unlimited.
pub fn has_long_call(legs: &[OptionLeg]) -> bool {
    legs.iter()
        .any(|l| l.option_type == OptionType::Call && l.action == Action::Buy)
}

/// A short call is naked unless some single long call sits at a strictly
/// higher strike with at least the same quantity.
pub fn has_naked_short_call(legs: &[OptionLeg]) -> bool {
    legs.iter()
        .filter(|l| l.option_type == OptionType::Call && l.action == Action::Sell)
        .any(|short| {
            !legs.iter().any(|long| {
                long.option_type == OptionType::Call
                    && long.action == Action::Buy
                    && long.strike() > short.strike()
                    && long.lots() >= short.lots()
            })
        })
}

/// Max profit and max loss, replacing sampled extrema with `Unbounded`
/// where the leg structure implies it.
pub fn max_profit_loss(curve: &[PricePoint], legs: &[OptionLeg]) -> (Bound, Bound) {
    let (hi, lo) = curve_extrema(curve);

    let max_profit = if has_long_call(legs) {
        tracing::debug!("long call present, max profit unbounded");
        Bound::Unbounded
    } else {
        Bound::Finite(hi)
    };
    let max_loss = if has_naked_short_call(legs) {
        tracing::debug!("naked short call present, max loss unbounded");
        Bound::Unbounded
    } else {
        Bound::Finite(lo)
    };

    (max_profit, max_loss)
}

/// Payoff of the sample nearest to spot (first one wins ties).
pub fn current_pnl(curve: &[PricePoint], spot: f64) -> f64 {
    let Some(first) = curve.first() else {
        return 0.0;
    };
    curve
        .iter()
        .fold(first, |closest, p| {
            if (p.price - spot).abs() < (closest.price - spot).abs() {
                p
            } else {
                closest
            }
        })
        .payoff
}

/// Reference bands at ±1σ and ±2σ using fixed vol and horizon assumptions.
pub fn std_dev_bands(spot: f64) -> StdDevBands {
    let sigma = spot * ASSUMED_ANNUAL_VOL * (ASSUMED_DAYS_TO_EXPIRY / 365.0).sqrt();
    StdDevBands {
        sigma,
        minus_two: spot - 2.0 * sigma,
        minus_one: spot - sigma,
        plus_one: spot + sigma,
        plus_two: spot + 2.0 * sigma,
    }
}
