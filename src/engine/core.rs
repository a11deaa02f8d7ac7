use chrono::NaiveDate;
use rayon::prelude::*;

use super::margin;
use super::metrics;
use super::pricing;
use super::range;
#[allow(clippy::wildcard_imports)]
use super::types::*;

/// Legs that take part in the configured view.
pub fn legs_in_view<'a>(legs: &'a [OptionLeg], config: &EvaluationConfig) -> Vec<&'a OptionLeg> {
    legs.iter()
        .filter(|l| l.in_view(config.view_mode, config.snapshot_expiry))
        .collect()
}

/// Distinct leg expiries, ascending.
pub fn expiries(legs: &[OptionLeg]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = legs.iter().filter_map(|l| l.expiry).collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Total P&L of the position at one price.
pub fn payoff_at(legs: &[OptionLeg], price: f64, config: &EvaluationConfig) -> f64 {
    pricing::total_payoff(
        legs,
        price,
        config.view_mode,
        config.snapshot_expiry,
        config.lot(),
    )
}

/// Sample the aggregate P&L curve over the generated price range.
pub fn payoff_curve(legs: &[OptionLeg], spot: f64, config: &EvaluationConfig) -> Vec<PricePoint> {
    let strikes: Vec<f64> = legs_in_view(legs, config)
        .iter()
        .map(|l| l.strike())
        .collect();
    range::price_range(
        spot,
        &strikes,
        &config.strike_universe,
        config.zoom,
        config.sample_points,
    )
    .into_iter()
    .map(|price| PricePoint {
        price,
        payoff: payoff_at(legs, price, config),
    })
    .collect()
}

/// Evaluate the position: curve, breakevens, POP, extrema, margin.
///
/// Pure and deterministic; never fails. Inputs are not modified.
pub fn evaluate(legs: &[OptionLeg], spot: f64, config: &EvaluationConfig) -> Evaluation {
    let active: Vec<OptionLeg> = legs_in_view(legs, config).into_iter().cloned().collect();
    let lot = config.lot();

    let curve = payoff_curve(&active, spot, config);
    let (curve_max, curve_min) = metrics::curve_extrema(&curve);
    // Unbounded detection looks at every leg, including ones outside the view.
    let (max_profit, max_loss) = metrics::max_profit_loss(&curve, legs);

    // An empty position is flat at zero everywhere, which is not a breakeven.
    let breakevens = if active.is_empty() {
        Vec::new()
    } else {
        metrics::breakevens(&curve)
    };

    let evaluation = Evaluation {
        breakevens,
        pop: metrics::probability_of_profit(&curve),
        max_profit,
        max_loss,
        current_pnl: metrics::current_pnl(&curve, spot),
        margin_required: margin::margin_required(&active, lot),
        curve_max,
        curve_min,
        net_premium: pricing::net_premium(&active, lot),
        std_dev: metrics::std_dev_bands(spot),
        expiries: expiries(legs),
        leg_count: active.len(),
        curve,
    };

    tracing::debug!(
        legs = legs.len(),
        active = evaluation.leg_count,
        samples = evaluation.curve.len(),
        breakevens = evaluation.breakevens.len(),
        "evaluated payoff"
    );

    evaluation
}

/// Evaluate the ALL view plus one view per distinct expiry, in parallel.
/// Output is ALL first, then ascending expiry.
pub fn evaluate_snapshots(
    legs: &[OptionLeg],
    spot: f64,
    config: &EvaluationConfig,
) -> Vec<SnapshotEvaluation> {
    let snapshots: Vec<Option<NaiveDate>> = std::iter::once(None)
        .chain(expiries(legs).into_iter().map(Some))
        .collect();
    tracing::debug!(count = snapshots.len(), "evaluating expiry snapshots");

    snapshots
        .into_par_iter()
        .map(|snapshot_expiry| {
            let view = config.clone().with_view(config.view_mode, snapshot_expiry);
            SnapshotEvaluation {
                snapshot_expiry,
                evaluation: evaluate(legs, spot, &view),
            }
        })
        .collect()
}

/// Each leg's contribution at one price, for inspecting a curve point.
pub fn leg_breakdown(legs: &[OptionLeg], price: f64, config: &EvaluationConfig) -> LegBreakdown {
    let contributions: Vec<LegContribution> = legs
        .iter()
        .map(|leg| LegContribution {
            id: leg.id.clone(),
            strike: leg.strike(),
            option_type: leg.option_type,
            action: leg.action,
            expiry: leg.expiry,
            premium: leg.premium(),
            quantity: leg.quantity.max(1),
            payoff: pricing::leg_payoff(
                leg,
                price,
                config.view_mode,
                config.snapshot_expiry,
                config.lot(),
            ),
        })
        .collect();
    let total = contributions.iter().map(|c| c.payoff).sum();

    LegBreakdown {
        price,
        legs: contributions,
        total,
    }
}
