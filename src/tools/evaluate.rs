use crate::engine::cache::EvaluationCache;
use crate::engine::types::{EvaluationConfig, OptionLeg};

use super::ai_format;
use super::response_types::EvaluatePayoffResponse;

pub fn execute(
    cache: &EvaluationCache,
    legs: &[OptionLeg],
    spot_price: f64,
    config: &EvaluationConfig,
) -> EvaluatePayoffResponse {
    tracing::info!(
        legs = legs.len(),
        spot_price,
        lot_size = config.lot_size,
        snapshot = ?config.snapshot_expiry,
        "evaluate_payoff"
    );
    let evaluation = cache.evaluate(legs, spot_price, config);
    ai_format::format_evaluate_payoff((*evaluation).clone(), spot_price, config.lot_size)
}
