use crate::engine::core;
use crate::engine::types::{EvaluationConfig, OptionLeg};

use super::ai_format;
use super::response_types::BreakdownResponse;

pub fn execute(legs: &[OptionLeg], price: f64, config: &EvaluationConfig) -> BreakdownResponse {
    tracing::info!(legs = legs.len(), price, "payoff_breakdown");
    let breakdown = core::leg_breakdown(legs, price, config);
    ai_format::format_breakdown(breakdown, config.lot_size)
}
