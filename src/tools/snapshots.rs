use crate::engine::core;
use crate::engine::types::{EvaluationConfig, OptionLeg};

use super::ai_format;
use super::response_types::SnapshotsResponse;

pub fn execute(
    legs: &[OptionLeg],
    spot_price: f64,
    config: &EvaluationConfig,
) -> SnapshotsResponse {
    tracing::info!(legs = legs.len(), spot_price, "evaluate_snapshots");
    let snapshots = core::evaluate_snapshots(legs, spot_price, config);
    ai_format::format_snapshots(&snapshots, spot_price, config.lot_size)
}
