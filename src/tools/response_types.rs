use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::data::synthetic::{ChainRow, MarketSummary};
use crate::data::Instrument;
use crate::engine::types::{Bound, Evaluation, LegBreakdown, OptionLeg};
use crate::paper::{PaperTrade, Portfolio};

/// AI-enriched response for `evaluate_payoff`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EvaluatePayoffResponse {
    pub summary: String,
    pub spot_price: f64,
    pub lot_size: u32,
    pub evaluation: Evaluation,
    pub suggested_next_steps: Vec<String>,
}

/// Curve-free view of one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotSummary {
    /// `None` is the all-expiries view.
    pub snapshot_expiry: Option<NaiveDate>,
    pub leg_count: usize,
    pub breakevens: Vec<f64>,
    pub pop: f64,
    pub max_profit: Bound,
    pub max_loss: Bound,
    pub current_pnl: f64,
    pub margin_required: Bound,
    pub net_premium: f64,
}

/// AI-enriched response for `evaluate_snapshots`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotsResponse {
    pub summary: String,
    pub spot_price: f64,
    pub lot_size: u32,
    pub snapshots: Vec<SnapshotSummary>,
    pub suggested_next_steps: Vec<String>,
}

/// Response for `payoff_breakdown`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BreakdownResponse {
    pub summary: String,
    pub lot_size: u32,
    pub breakdown: LegBreakdown,
    pub suggested_next_steps: Vec<String>,
}

/// Response for `list_strategies`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StrategiesResponse {
    pub summary: String,
    pub total: usize,
    pub categories: HashMap<String, usize>,
    pub strategies: Vec<StrategyInfo>,
    pub suggested_next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StrategyInfo {
    pub name: String,
    pub category: String,
    pub legs: usize,
    pub multi_expiration: bool,
    pub description: String,
}

/// AI-enriched response for `build_strategy`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BuildStrategyResponse {
    pub summary: String,
    pub strategy: String,
    pub instrument: String,
    pub spot_price: f64,
    pub lot_size: u32,
    pub as_of: NaiveDate,
    pub expiry: NaiveDate,
    pub far_expiry: Option<NaiveDate>,
    pub legs: Vec<OptionLeg>,
    pub evaluation: Evaluation,
    pub suggested_next_steps: Vec<String>,
}

/// Response for `list_instruments`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InstrumentsResponse {
    pub summary: String,
    pub instruments: Vec<Instrument>,
    pub suggested_next_steps: Vec<String>,
}

/// Response for `get_option_chain`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OptionChainResponse {
    pub summary: String,
    pub instrument: String,
    pub spot_price: f64,
    pub as_of: NaiveDate,
    pub expiries: Vec<NaiveDate>,
    pub pcr: f64,
    pub rows: Vec<ChainRow>,
    pub suggested_next_steps: Vec<String>,
}

/// Response for `market_summary`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MarketSummaryResponse {
    pub summary: String,
    pub as_of: NaiveDate,
    pub market: MarketSummary,
    pub suggested_next_steps: Vec<String>,
}

/// Response for `open_paper_trade` and `close_paper_trade`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaperTradeResponse {
    pub summary: String,
    pub trade: PaperTrade,
    pub pnl: f64,
    pub suggested_next_steps: Vec<String>,
}

/// Response for `list_paper_positions`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PortfolioResponse {
    pub summary: String,
    /// Date the open positions were marked at, when repriced.
    pub marked_as_of: Option<NaiveDate>,
    pub portfolio: Portfolio,
    pub suggested_next_steps: Vec<String>,
}
