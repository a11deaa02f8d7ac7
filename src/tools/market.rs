use anyhow::Result;
use chrono::NaiveDate;

use crate::data::{synthetic, QuoteSource};

use super::ai_format;
use super::response_types::MarketSummaryResponse;

/// OI totals and sentiment across every listed expiry.
pub fn execute(
    source: &dyn QuoteSource,
    symbol: &str,
    as_of: Option<NaiveDate>,
    seed: Option<u64>,
) -> Result<MarketSummaryResponse> {
    let instrument = source.instrument(symbol)?;
    let as_of = as_of.unwrap_or_else(super::today);
    let mut rng = super::rng_for(seed);
    tracing::info!(symbol = %instrument.symbol, %as_of, "market_summary");

    let rows = source.chain(&instrument.symbol, None, as_of, &mut rng)?;
    let market = synthetic::market_summary(&instrument, &rows);
    Ok(ai_format::format_market_summary(as_of, market))
}
