use anyhow::Result;
use chrono::NaiveDate;

use crate::data::{synthetic, QuoteSource};

use super::ai_format;
use super::response_types::OptionChainResponse;

pub fn execute(
    source: &dyn QuoteSource,
    symbol: &str,
    expiry: Option<NaiveDate>,
    as_of: Option<NaiveDate>,
    seed: Option<u64>,
) -> Result<OptionChainResponse> {
    let instrument = source.instrument(symbol)?;
    let as_of = as_of.unwrap_or_else(super::today);
    let mut rng = super::rng_for(seed);
    tracing::info!(symbol = %instrument.symbol, ?expiry, %as_of, "get_option_chain");

    let rows = source.chain(&instrument.symbol, expiry, as_of, &mut rng)?;
    let pcr = synthetic::pcr(&rows);
    Ok(ai_format::format_chain(&instrument, as_of, rows, pcr))
}
