use anyhow::Result;
use chrono::NaiveDate;

use crate::data::QuoteSource;
use crate::paper::{OpenOrder, PaperLedger};

use super::ai_format;
use super::response_types::{PaperTradeResponse, PortfolioResponse};

pub fn execute_open(
    source: &dyn QuoteSource,
    ledger: &PaperLedger,
    order: &OpenOrder,
    as_of: Option<NaiveDate>,
    seed: Option<u64>,
) -> Result<PaperTradeResponse> {
    let as_of = as_of.unwrap_or_else(super::today);
    let mut rng = super::rng_for(seed);
    tracing::info!(
        symbol = %order.instrument,
        strike = order.strike,
        %as_of,
        "open_paper_trade"
    );

    let trade = ledger.open(source, order, as_of, &mut rng)?;
    Ok(ai_format::format_paper_open(trade))
}

/// Current book; positions are repriced first when `as_of` is given.
pub fn execute_list(
    source: &dyn QuoteSource,
    ledger: &PaperLedger,
    as_of: Option<NaiveDate>,
    seed: Option<u64>,
) -> Result<PortfolioResponse> {
    if let Some(as_of) = as_of {
        ledger.mark_to_market(source, as_of, &mut super::rng_for(seed))?;
    }
    Ok(ai_format::format_portfolio(ledger.portfolio()?, as_of))
}

/// Close at the last mark, or at a fresh mark on `as_of` when given.
pub fn execute_close(
    source: &dyn QuoteSource,
    ledger: &PaperLedger,
    id: &str,
    as_of: Option<NaiveDate>,
    seed: Option<u64>,
) -> Result<PaperTradeResponse> {
    tracing::info!(id, ?as_of, "close_paper_trade");
    if let Some(as_of) = as_of {
        ledger.mark_to_market(source, as_of, &mut super::rng_for(seed))?;
    }
    let trade = ledger.close(id)?;
    Ok(ai_format::format_paper_close(trade))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SyntheticSource;
    use crate::engine::types::{Action, OptionType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn short_put() -> OpenOrder {
        OpenOrder {
            instrument: "TCS".to_string(),
            strike: 3_650.0,
            expiry: date(2025, 11, 28),
            option_type: OptionType::Put,
            action: Action::Sell,
            quantity: 125,
        }
    }

    #[test]
    fn open_mark_close_cycle() {
        let source = SyntheticSource::default();
        let ledger = PaperLedger::new();

        let as_of = Some(date(2025, 10, 20));
        let opened = execute_open(&source, &ledger, &short_put(), as_of, Some(5)).unwrap();
        assert_eq!(opened.pnl, 0.0);
        assert!(opened.summary.contains("Sell 125 x TCS 3650 PE"));

        let listed = execute_list(&source, &ledger, Some(date(2025, 11, 20)), Some(5)).unwrap();
        assert_eq!(listed.marked_as_of, Some(date(2025, 11, 20)));
        assert_eq!(listed.portfolio.positions.len(), 1);
        // Short option gains as time value decays
        assert!(listed.portfolio.unrealized_pnl > 0.0);

        let closed = execute_close(&source, &ledger, &opened.trade.id, None, None).unwrap();
        assert!((closed.pnl - listed.portfolio.unrealized_pnl).abs() < 1e-9);
        assert!(closed.summary.contains("P&L +"));

        let after = execute_list(&source, &ledger, None, None).unwrap();
        assert!(after.portfolio.positions.is_empty());
        assert_eq!(after.portfolio.history.len(), 1);
        assert!(after.summary.contains("1 closed"));
    }

    #[test]
    fn close_unknown_id_fails() {
        let source = SyntheticSource::default();
        let ledger = PaperLedger::new();
        let err = execute_close(&source, &ledger, "missing", None, None).unwrap_err();
        assert!(err.to_string().contains("no open position"));
    }
}
