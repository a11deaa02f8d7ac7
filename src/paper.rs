//! Paper-trading ledger.
//!
//! Simulated option positions opened at the chain's last traded price and
//! marked to market against fresh chains. Closing a position moves it to the
//! order history with its last mark. Nothing is persisted.

use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, Utc};
use rand::RngCore;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::data::{ChainError, ChainRow, QuoteSource};
use crate::engine::types::{Action, OptionType};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LedgerError {
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error("no {option_type} quote for {symbol} {strike} expiring {expiry}")]
    NoQuote {
        symbol: String,
        strike: f64,
        expiry: NaiveDate,
        option_type: &'static str,
    },
    #[error("no open position with id '{0}'")]
    UnknownPosition(String),
    #[error("paper ledger is unavailable after a panic")]
    Poisoned,
}

/// One simulated option trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PaperTrade {
    pub id: String,
    pub instrument: String,
    pub strike: f64,
    pub expiry: NaiveDate,
    pub option_type: OptionType,
    pub action: Action,
    /// Number of contracts.
    pub quantity: u32,
    pub entry_price: f64,
    /// Last mark; equals `entry_price` until the position is repriced.
    pub current_price: f64,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl PaperTrade {
    /// Price move times quantity, sign-flipped for short positions.
    pub fn pnl(&self) -> f64 {
        (self.current_price - self.entry_price)
            * f64::from(self.quantity)
            * self.action.multiplier()
    }
}

/// Order to open a position at the current quote.
#[derive(Debug, Clone)]
pub struct OpenOrder {
    pub instrument: String,
    pub strike: f64,
    pub expiry: NaiveDate,
    pub option_type: OptionType,
    pub action: Action,
    pub quantity: u32,
}

/// Open positions, closed history and their P&L totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Portfolio {
    pub positions: Vec<PaperTrade>,
    pub history: Vec<PaperTrade>,
    /// Sum of P&L over open positions at their last mark.
    pub unrealized_pnl: f64,
    /// Sum of P&L locked in by closed positions.
    pub realized_pnl: f64,
}

#[derive(Debug, Default)]
struct Book {
    open: Vec<PaperTrade>,
    history: Vec<PaperTrade>,
}

/// Shared paper-trading book. Safe to share between tasks.
#[derive(Debug, Default)]
pub struct PaperLedger {
    book: RwLock<Book>,
}

fn side_ltp(row: &ChainRow, option_type: OptionType) -> f64 {
    match option_type {
        OptionType::Call => row.call.ltp,
        OptionType::Put => row.put.ltp,
    }
}

/// Last traded price for one contract from a freshly generated chain.
fn quote(
    source: &dyn QuoteSource,
    symbol: &str,
    strike: f64,
    expiry: NaiveDate,
    option_type: OptionType,
    as_of: NaiveDate,
    rng: &mut dyn RngCore,
) -> Result<f64, LedgerError> {
    let rows = source.chain(symbol, Some(expiry), as_of, rng)?;
    rows.iter()
        .find(|r| (r.strike - strike).abs() < 1e-6)
        .map(|r| side_ltp(r, option_type))
        .ok_or_else(|| LedgerError::NoQuote {
            symbol: symbol.to_string(),
            strike,
            expiry,
            option_type: option_type.as_str(),
        })
}

impl PaperLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a position at the chain's last traded price on `as_of`.
    pub fn open(
        &self,
        source: &dyn QuoteSource,
        order: &OpenOrder,
        as_of: NaiveDate,
        rng: &mut dyn RngCore,
    ) -> Result<PaperTrade, LedgerError> {
        let instrument = source.instrument(&order.instrument)?;
        let entry_price = quote(
            source,
            &instrument.symbol,
            order.strike,
            order.expiry,
            order.option_type,
            as_of,
            rng,
        )?;

        let trade = PaperTrade {
            id: uuid::Uuid::new_v4().to_string(),
            instrument: instrument.symbol,
            strike: order.strike,
            expiry: order.expiry,
            option_type: order.option_type,
            action: order.action,
            quantity: order.quantity.max(1),
            entry_price,
            current_price: entry_price,
            opened_at: Utc::now(),
            closed_at: None,
        };
        tracing::info!(
            id = %trade.id,
            symbol = %trade.instrument,
            strike = trade.strike,
            entry_price,
            "opened paper position"
        );

        self.book
            .write()
            .map_err(|_| LedgerError::Poisoned)?
            .open
            .push(trade.clone());
        Ok(trade)
    }

    /// Reprice every open position against the chain on `as_of`. A position
    /// whose strike has left the chain keeps its previous mark.
    pub fn mark_to_market(
        &self,
        source: &dyn QuoteSource,
        as_of: NaiveDate,
        rng: &mut dyn RngCore,
    ) -> Result<(), LedgerError> {
        let mut book = self.book.write().map_err(|_| LedgerError::Poisoned)?;
        for trade in &mut book.open {
            match quote(
                source,
                &trade.instrument,
                trade.strike,
                trade.expiry,
                trade.option_type,
                as_of,
                rng,
            ) {
                Ok(price) => trade.current_price = price,
                Err(e) => tracing::warn!(id = %trade.id, error = %e, "keeping previous mark"),
            }
        }
        Ok(())
    }

    /// Move an open position to the history at its last mark.
    pub fn close(&self, id: &str) -> Result<PaperTrade, LedgerError> {
        let mut book = self.book.write().map_err(|_| LedgerError::Poisoned)?;
        let idx = book
            .open
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LedgerError::UnknownPosition(id.to_string()))?;

        let mut trade = book.open.remove(idx);
        trade.closed_at = Some(Utc::now());
        tracing::info!(id, pnl = trade.pnl(), "closed paper position");
        book.history.push(trade.clone());
        Ok(trade)
    }

    pub fn portfolio(&self) -> Result<Portfolio, LedgerError> {
        let book = self.book.read().map_err(|_| LedgerError::Poisoned)?;
        Ok(Portfolio {
            unrealized_pnl: book.open.iter().map(PaperTrade::pnl).sum(),
            realized_pnl: book.history.iter().map(PaperTrade::pnl).sum(),
            positions: book.open.clone(),
            history: book.history.clone(),
        })
    }
}
