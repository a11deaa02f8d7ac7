pub mod instruments;
pub mod synthetic;

use chrono::NaiveDate;
use rand::RngCore;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use instruments::Instrument;
pub use synthetic::{ChainRow, SyntheticSource};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("unknown instrument '{0}'")]
    UnknownInstrument(String),
    #[error("expiry {expiry} is not listed for {symbol}")]
    UnknownExpiry { symbol: String, expiry: NaiveDate },
}

/// Flat per-strike premium record consumed by strategy construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuoteRecord {
    pub strike: f64,
    pub expiry: NaiveDate,
    pub call_premium: f64,
    pub put_premium: f64,
}

/// Supplier of instruments and option chains.
///
/// Randomness is injected by the caller so chains are reproducible under a
/// seeded generator.
pub trait QuoteSource: Send + Sync {
    fn instruments(&self) -> Vec<Instrument>;

    fn instrument(&self, symbol: &str) -> Result<Instrument, ChainError>;

    /// Chain rows for one expiry, or every listed expiry when `expiry` is `None`.
    fn chain(
        &self,
        symbol: &str,
        expiry: Option<NaiveDate>,
        as_of: NaiveDate,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ChainRow>, ChainError>;
}
