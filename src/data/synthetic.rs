//! Synthetic option chain generator.
//!
//! Produces a plausible chain around the instrument's spot without any market
//! feed: a volatility smile that rises away from ATM, premiums from a
//! simplified time-value approximation, and randomized volume, open interest
//! and day change. All randomness comes from the caller's generator.

use chrono::NaiveDate;
use rand::{Rng, RngCore};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::instruments::{self, Instrument};
use super::{ChainError, QuoteRecord, QuoteSource};
use crate::engine::types::OptionType;

/// Strikes generated per expiry, centred on ATM.
pub const STRIKES_PER_EXPIRY: usize = 15;
/// Premiums never quote below this.
pub const MIN_PREMIUM: f64 = 0.05;

const BASE_IV: f64 = 16.0;
const IV_SKEW: f64 = 20.0;
const ITM_IV_ADJUST: f64 = -1.0;
const OTM_IV_ADJUST: f64 = 2.0;
const TIME_VALUE_FACTOR: f64 = 0.4;
const MONEYNESS_DECAY: f64 = 0.05;
const ATM_ACTIVITY_MULTIPLIER: f64 = 3.0;

/// Quote for one side (call or put) of a strike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SideQuote {
    pub ltp: f64,
    pub bid: f64,
    pub ask: f64,
    /// Implied volatility in percent.
    pub iv: f64,
    pub change: f64,
    pub volume: u64,
    pub open_interest: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChainRow {
    pub strike: f64,
    pub expiry: NaiveDate,
    pub call: SideQuote,
    pub put: SideQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    /// Bullish above 1.2 PCR, bearish below 0.8, neutral otherwise.
    pub fn from_pcr(pcr: f64) -> Self {
        if pcr > 1.2 {
            Sentiment::Bullish
        } else if pcr < 0.8 {
            Sentiment::Bearish
        } else {
            Sentiment::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarketSummary {
    pub symbol: String,
    pub spot_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub total_call_oi: u64,
    pub total_put_oi: u64,
    pub pcr: f64,
    pub sentiment: Sentiment,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole days from `as_of` to `expiry`, never negative.
pub fn days_to_expiry(as_of: NaiveDate, expiry: NaiveDate) -> u32 {
    (expiry - as_of).num_days().max(0) as u32
}

/// Premium approximation: intrinsic plus time value discounted by distance
/// from spot. `iv` is in percent.
pub fn option_premium(
    spot: f64,
    strike: f64,
    option_type: OptionType,
    iv: f64,
    days_to_expiry: u32,
) -> f64 {
    let intrinsic = crate::engine::pricing::intrinsic(option_type, strike, spot);
    let time_value =
        (iv / 100.0) * (f64::from(days_to_expiry) / 365.0).sqrt() * spot * TIME_VALUE_FACTOR;
    let discount = (-(spot - strike).abs() / (spot * MONEYNESS_DECAY)).exp();
    round2(intrinsic + time_value * discount).max(MIN_PREMIUM)
}

/// Call and put implied volatility (percent) for one strike.
pub fn smile_iv(spot: f64, strike: f64) -> (f64, f64) {
    let base = BASE_IV + (strike - spot).abs() / spot * IV_SKEW;
    let adjust = |itm: bool| round2(base + if itm { ITM_IV_ADJUST } else { OTM_IV_ADJUST });
    (adjust(strike < spot), adjust(strike > spot))
}

fn day_change<R: Rng + ?Sized>(itm: bool, rng: &mut R) -> f64 {
    let u: f64 = rng.random();
    if itm {
        round2(5.0 + u * 15.0)
    } else {
        round2(-2.0 - u * 10.0)
    }
}

fn side_quote(ltp: f64, iv: f64, change: f64, volume: f64, open_interest: f64) -> SideQuote {
    SideQuote {
        ltp,
        bid: round2(ltp * 0.98),
        ask: round2(ltp * 1.02),
        iv,
        change,
        volume: volume.round() as u64,
        open_interest: open_interest.round() as u64,
    }
}

fn strikes_around(instrument: &Instrument) -> Vec<f64> {
    let center = instrument.atm_strike();
    let half = (STRIKES_PER_EXPIRY / 2) as i64;
    (-half..=half)
        .map(|i| center + i as f64 * instrument.strike_interval)
        .collect()
}

/// Generate chain rows for `expiries`, in the order given, strikes ascending.
pub fn generate_chain<R: Rng + ?Sized>(
    instrument: &Instrument,
    expiries: &[NaiveDate],
    as_of: NaiveDate,
    rng: &mut R,
) -> Vec<ChainRow> {
    let spot = instrument.spot_price;
    let strikes = strikes_around(instrument);
    let mut rows = Vec::with_capacity(strikes.len() * expiries.len());

    for &expiry in expiries {
        let dte = days_to_expiry(as_of, expiry);

        for &strike in &strikes {
            let (call_iv, put_iv) = smile_iv(spot, strike);
            let call_ltp = option_premium(spot, strike, OptionType::Call, call_iv, dte);
            let put_ltp = option_premium(spot, strike, OptionType::Put, put_iv, dte);

            let activity = if (strike - spot).abs() <= instrument.strike_interval {
                ATM_ACTIVITY_MULTIPLIER
            } else {
                1.0
            };
            let volume = (5_000.0 + rng.random::<f64>() * 10_000.0) * activity;
            let open_interest = (20_000.0 + rng.random::<f64>() * 50_000.0) * activity;
            let call_change = day_change(strike < spot, rng);
            let put_change = day_change(strike > spot, rng);

            rows.push(ChainRow {
                strike,
                expiry,
                call: side_quote(call_ltp, call_iv, call_change, volume, open_interest),
                put: side_quote(put_ltp, put_iv, put_change, volume * 0.9, open_interest * 1.1),
            });
        }
    }

    tracing::debug!(
        symbol = %instrument.symbol,
        expiries = expiries.len(),
        rows = rows.len(),
        "generated synthetic chain"
    );
    rows
}

/// Flatten chain rows into the records strategy construction consumes.
pub fn quote_records(rows: &[ChainRow]) -> Vec<QuoteRecord> {
    rows.iter()
        .map(|r| QuoteRecord {
            strike: r.strike,
            expiry: r.expiry,
            call_premium: r.call.ltp,
            put_premium: r.put.ltp,
        })
        .collect()
}

fn oi_totals(rows: &[ChainRow]) -> (u64, u64) {
    rows.iter().fold((0, 0), |(calls, puts), r| {
        (calls + r.call.open_interest, puts + r.put.open_interest)
    })
}

/// Put/call open-interest ratio to two decimals; 0 when there is no call OI.
pub fn pcr(rows: &[ChainRow]) -> f64 {
    let (calls, puts) = oi_totals(rows);
    if calls == 0 {
        return 0.0;
    }
    round2(puts as f64 / calls as f64)
}

pub fn market_summary(instrument: &Instrument, rows: &[ChainRow]) -> MarketSummary {
    let (total_call_oi, total_put_oi) = oi_totals(rows);
    let pcr = pcr(rows);
    MarketSummary {
        symbol: instrument.symbol.clone(),
        spot_price: instrument.spot_price,
        change: instrument.change,
        change_percent: instrument.change_percent,
        total_call_oi,
        total_put_oi,
        pcr,
        sentiment: Sentiment::from_pcr(pcr),
    }
}

/// `QuoteSource` over a fixed instrument list and the synthetic generator.
pub struct SyntheticSource {
    instruments: Vec<Instrument>,
}

impl SyntheticSource {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(instruments::builtin())
    }
}

impl QuoteSource for SyntheticSource {
    fn instruments(&self) -> Vec<Instrument> {
        self.instruments.clone()
    }

    fn instrument(&self, symbol: &str) -> Result<Instrument, ChainError> {
        instruments::find(&self.instruments, symbol)
            .cloned()
            .ok_or_else(|| ChainError::UnknownInstrument(symbol.to_string()))
    }

    fn chain(
        &self,
        symbol: &str,
        expiry: Option<NaiveDate>,
        as_of: NaiveDate,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ChainRow>, ChainError> {
        let instrument = self.instrument(symbol)?;
        let expiries = match expiry {
            Some(e) if instrument.lists_expiry(e) => vec![e],
            Some(e) => {
                return Err(ChainError::UnknownExpiry {
                    symbol: instrument.symbol,
                    expiry: e,
                })
            }
            None => instrument.expiries.clone(),
        };
        Ok(generate_chain(&instrument, &expiries, as_of, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn nifty() -> Instrument {
        SyntheticSource::default().instrument("NIFTY").unwrap()
    }

    #[test]
    fn dte_is_clamped_at_zero() {
        assert_eq!(days_to_expiry(date(2025, 10, 1), date(2025, 10, 28)), 27);
        assert_eq!(days_to_expiry(date(2025, 11, 1), date(2025, 10, 28)), 0);
    }

    #[test]
    fn premium_at_expiry_is_intrinsic_with_floor() {
        assert_eq!(option_premium(100.0, 90.0, OptionType::Call, 20.0, 0), 10.0);
        assert_eq!(option_premium(100.0, 110.0, OptionType::Call, 20.0, 0), MIN_PREMIUM);
    }

    #[test]
    fn atm_premium_matches_formula() {
        // 0.2 × sqrt(365/365) × 100 × 0.4 = 8
        assert!((option_premium(100.0, 100.0, OptionType::Put, 20.0, 365) - 8.0).abs() < 1e-10);
    }

    #[test]
    fn smile_is_cheaper_in_the_money() {
        let (call_iv, put_iv) = smile_iv(22_045.0, 21_900.0);
        assert!(call_iv < put_iv);
        let (call_iv, put_iv) = smile_iv(22_045.0, 22_200.0);
        assert!(call_iv > put_iv);
    }

    #[test]
    fn chain_has_fifteen_ascending_strikes_per_expiry() {
        let mut rng = StdRng::seed_from_u64(7);
        let inst = nifty();
        let rows = generate_chain(&inst, &inst.expiries, date(2025, 10, 20), &mut rng);
        assert_eq!(rows.len(), STRIKES_PER_EXPIRY * 3);
        let first: Vec<f64> = rows.iter().take(STRIKES_PER_EXPIRY).map(|r| r.strike).collect();
        assert_eq!(first[0], 21_700.0);
        assert_eq!(first[STRIKES_PER_EXPIRY - 1], 22_400.0);
        assert!(first.windows(2).all(|w| w[1] - w[0] == 50.0));
    }

    #[test]
    fn chain_quotes_are_consistent() {
        let mut rng = StdRng::seed_from_u64(11);
        let inst = nifty();
        let rows = generate_chain(&inst, &inst.expiries[..1], date(2025, 10, 20), &mut rng);
        for r in &rows {
            assert!(r.call.ltp >= MIN_PREMIUM && r.put.ltp >= MIN_PREMIUM);
            assert!(r.call.bid <= r.call.ltp && r.call.ltp <= r.call.ask);
            assert!(r.put.open_interest >= r.call.open_interest);
            if r.strike < inst.spot_price {
                assert!(r.call.change >= 5.0 && r.put.change <= -2.0);
            }
        }
    }

    #[test]
    fn same_seed_same_chain() {
        let inst = nifty();
        let as_of = date(2025, 10, 20);
        let a = generate_chain(&inst, &inst.expiries, as_of, &mut StdRng::seed_from_u64(3));
        let b = generate_chain(&inst, &inst.expiries, as_of, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn source_rejects_unknown_inputs() {
        let source = SyntheticSource::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            source.chain("XYZ", None, date(2025, 10, 20), &mut rng),
            Err(ChainError::UnknownInstrument("XYZ".to_string()))
        );
        assert!(matches!(
            source.chain("TCS", Some(date(2025, 11, 4)), date(2025, 10, 20), &mut rng),
            Err(ChainError::UnknownExpiry { .. })
        ));
    }

    #[test]
    fn pcr_and_sentiment() {
        let mut rng = StdRng::seed_from_u64(5);
        let inst = nifty();
        let rows = generate_chain(&inst, &inst.expiries, date(2025, 10, 20), &mut rng);
        // Put OI is call OI × 1.1 at every strike
        assert_eq!(pcr(&rows), 1.1);
        let summary = market_summary(&inst, &rows);
        assert_eq!(summary.sentiment, Sentiment::Neutral);
        assert!(summary.total_put_oi > summary.total_call_oi);
        assert_eq!(pcr(&[]), 0.0);
        assert_eq!(Sentiment::from_pcr(1.3), Sentiment::Bullish);
        assert_eq!(Sentiment::from_pcr(0.7), Sentiment::Bearish);
    }

    #[test]
    fn quote_records_carry_ltp() {
        let mut rng = StdRng::seed_from_u64(9);
        let inst = nifty();
        let rows = generate_chain(&inst, &inst.expiries[..1], date(2025, 10, 20), &mut rng);
        let records = quote_records(&rows);
        assert_eq!(records.len(), rows.len());
        assert_eq!(records[3].call_premium, rows[3].call.ltp);
        assert_eq!(records[3].put_premium, rows[3].put.ltp);
    }
}
