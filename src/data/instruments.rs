use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An underlying with its contract details and listed expiries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Instrument {
    pub symbol: String,
    pub spot_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub lot_size: u32,
    pub strike_interval: f64,
    /// Ascending.
    pub expiries: Vec<NaiveDate>,
}

impl Instrument {
    /// ATM strike: spot rounded to the nearest strike interval.
    pub fn atm_strike(&self) -> f64 {
        atm_strike(self.spot_price, self.strike_interval)
    }

    pub fn lists_expiry(&self, expiry: NaiveDate) -> bool {
        self.expiries.contains(&expiry)
    }

    /// First listed expiry on or after `as_of`, else the last listed one.
    pub fn nearest_expiry(&self, as_of: NaiveDate) -> Option<NaiveDate> {
        self.expiries
            .iter()
            .copied()
            .find(|e| *e >= as_of)
            .or_else(|| self.expiries.last().copied())
    }

    /// First listed expiry strictly after `expiry`.
    pub fn next_expiry_after(&self, expiry: NaiveDate) -> Option<NaiveDate> {
        self.expiries.iter().copied().find(|e| *e > expiry)
    }
}

pub fn atm_strike(spot: f64, strike_interval: f64) -> f64 {
    if strike_interval > 0.0 && strike_interval.is_finite() {
        (spot / strike_interval).round() * strike_interval
    } else {
        spot
    }
}

struct Listing {
    symbol: &'static str,
    spot: f64,
    change: f64,
    change_percent: f64,
    lot_size: u32,
    strike_interval: f64,
    expiries: &'static [(i32, u32, u32)],
}

const INDEX_EXPIRIES: &[(i32, u32, u32)] = &[(2025, 10, 28), (2025, 11, 4), (2025, 11, 28)];
const STOCK_EXPIRIES: &[(i32, u32, u32)] = &[(2025, 10, 28), (2025, 11, 28)];

const BUILTIN: &[Listing] = &[
    Listing {
        symbol: "NIFTY",
        spot: 22_045.0,
        change: 185.5,
        change_percent: 0.85,
        lot_size: 50,
        strike_interval: 50.0,
        expiries: INDEX_EXPIRIES,
    },
    Listing {
        symbol: "BANKNIFTY",
        spot: 47_250.0,
        change: -125.3,
        change_percent: -0.26,
        lot_size: 25,
        strike_interval: 100.0,
        expiries: INDEX_EXPIRIES,
    },
    Listing {
        symbol: "RELIANCE",
        spot: 2_850.0,
        change: 42.5,
        change_percent: 1.51,
        lot_size: 250,
        strike_interval: 50.0,
        expiries: STOCK_EXPIRIES,
    },
    Listing {
        symbol: "TCS",
        spot: 3_680.0,
        change: -18.75,
        change_percent: -0.51,
        lot_size: 125,
        strike_interval: 50.0,
        expiries: STOCK_EXPIRIES,
    },
];

/// The built-in instrument registry.
pub fn builtin() -> Vec<Instrument> {
    BUILTIN
        .iter()
        .map(|s| Instrument {
            symbol: s.symbol.to_string(),
            spot_price: s.spot,
            change: s.change,
            change_percent: s.change_percent,
            lot_size: s.lot_size,
            strike_interval: s.strike_interval,
            expiries: s
                .expiries
                .iter()
                .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
                .collect(),
        })
        .collect()
}

/// Case-insensitive lookup in `instruments`.
pub fn find<'a>(instruments: &'a [Instrument], symbol: &str) -> Option<&'a Instrument> {
    let symbol = symbol.trim();
    instruments
        .iter()
        .find(|i| i.symbol.eq_ignore_ascii_case(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn registry_has_four_instruments() {
        let all = builtin();
        let symbols: Vec<_> = all.iter().map(|i| i.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["NIFTY", "BANKNIFTY", "RELIANCE", "TCS"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let all = builtin();
        let nifty = find(&all, "nifty").unwrap();
        assert_eq!(nifty.lot_size, 50);
        assert_eq!(nifty.strike_interval, 50.0);
        assert_eq!(find(&all, " BankNifty ").unwrap().strike_interval, 100.0);
        assert!(find(&all, "SENSEX").is_none());
    }

    #[test]
    fn index_and_stock_expiries() {
        let all = builtin();
        assert_eq!(find(&all, "NIFTY").unwrap().expiries.len(), 3);
        assert_eq!(
            find(&all, "TCS").unwrap().expiries,
            vec![date(2025, 10, 28), date(2025, 11, 28)]
        );
    }

    #[test]
    fn atm_rounds_to_interval() {
        let all = builtin();
        assert_eq!(find(&all, "NIFTY").unwrap().atm_strike(), 22_050.0);
        assert_eq!(find(&all, "BANKNIFTY").unwrap().atm_strike(), 47_300.0);
        assert_eq!(atm_strike(101.0, 0.0), 101.0);
    }

    #[test]
    fn nearest_and_next_expiry() {
        let all = builtin();
        let nifty = find(&all, "NIFTY").unwrap();
        assert_eq!(nifty.nearest_expiry(date(2025, 10, 1)), Some(date(2025, 10, 28)));
        assert_eq!(nifty.nearest_expiry(date(2025, 10, 29)), Some(date(2025, 11, 4)));
        assert_eq!(nifty.nearest_expiry(date(2026, 1, 1)), Some(date(2025, 11, 28)));
        assert_eq!(nifty.next_expiry_after(date(2025, 10, 28)), Some(date(2025, 11, 4)));
        assert_eq!(nifty.next_expiry_after(date(2025, 11, 28)), None);
    }
}
