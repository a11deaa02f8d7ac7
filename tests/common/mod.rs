#![allow(dead_code)]

use chrono::NaiveDate;
use payoff_mcp::engine::types::{Action, EvaluationConfig, OptionLeg, OptionType};

pub const LOT: u32 = 50;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn config() -> EvaluationConfig {
    EvaluationConfig::new(LOT)
}

pub fn buy_call(strike: f64, premium: f64) -> OptionLeg {
    OptionLeg::new(OptionType::Call, Action::Buy, strike, premium, 1)
}

pub fn sell_call(strike: f64, premium: f64) -> OptionLeg {
    OptionLeg::new(OptionType::Call, Action::Sell, strike, premium, 1)
}

pub fn buy_put(strike: f64, premium: f64) -> OptionLeg {
    OptionLeg::new(OptionType::Put, Action::Buy, strike, premium, 1)
}

pub fn sell_put(strike: f64, premium: f64) -> OptionLeg {
    OptionLeg::new(OptionType::Put, Action::Sell, strike, premium, 1)
}

/// Short strangle at 90/110 with wings at 80/120, all quantity 1.
pub fn iron_condor() -> Vec<OptionLeg> {
    vec![
        buy_put(80.0, 1.0),
        sell_put(90.0, 3.0),
        sell_call(110.0, 3.0),
        buy_call(120.0, 1.0),
    ]
}
