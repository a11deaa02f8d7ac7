use super::helpers::{call_leg, put_leg, strategy, Action, StrategyDef};

// Vertical spreads
pub fn bull_call_spread() -> StrategyDef {
    strategy("bull_call_spread", "Spreads", "Buy ATM call, sell the next call up", vec![
        call_leg(Action::Buy, 0, 1),
        call_leg(Action::Sell, 1, 1),
    ])
}

pub fn bear_call_spread() -> StrategyDef {
    strategy("bear_call_spread", "Spreads", "Sell ATM call, buy the next call up", vec![
        call_leg(Action::Sell, 0, 1),
        call_leg(Action::Buy, 1, 1),
    ])
}

pub fn bull_put_spread() -> StrategyDef {
    strategy("bull_put_spread", "Spreads", "Sell ATM put, buy the next put down", vec![
        put_leg(Action::Sell, 0, 1),
        put_leg(Action::Buy, -1, 1),
    ])
}

pub fn bear_put_spread() -> StrategyDef {
    strategy("bear_put_spread", "Spreads", "Buy ATM put, sell the next put down", vec![
        put_leg(Action::Buy, 0, 1),
        put_leg(Action::Sell, -1, 1),
    ])
}

// Straddles
pub fn long_straddle() -> StrategyDef {
    strategy("long_straddle", "Spreads", "Buy ATM call and put at same strike", vec![
        call_leg(Action::Buy, 0, 1),
        put_leg(Action::Buy, 0, 1),
    ])
}

pub fn short_straddle() -> StrategyDef {
    strategy("short_straddle", "Spreads", "Sell ATM call and put at same strike", vec![
        call_leg(Action::Sell, 0, 1),
        put_leg(Action::Sell, 0, 1),
    ])
}

// Strangles
pub fn long_strangle() -> StrategyDef {
    strategy("long_strangle", "Spreads", "Buy call one strike up and put one strike down", vec![
        call_leg(Action::Buy, 1, 1),
        put_leg(Action::Buy, -1, 1),
    ])
}

pub fn short_strangle() -> StrategyDef {
    strategy("short_strangle", "Spreads", "Sell call one strike up and put one strike down", vec![
        call_leg(Action::Sell, 1, 1),
        put_leg(Action::Sell, -1, 1),
    ])
}

pub fn all() -> Vec<StrategyDef> {
    vec![
        bull_call_spread(),
        bear_call_spread(),
        bull_put_spread(),
        bear_put_spread(),
        long_straddle(),
        short_straddle(),
        long_strangle(),
        short_strangle(),
    ]
}
