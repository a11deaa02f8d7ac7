use super::helpers::{call_leg, put_leg, strategy, Action, StrategyDef};

pub fn long_call() -> StrategyDef {
    strategy("long_call", "Singles", "Buy an ATM call", vec![call_leg(Action::Buy, 0, 1)])
}

pub fn short_call() -> StrategyDef {
    strategy("short_call", "Singles", "Sell an ATM call", vec![call_leg(Action::Sell, 0, 1)])
}

pub fn long_put() -> StrategyDef {
    strategy("long_put", "Singles", "Buy an ATM put", vec![put_leg(Action::Buy, 0, 1)])
}

pub fn short_put() -> StrategyDef {
    strategy("short_put", "Singles", "Sell an ATM put", vec![put_leg(Action::Sell, 0, 1)])
}

pub fn all() -> Vec<StrategyDef> {
    vec![long_call(), short_call(), long_put(), short_put()]
}
