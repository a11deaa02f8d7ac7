use super::helpers::{call_leg, put_leg, strategy, Action, StrategyDef};

pub fn long_call_butterfly() -> StrategyDef {
    strategy(
        "long_call_butterfly",
        "Butterflies",
        "Buy 1 lower call, sell 2 ATM calls, buy 1 upper call",
        vec![
            call_leg(Action::Buy, -1, 1),
            call_leg(Action::Sell, 0, 2),
            call_leg(Action::Buy, 1, 1),
        ],
    )
}

pub fn long_put_butterfly() -> StrategyDef {
    strategy(
        "long_put_butterfly",
        "Butterflies",
        "Buy 1 upper put, sell 2 ATM puts, buy 1 lower put",
        vec![
            put_leg(Action::Buy, 1, 1),
            put_leg(Action::Sell, 0, 2),
            put_leg(Action::Buy, -1, 1),
        ],
    )
}

pub fn all() -> Vec<StrategyDef> {
    vec![long_call_butterfly(), long_put_butterfly()]
}
