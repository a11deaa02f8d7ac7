use super::helpers::{call_leg, far, put_leg, strategy, Action, StrategyDef};

pub fn call_calendar_spread() -> StrategyDef {
    strategy(
        "call_calendar_spread",
        "Calendar",
        "Sell near-term ATM call, buy far-term call at same strike",
        vec![
            call_leg(Action::Sell, 0, 1),     // near-term
            far(call_leg(Action::Buy, 0, 1)), // far-term
        ],
    )
}

pub fn put_calendar_spread() -> StrategyDef {
    strategy(
        "put_calendar_spread",
        "Calendar",
        "Sell near-term ATM put, buy far-term put at same strike",
        vec![put_leg(Action::Sell, 0, 1), far(put_leg(Action::Buy, 0, 1))],
    )
}

pub fn all() -> Vec<StrategyDef> {
    vec![call_calendar_spread(), put_calendar_spread()]
}
