use super::helpers::{call_leg, put_leg, strategy, Action, StrategyDef};

pub fn iron_condor() -> StrategyDef {
    strategy(
        "iron_condor",
        "Iron",
        "Short strangle one strike out, protected by wings two strikes out",
        vec![
            call_leg(Action::Buy, 2, 1),
            call_leg(Action::Sell, 1, 1),
            put_leg(Action::Sell, -1, 1),
            put_leg(Action::Buy, -2, 1),
        ],
    )
}

pub fn iron_butterfly() -> StrategyDef {
    strategy(
        "iron_butterfly",
        "Iron",
        "Short ATM straddle protected by wings one strike out",
        vec![
            call_leg(Action::Buy, 1, 1),
            call_leg(Action::Sell, 0, 1),
            put_leg(Action::Sell, 0, 1),
            put_leg(Action::Buy, -1, 1),
        ],
    )
}

pub fn all() -> Vec<StrategyDef> {
    vec![iron_condor(), iron_butterfly()]
}
