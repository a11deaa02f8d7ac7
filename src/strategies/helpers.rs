pub use crate::engine::types::{Action, ExpirationCycle, LegDef, OptionType, StrategyDef};

pub fn leg(action: Action, option_type: OptionType, strike_offset: i32, qty: u32) -> LegDef {
    LegDef {
        action,
        option_type,
        strike_offset,
        qty,
        expiration_cycle: ExpirationCycle::Primary,
    }
}

pub fn call_leg(action: Action, strike_offset: i32, qty: u32) -> LegDef {
    leg(action, OptionType::Call, strike_offset, qty)
}

pub fn put_leg(action: Action, strike_offset: i32, qty: u32) -> LegDef {
    leg(action, OptionType::Put, strike_offset, qty)
}

/// Move a leg to the far-term expiry.
pub fn far(mut leg: LegDef) -> LegDef {
    leg.expiration_cycle = ExpirationCycle::Secondary;
    leg
}

pub fn strategy(name: &str, category: &str, description: &str, legs: Vec<LegDef>) -> StrategyDef {
    StrategyDef {
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        legs,
    }
}
