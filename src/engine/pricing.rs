use chrono::NaiveDate;

use super::types::{Action, OptionLeg, OptionType, ViewMode};

/// Value of the option if exercised at `price`; time value is ignored.
pub fn intrinsic(option_type: OptionType, strike: f64, price: f64) -> f64 {
    match option_type {
        OptionType::Call => (price - strike).max(0.0),
        OptionType::Put => (strike - price).max(0.0),
    }
}

/// Calculate one leg's P&L at `price` under the given snapshot view.
///
/// In `ExpiryOnly` mode with a specific snapshot, legs expiring on another
/// date contribute nothing. Otherwise every leg is valued at intrinsic.
pub fn leg_payoff(
    leg: &OptionLeg,
    price: f64,
    view_mode: ViewMode,
    snapshot: Option<NaiveDate>,
    lot_size: f64,
) -> f64 {
    if !leg.in_view(view_mode, snapshot) {
        return 0.0;
    }

    let value = intrinsic(leg.option_type, leg.strike(), price);
    (value - leg.premium()) * leg.action.multiplier() * leg.lots() * lot_size
}

/// Sum of `leg_payoff` over all legs at one price.
pub fn total_payoff(
    legs: &[OptionLeg],
    price: f64,
    view_mode: ViewMode,
    snapshot: Option<NaiveDate>,
    lot_size: f64,
) -> f64 {
    legs.iter()
        .map(|leg| leg_payoff(leg, price, view_mode, snapshot, lot_size))
        .sum()
}

/// Net premium of the position: received minus paid, scaled by lots.
pub fn net_premium(legs: &[OptionLeg], lot_size: f64) -> f64 {
    legs.iter()
        .map(|leg| {
            let flow = leg.premium() * leg.lots() * lot_size;
            match leg.action {
                Action::Buy => -flow,
                Action::Sell => flow,
            }
        })
        .sum()
}
