use chrono::NaiveDate;
use garde::Validate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    /// Sign applied to `intrinsic - premium`: buyers pay premium and receive
    /// intrinsic, sellers the reverse.
    pub fn multiplier(self) -> f64 {
        match self {
            Action::Buy => 1.0,
            Action::Sell => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    #[serde(alias = "CE")]
    Call,
    #[serde(alias = "PE")]
    Put,
}

impl OptionType {
    pub fn as_str(self) -> &'static str {
        match self {
            OptionType::Call => "CE",
            OptionType::Put => "PE",
        }
    }
}

/// Which legs contribute when a specific expiry snapshot is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Only legs expiring on the snapshot date contribute.
    #[default]
    ExpiryOnly,
    /// Every leg contributes its intrinsic value at the snapshot.
    AllIntrinsic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationCycle {
    #[default]
    Primary, // Near-term (or same-expiration for non-calendar strategies)
    Secondary, // Far-term (calendar only)
}

/// One leg of a strategy template, placed relative to the ATM strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LegDef {
    pub action: Action,
    pub option_type: OptionType,
    /// Distance from ATM in strike intervals; positive is above.
    pub strike_offset: i32,
    pub qty: u32,
    pub expiration_cycle: ExpirationCycle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StrategyDef {
    pub name: String,
    pub category: String,
    pub description: String,
    pub legs: Vec<LegDef>,
}

impl StrategyDef {
    /// Returns true if this strategy has legs with different expiration cycles.
    pub fn is_multi_expiration(&self) -> bool {
        self.legs
            .iter()
            .any(|l| l.expiration_cycle == ExpirationCycle::Secondary)
    }
}

/// One user-selected option position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionLeg {
    /// Opaque identifier for add/remove bookkeeping; no effect on payoff.
    #[serde(default = "new_leg_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    #[schemars(with = "f64")]
    pub strike: f64,
    pub option_type: OptionType,
    pub action: Action,
    #[serde(default, deserialize_with = "lenient_f64")]
    #[schemars(with = "f64")]
    pub premium: f64,
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    #[schemars(with = "u32")]
    pub quantity: u32,
    /// Absent means the leg applies to every snapshot.
    #[serde(default)]
    pub expiry: Option<NaiveDate>,
}

impl OptionLeg {
    pub fn new(
        option_type: OptionType,
        action: Action,
        strike: f64,
        premium: f64,
        quantity: u32,
    ) -> Self {
        Self {
            id: new_leg_id(),
            strike,
            option_type,
            action,
            premium,
            quantity,
            expiry: None,
        }
    }

    #[must_use]
    pub fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Strike with non-finite values coerced to 0.
    pub fn strike(&self) -> f64 {
        finite_or_zero(self.strike)
    }

    /// Premium with non-finite values coerced to 0.
    pub fn premium(&self) -> f64 {
        finite_or_zero(self.premium)
    }

    /// Quantity in lots, never below 1.
    pub fn lots(&self) -> f64 {
        f64::from(self.quantity.max(1))
    }

    /// Whether this leg takes part in the given view.
    pub fn in_view(&self, view_mode: ViewMode, snapshot: Option<NaiveDate>) -> bool {
        match (view_mode, snapshot) {
            (ViewMode::ExpiryOnly, Some(date)) => self.expiry.is_none_or(|e| e == date),
            _ => true,
        }
    }
}

pub fn new_leg_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_quantity() -> u32 {
    1
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Coerce a loosely-typed JSON value to a finite number; anything else is 0.
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    };
    finite_or_zero(n)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0.0, coerce_number))
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let n = value.as_ref().map_or(0.0, coerce_number).floor();
    Ok(n.clamp(1.0, f64::from(u32::MAX)) as u32)
}

/// Caller-supplied evaluation settings. Every field has a usable default
/// except `lot_size`, which differs per instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct EvaluationConfig {
    #[garde(range(min = 1))]
    pub lot_size: u32,
    #[serde(default)]
    #[garde(skip)]
    pub view_mode: ViewMode,
    /// `None` is the "all expiries" snapshot.
    #[serde(default)]
    #[garde(skip)]
    pub snapshot_expiry: Option<NaiveDate>,
    /// >1 narrows the visible window around spot, <1 widens it.
    #[serde(default = "default_zoom")]
    #[garde(range(min = 0.01, max = 100.0))]
    pub zoom: f64,
    #[serde(default = "default_sample_points")]
    #[garde(range(min = 2, max = 5000))]
    pub sample_points: usize,
    /// Full strike list of the chain; when present it drives the price range.
    #[serde(default)]
    #[garde(length(max = 10_000))]
    pub strike_universe: Vec<f64>,
}

pub const DEFAULT_SAMPLE_POINTS: usize = 300;

fn default_zoom() -> f64 {
    1.0
}

fn default_sample_points() -> usize {
    DEFAULT_SAMPLE_POINTS
}

impl EvaluationConfig {
    pub fn new(lot_size: u32) -> Self {
        Self {
            lot_size,
            view_mode: ViewMode::default(),
            snapshot_expiry: None,
            zoom: default_zoom(),
            sample_points: DEFAULT_SAMPLE_POINTS,
            strike_universe: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_view(mut self, view_mode: ViewMode, snapshot_expiry: Option<NaiveDate>) -> Self {
        self.view_mode = view_mode;
        self.snapshot_expiry = snapshot_expiry;
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    #[must_use]
    pub fn with_sample_points(mut self, sample_points: usize) -> Self {
        self.sample_points = sample_points;
        self
    }

    #[must_use]
    pub fn with_strike_universe(mut self, strikes: Vec<f64>) -> Self {
        self.strike_universe = strikes;
        self
    }

    pub fn lot(&self) -> f64 {
        f64::from(self.lot_size.max(1))
    }
}

/// A profit/loss figure that may be theoretically infinite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Finite(f64),
    Unbounded,
}

impl Bound {
    pub fn is_unbounded(self) -> bool {
        matches!(self, Bound::Unbounded)
    }

    pub fn finite(self) -> Option<f64> {
        match self {
            Bound::Finite(v) => Some(v),
            Bound::Unbounded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PricePoint {
    pub price: f64,
    pub payoff: f64,
}

/// ±1σ / ±2σ reference prices around spot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StdDevBands {
    pub sigma: f64,
    pub minus_two: f64,
    pub minus_one: f64,
    pub plus_one: f64,
    pub plus_two: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Evaluation {
    pub curve: Vec<PricePoint>,
    pub breakevens: Vec<f64>,
    /// Share of sampled prices with positive P&L, in percent.
    pub pop: f64,
    pub max_profit: Bound,
    /// Lowest signed P&L (negative for a loss).
    pub max_loss: Bound,
    pub current_pnl: f64,
    pub margin_required: Bound,
    pub curve_max: f64,
    pub curve_min: f64,
    /// Premium received minus premium paid; positive is a net credit.
    pub net_premium: f64,
    pub std_dev: StdDevBands,
    pub expiries: Vec<NaiveDate>,
    pub leg_count: usize,
}

/// Evaluation of one expiry snapshot; `snapshot_expiry = None` is the ALL view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotEvaluation {
    pub snapshot_expiry: Option<NaiveDate>,
    pub evaluation: Evaluation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LegContribution {
    pub id: String,
    pub strike: f64,
    pub option_type: OptionType,
    pub action: Action,
    pub expiry: Option<NaiveDate>,
    pub premium: f64,
    pub quantity: u32,
    pub payoff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LegBreakdown {
    pub price: f64,
    pub legs: Vec<LegContribution>,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_multiplier_buy() {
        assert!((Action::Buy.multiplier() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn action_multiplier_sell() {
        assert!((Action::Sell.multiplier() - (-1.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn leg_accepts_exchange_aliases() {
        let leg: OptionLeg = serde_json::from_value(json!({
            "strike": 22000,
            "optionType": "CE",
            "action": "SELL",
            "premium": 120.5,
            "quantity": 2
        }))
        .unwrap();
        assert_eq!(leg.option_type, OptionType::Call);
        assert_eq!(leg.action, Action::Sell);
        assert_eq!(leg.quantity, 2);
        assert!(!leg.id.is_empty());
    }

    #[test]
    fn leg_coerces_strings_and_garbage() {
        let leg: OptionLeg = serde_json::from_value(json!({
            "strike": "100",
            "optionType": "PUT",
            "action": "BUY",
            "premium": "abc",
            "quantity": "2.7"
        }))
        .unwrap();
        assert_eq!(leg.strike, 100.0);
        assert_eq!(leg.premium, 0.0);
        assert_eq!(leg.quantity, 2);
    }

    #[test]
    fn leg_missing_numbers_default() {
        let leg: OptionLeg = serde_json::from_value(json!({
            "optionType": "PUT",
            "action": "BUY",
            "premium": null,
            "quantity": 0
        }))
        .unwrap();
        assert_eq!(leg.strike, 0.0);
        assert_eq!(leg.premium, 0.0);
        assert_eq!(leg.quantity, 1);
    }

    #[test]
    fn leg_keeps_supplied_id_and_expiry() {
        let leg: OptionLeg = serde_json::from_value(json!({
            "id": "leg-1",
            "strike": 100,
            "optionType": "CALL",
            "action": "BUY",
            "premium": 5,
            "expiry": "2025-10-28"
        }))
        .unwrap();
        assert_eq!(leg.id, "leg-1");
        assert_eq!(leg.expiry, NaiveDate::from_ymd_opt(2025, 10, 28));
    }

    #[test]
    fn non_finite_fields_read_as_zero() {
        let mut leg = OptionLeg::new(OptionType::Call, Action::Buy, f64::NAN, 5.0, 1);
        leg.premium = f64::INFINITY;
        assert_eq!(leg.strike(), 0.0);
        assert_eq!(leg.premium(), 0.0);
    }

    #[test]
    fn zero_quantity_counts_as_one_lot() {
        let leg = OptionLeg::new(OptionType::Call, Action::Buy, 100.0, 5.0, 0);
        assert_eq!(leg.lots(), 1.0);
    }

    #[test]
    fn in_view_expiry_only_filters_other_expiries() {
        let near = NaiveDate::from_ymd_opt(2025, 10, 28).unwrap();
        let far = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();
        let leg = OptionLeg::new(OptionType::Call, Action::Buy, 100.0, 5.0, 1).with_expiry(far);
        assert!(!leg.in_view(ViewMode::ExpiryOnly, Some(near)));
        assert!(leg.in_view(ViewMode::ExpiryOnly, Some(far)));
        assert!(leg.in_view(ViewMode::ExpiryOnly, None));
        assert!(leg.in_view(ViewMode::AllIntrinsic, Some(near)));
    }

    #[test]
    fn in_view_undated_leg_applies_everywhere() {
        let near = NaiveDate::from_ymd_opt(2025, 10, 28).unwrap();
        let leg = OptionLeg::new(OptionType::Put, Action::Sell, 100.0, 5.0, 1);
        assert!(leg.in_view(ViewMode::ExpiryOnly, Some(near)));
    }

    // --- Validation tests ---

    #[test]
    fn config_valid_defaults() {
        assert!(EvaluationConfig::new(50).validate().is_ok());
    }

    #[test]
    fn config_rejects_zero_lot_size() {
        assert!(EvaluationConfig::new(0).validate().is_err());
    }

    #[test]
    fn config_rejects_zero_zoom() {
        assert!(EvaluationConfig::new(50).with_zoom(0.0).validate().is_err());
    }

    #[test]
    fn config_rejects_single_sample() {
        assert!(EvaluationConfig::new(50)
            .with_sample_points(1)
            .validate()
            .is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: EvaluationConfig = serde_json::from_value(json!({"lot_size": 35})).unwrap();
        assert_eq!(cfg.lot_size, 35);
        assert_eq!(cfg.view_mode, ViewMode::ExpiryOnly);
        assert_eq!(cfg.snapshot_expiry, None);
        assert_eq!(cfg.zoom, 1.0);
        assert_eq!(cfg.sample_points, DEFAULT_SAMPLE_POINTS);
    }

    #[test]
    fn bound_serializes_tagged() {
        assert_eq!(serde_json::to_value(Bound::Unbounded).unwrap(), json!("unbounded"));
        assert_eq!(
            serde_json::to_value(Bound::Finite(350.0)).unwrap(),
            json!({"finite": 350.0})
        );
    }
}
