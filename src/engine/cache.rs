use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use ordered_float::OrderedFloat;
use rustc_hash::FxBuildHasher;

use super::core;
use super::types::{Action, EvaluationConfig, Evaluation, OptionLeg, OptionType, ViewMode};

type LegKey = (
    OptionType,
    Action,
    OrderedFloat<f64>,
    OrderedFloat<f64>,
    u32,
    Option<NaiveDate>,
);

/// Everything `evaluate` depends on. Leg ids are excluded and legs are
/// sorted, so permutations of the same position share one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EvalKey {
    legs: Vec<LegKey>,
    spot: OrderedFloat<f64>,
    lot_size: u32,
    view_mode: ViewMode,
    snapshot_expiry: Option<NaiveDate>,
    zoom: OrderedFloat<f64>,
    sample_points: usize,
    strike_universe: Vec<OrderedFloat<f64>>,
}

impl EvalKey {
    fn new(legs: &[OptionLeg], spot: f64, config: &EvaluationConfig) -> Self {
        let mut leg_keys: Vec<LegKey> = legs
            .iter()
            .map(|l| {
                (
                    l.option_type,
                    l.action,
                    OrderedFloat(l.strike()),
                    OrderedFloat(l.premium()),
                    l.quantity.max(1),
                    l.expiry,
                )
            })
            .collect();
        leg_keys.sort_unstable_by(|a, b| {
            (a.2, a.3, a.4, a.5)
                .cmp(&(b.2, b.3, b.4, b.5))
                .then_with(|| rank(a.0, a.1).cmp(&rank(b.0, b.1)))
        });

        Self {
            legs: leg_keys,
            spot: OrderedFloat(spot),
            lot_size: config.lot_size,
            view_mode: config.view_mode,
            snapshot_expiry: config.snapshot_expiry,
            zoom: OrderedFloat(config.zoom),
            sample_points: config.sample_points,
            strike_universe: config
                .strike_universe
                .iter()
                .copied()
                .map(OrderedFloat)
                .collect(),
        }
    }
}

fn rank(option_type: OptionType, action: Action) -> u8 {
    let t = match option_type {
        OptionType::Call => 0,
        OptionType::Put => 2,
    };
    let a = match action {
        Action::Buy => 0,
        Action::Sell => 1,
    };
    t + a
}

/// Memoizes `evaluate` across calls. Safe to share between tasks.
pub struct EvaluationCache {
    entries: DashMap<EvalKey, Arc<Evaluation>, FxBuildHasher>,
    capacity: usize,
}

impl EvaluationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            capacity: capacity.max(1),
        }
    }

    /// Return the cached evaluation or compute and store it.
    pub fn evaluate(
        &self,
        legs: &[OptionLeg],
        spot: f64,
        config: &EvaluationConfig,
    ) -> Arc<Evaluation> {
        let key = EvalKey::new(legs, spot, config);
        if let Some(hit) = self.entries.get(&key) {
            return Arc::clone(hit.value());
        }

        let evaluation = Arc::new(core::evaluate(legs, spot, config));
        if self.entries.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "evaluation cache full, clearing");
            self.entries.clear();
        }
        self.entries.insert(key, Arc::clone(&evaluation));
        evaluation
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread() -> Vec<OptionLeg> {
        vec![
            OptionLeg::new(OptionType::Call, Action::Sell, 100.0, 5.0, 1),
            OptionLeg::new(OptionType::Call, Action::Buy, 110.0, 2.0, 1),
        ]
    }

    #[test]
    fn repeated_call_hits_cache() {
        let cache = EvaluationCache::new(16);
        let cfg = EvaluationConfig::new(50);
        let a = cache.evaluate(&spread(), 100.0, &cfg);
        let b = cache.evaluate(&spread(), 100.0, &cfg);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn permuted_legs_share_entry() {
        let cache = EvaluationCache::new(16);
        let cfg = EvaluationConfig::new(50);
        let mut reversed = spread();
        reversed.reverse();
        let a = cache.evaluate(&spread(), 100.0, &cfg);
        let b = cache.evaluate(&reversed, 100.0, &cfg);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_config_is_a_miss() {
        let cache = EvaluationCache::new(16);
        cache.evaluate(&spread(), 100.0, &EvaluationConfig::new(50));
        cache.evaluate(&spread(), 100.0, &EvaluationConfig::new(35));
        cache.evaluate(&spread(), 101.0, &EvaluationConfig::new(50));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn cached_result_matches_direct_evaluation() {
        let cache = EvaluationCache::new(16);
        let cfg = EvaluationConfig::new(50);
        let cached = cache.evaluate(&spread(), 100.0, &cfg);
        assert_eq!(*cached, core::evaluate(&spread(), 100.0, &cfg));
    }

    #[test]
    fn full_cache_is_cleared() {
        let cache = EvaluationCache::new(2);
        let cfg = EvaluationConfig::new(50);
        for spot in [100.0, 101.0, 102.0] {
            cache.evaluate(&spread(), spot, &cfg);
        }
        assert_eq!(cache.len(), 1);
    }
}
