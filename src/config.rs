use std::str::FromStr;

use crate::engine::types::DEFAULT_SAMPLE_POINTS;

pub const DEFAULT_LOT_SIZE: u32 = 50;
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Server-wide settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// When set, serve streamable HTTP on this port instead of stdio.
    pub port: Option<u16>,
    /// Lot size for calls that name neither `lot_size` nor an instrument.
    pub default_lot_size: u32,
    pub sample_points: usize,
    pub cache_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: None,
            default_lot_size: DEFAULT_LOT_SIZE,
            sample_points: DEFAULT_SAMPLE_POINTS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Build from environment variables.
    ///
    /// | Env Var | Default | Purpose |
    /// |---------|---------|---------|
    /// | `PORT` | (none) | Serve HTTP on `0.0.0.0:$PORT`; stdio when unset |
    /// | `DEFAULT_LOT_SIZE` | `50` | Fallback contract multiplier |
    /// | `PAYOFF_SAMPLE_POINTS` | `300` | Curve samples when the caller gives none |
    /// | `PAYOFF_CACHE_CAPACITY` | `1024` | Memoized evaluations before the cache is cleared |
    ///
    /// Unparseable or out-of-range values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: parse_var(&lookup, "PORT", |_: &u16| true),
            default_lot_size: parse_var(&lookup, "DEFAULT_LOT_SIZE", |v: &u32| *v >= 1)
                .unwrap_or(defaults.default_lot_size),
            sample_points: parse_var(&lookup, "PAYOFF_SAMPLE_POINTS", |v: &usize| {
                (2..=5000).contains(v)
            })
            .unwrap_or(defaults.sample_points),
            cache_capacity: parse_var(&lookup, "PAYOFF_CACHE_CAPACITY", |v: &usize| *v >= 1)
                .unwrap_or(defaults.cache_capacity),
        }
    }
}

/// Parsed value of `key`; `None` when unset, or when it does not parse or
/// fails `valid` (logged).
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    valid: impl Fn(&T) -> bool,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => Some(value),
        _ => {
            tracing::warn!(key, value = %raw, "ignoring invalid environment value, using default");
            None
        }
    }
}
