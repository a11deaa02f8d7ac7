//! Candidate underlying prices for sampling the payoff curve.

/// Half-width of the window used when there is nothing to anchor on.
const DEFAULT_HALF_WIDTH: f64 = 1000.0;
/// Minimum strike span, so single-strike selections still get a readable curve.
const MIN_BASE_RANGE: f64 = 100.0;
/// Minimum strike span as a fraction of spot.
const SPOT_RANGE_FRACTION: f64 = 0.2;
/// Padding added on each side of the strike span, as a fraction of it.
const PADDING_FRACTION: f64 = 0.5;

/// Generate `points` evenly spaced, ascending prices covering the strikes of
/// interest and the (zoomed) window around spot. Prices never go negative.
///
/// `universe` takes priority over `leg_strikes` when it is non-empty.
pub fn price_range(
    spot: f64,
    leg_strikes: &[f64],
    universe: &[f64],
    zoom: f64,
    points: usize,
) -> Vec<f64> {
    let points = points.max(2);
    let spot = super::types::finite_or_zero(spot);

    let strikes = if universe.is_empty() {
        leg_strikes
    } else {
        universe
    };

    let Some((min_strike, max_strike)) = strike_bounds(strikes) else {
        let start = (spot - DEFAULT_HALF_WIDTH).max(0.0);
        let end = spot + DEFAULT_HALF_WIDTH;
        return linspace(start, end, points);
    };

    let base_range =
        (max_strike - min_strike).max(MIN_BASE_RANGE.max(spot.abs() * SPOT_RANGE_FRACTION));
    let padding = base_range * PADDING_FRACTION;
    let start = (min_strike - padding).min(spot - base_range).max(0.0);
    let end = (max_strike + padding).max(spot + base_range);

    let zoom = if zoom.is_finite() && zoom > 0.0 {
        zoom
    } else {
        1.0
    };
    let visible = (end - start) / zoom;
    let visible_start = (spot - visible / 2.0).max(0.0);
    let visible_end = spot + visible / 2.0;

    linspace(visible_start.min(start), visible_end.max(end), points)
}

fn strike_bounds(strikes: &[f64]) -> Option<(f64, f64)> {
    let mut finite = strikes.iter().copied().filter(|s| s.is_finite());
    let first = finite.next()?;
    Some(finite.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s))))
}

fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    let step = (end - start) / (points - 1) as f64;
    (0..points).map(|i| start + i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_ascending(prices: &[f64]) {
        for pair in prices.windows(2) {
            assert!(pair[1] > pair[0], "not ascending: {pair:?}");
        }
    }

    #[test]
    fn empty_inputs_use_default_window() {
        let prices = price_range(22_000.0, &[], &[], 1.0, 300);
        assert_eq!(prices.len(), 300);
        assert!((prices[0] - 21_000.0).abs() < 1e-9);
        assert!((prices[299] - 23_000.0).abs() < 1e-9);
        assert_ascending(&prices);
    }

    #[test]
    fn default_window_clamps_at_zero() {
        let prices = price_range(300.0, &[], &[], 1.0, 100);
        assert_eq!(prices[0], 0.0);
        assert!((prices[99] - 1300.0).abs() < 1e-9);
    }

    #[test]
    fn single_strike_near_spot_gets_minimum_width() {
        // base = max(0, max(100, 20)) = 100 → [max(0, min(50, 0)), max(150, 200)]
        let prices = price_range(100.0, &[100.0], &[], 1.0, 300);
        assert_eq!(prices[0], 0.0);
        assert!((prices[299] - 200.0).abs() < 1e-9);
    }

    #[test]
    fn wide_strikes_are_padded() {
        // base = max(2000, max(100, 4400)) = 4400, padding 2200
        // start = min(21000 - 2200, 22000 - 4400) = 17600
        // end = max(23000 + 2200, 22000 + 4400) = 26400
        let prices = price_range(22_000.0, &[21_000.0, 23_000.0], &[], 1.0, 50);
        assert!((prices[0] - 17_600.0).abs() < 1e-9);
        assert!((prices[49] - 26_400.0).abs() < 1e-9);
    }

    #[test]
    fn universe_takes_priority_over_leg_strikes() {
        let with_universe = price_range(100.0, &[100.0], &[50.0, 400.0], 1.0, 100);
        let legs_only = price_range(100.0, &[100.0], &[], 1.0, 100);
        assert!(with_universe[99] > legs_only[99]);
        // base = 350, padding 175 → end = max(575, 450)
        assert!((with_universe[99] - 575.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_out_widens_window() {
        let normal = price_range(22_000.0, &[22_000.0], &[], 1.0, 100);
        let wide = price_range(22_000.0, &[22_000.0], &[], 0.5, 100);
        assert!(wide[0] < normal[0]);
        assert!(wide[99] > normal[99]);
    }

    #[test]
    fn zoom_in_keeps_strike_span_visible() {
        let normal = price_range(22_000.0, &[21_000.0, 23_000.0], &[], 1.0, 100);
        let zoomed = price_range(22_000.0, &[21_000.0, 23_000.0], &[], 5.0, 100);
        assert!(zoomed[0] <= 21_000.0);
        assert!(zoomed[99] >= 23_000.0);
        assert_eq!(normal, zoomed);
    }

    #[test]
    fn invalid_zoom_is_treated_as_one() {
        let normal = price_range(100.0, &[90.0, 110.0], &[], 1.0, 50);
        assert_eq!(price_range(100.0, &[90.0, 110.0], &[], 0.0, 50), normal);
        assert_eq!(price_range(100.0, &[90.0, 110.0], &[], f64::NAN, 50), normal);
    }

    #[test]
    fn too_few_points_is_raised_to_two() {
        let prices = price_range(100.0, &[100.0], &[], 1.0, 0);
        assert_eq!(prices.len(), 2);
    }

    #[test]
    fn non_finite_strikes_are_ignored() {
        let prices = price_range(22_000.0, &[f64::NAN], &[], 1.0, 10);
        assert!((prices[0] - 21_000.0).abs() < 1e-9);
    }
}
