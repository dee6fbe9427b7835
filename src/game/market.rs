//! Market rate generator: one process-wide multiplier applied to all sale
//! prices, re-rolled on a fixed timer from a discrete distribution.
//!
//! Distribution (cumulative thresholds over a uniform draw in `[0,1)`):
//! - 60% → x0.8
//! - 25% → x1.0
//! - 12% → x1.5
//! -  3% → x2.5
//!
//! The rate is deliberately not persisted: a restart returns to
//! [`DEFAULT_RATE`] until the first roll, which the server fires
//! immediately at startup.

use rand::Rng;

/// Multiplier in effect before the first roll of the process.
pub const DEFAULT_RATE: f64 = 1.0;
/// Minutes between re-rolls.
pub const REROLL_MINUTES: u64 = 30;

/// Map a uniform draw in `[0,1)` to a market rate.
pub fn rate_for(r: f64) -> f64 {
    if r < 0.60 {
        0.8
    } else if r < 0.85 {
        1.0
    } else if r < 0.97 {
        1.5
    } else {
        2.5
    }
}

/// Draw a fresh market rate.
pub fn roll<R: Rng>(rng: &mut R) -> f64 {
    rate_for(rng.gen::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_map_to_expected_rates() {
        assert_eq!(rate_for(0.0), 0.8);
        assert_eq!(rate_for(0.599), 0.8);
        assert_eq!(rate_for(0.60), 1.0);
        assert_eq!(rate_for(0.849), 1.0);
        assert_eq!(rate_for(0.85), 1.5);
        assert_eq!(rate_for(0.969), 1.5);
        assert_eq!(rate_for(0.97), 2.5);
        assert_eq!(rate_for(0.999), 2.5);
    }

    #[test]
    fn roll_always_lands_on_a_known_rate() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let rate = roll(&mut rng);
            assert!([0.8, 1.0, 1.5, 2.5].contains(&rate), "unexpected rate {rate}");
        }
    }
}
