use std::time::Duration;

use rand::Rng;

/// Spacing between consecutive hits of one worker.
///
/// The nominal interval for a rate of `r` hits per minute is `60000 / r`
/// milliseconds. Every drawn interval gets a uniform jitter multiplier so
/// the emitted traffic never looks metronomic, and is floored so extreme
/// rates keep a minimal breathing pause. The achieved rate therefore
/// deviates up to the jitter fraction from the nominal target.
#[derive(Debug, Clone, Copy)]
pub struct HitPacer {
    jitter: f64,
    floor: Duration,
}

impl Default for HitPacer {
    fn default() -> Self {
        Self {
            jitter: 0.1,
            floor: Duration::from_millis(100),
        }
    }
}

impl HitPacer {
    #[cfg(test)]
    fn new(jitter: f64, floor: Duration) -> Self {
        Self {
            jitter: jitter.clamp(0.0, 1.0),
            floor,
        }
    }

    /// Draws the pause to apply after one hit at `rate_per_min`.
    pub fn interval(&self, rate_per_min: u32, rng: &mut impl Rng) -> Duration {
        let base_ms = 60_000.0 / rate_per_min.max(1) as f64;
        let multiplier = rng.random_range((1.0 - self.jitter)..=(1.0 + self.jitter));
        self.floor
            .max(Duration::from_secs_f64(base_ms * multiplier / 1000.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng as _, rngs::SmallRng};

    #[test]
    fn interval_stays_within_jitter_bounds() {
        let pacer = HitPacer::default();

        for (seed, rate) in [(1u64, 6u32), (2, 30), (3, 60), (4, 240)] {
            let mut rng = SmallRng::seed_from_u64(seed);
            let nominal_ms = 60_000.0 / rate as f64;

            for _ in 0..1_000 {
                let interval = pacer.interval(rate, &mut rng).as_secs_f64() * 1_000.0;
                assert!(
                    interval >= nominal_ms * 0.9 - 1e-6,
                    "rate {rate}: {interval}ms under the jitter floor"
                );
                assert!(
                    interval <= nominal_ms * 1.1 + 1e-6,
                    "rate {rate}: {interval}ms over the jitter ceiling"
                );
            }
        }
    }

    #[test]
    fn extreme_rates_are_floored() {
        let pacer = HitPacer::default();
        let mut rng = SmallRng::seed_from_u64(9);

        // 6000/min nominally pauses 10ms, well under the floor.
        for _ in 0..100 {
            assert_eq!(pacer.interval(6_000, &mut rng), Duration::from_millis(100));
        }
    }

    #[test]
    fn zero_rate_is_treated_as_one() {
        let pacer = HitPacer::new(0.0, Duration::from_millis(100));
        let mut rng = SmallRng::seed_from_u64(13);

        assert_eq!(pacer.interval(0, &mut rng), Duration::from_secs(60));
    }

    #[test]
    fn zero_jitter_is_exact() {
        let pacer = HitPacer::new(0.0, Duration::from_millis(100));
        let mut rng = SmallRng::seed_from_u64(21);

        assert_eq!(pacer.interval(60, &mut rng), Duration::from_secs(1));
    }
}
