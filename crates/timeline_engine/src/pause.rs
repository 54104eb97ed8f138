use std::time::Duration;

use rand::Rng;

/// Relative spread of the settle wait around the configured delay.
pub const JITTER: f64 = 0.5;

/// Suspends the harvest while freshly scrolled content loads.
#[async_trait::async_trait]
pub trait Pause: Send {
    async fn pause(&mut self, duration: Duration);
}

/// Real wall-clock wait on the Tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPause;

#[async_trait::async_trait]
impl Pause for TokioPause {
    async fn pause(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// `base` shifted uniformly by up to `jitter * base` either way, so scroll
/// steps do not form a perfectly periodic pattern.
pub fn jittered_delay<R: Rng + ?Sized>(base: Duration, jitter: f64, rng: &mut R) -> Duration {
    let base_secs = base.as_secs_f64();
    let delta = base_secs * jitter.clamp(0.0, 1.0);
    if delta <= 0.0 {
        return base;
    }
    let offset: f64 = rng.gen_range(-delta..=delta);
    Duration::from_secs_f64((base_secs + offset).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::{jittered_delay, JITTER};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    #[test]
    fn stays_within_half_the_delay_either_way() {
        let mut rng = StdRng::seed_from_u64(7);
        let base = Duration::from_millis(1000);
        let samples: Vec<Duration> = (0..10_000)
            .map(|_| jittered_delay(base, JITTER, &mut rng))
            .collect();

        for sample in &samples {
            assert!(*sample >= Duration::from_millis(500), "{sample:?}");
            assert!(*sample <= Duration::from_millis(1500), "{sample:?}");
        }

        let below = samples.iter().filter(|s| **s < Duration::from_millis(900)).count();
        let above = samples.iter().filter(|s| **s > Duration::from_millis(1100)).count();
        assert!(below > 3_000, "lower band under-sampled: {below}");
        assert!(above > 3_000, "upper band under-sampled: {above}");
    }

    #[test]
    fn is_not_constant() {
        let mut rng = StdRng::seed_from_u64(11);
        let base = Duration::from_millis(1000);
        let first = jittered_delay(base, JITTER, &mut rng);
        assert!((0..50).any(|_| jittered_delay(base, JITTER, &mut rng) != first));
    }

    #[test]
    fn zero_delay_stays_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(jittered_delay(Duration::ZERO, JITTER, &mut rng), Duration::ZERO);
    }
}
