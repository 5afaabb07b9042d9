use std::{sync::Arc, time::Duration};

use rand::{Rng, SeedableRng as _, rngs::SmallRng};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use crate::config::SimulationConfig;

use super::{executor::HitExecutor, pacer::HitPacer};

pub(super) struct WorkerContext {
    pub id: u32,
    pub stagger: Duration,
    pub config: Arc<SimulationConfig>,
    pub executor: HitExecutor,
    pub cancel: CancellationToken,
}

/// Drives one worker through alternating active and idle phases until the
/// engine stops.
///
/// Intent
/// The stop signal is level-triggered and observed cooperatively: it is
/// checked before every single hit and interrupts every sleep, so a stopped
/// engine quiesces within one tick without cutting an in-flight request
/// short. The decision to idle is taken only when an active window ran its
/// full course; stopping never detours through an idle phase.
pub(super) async fn drive(ctx: WorkerContext) {
    let WorkerContext {
        id,
        stagger,
        config,
        executor,
        cancel,
    } = ctx;

    let mut rng = SmallRng::from_os_rng();
    let pacer = HitPacer::default();

    // Staggered launch keeps the first hits of the pool from landing as one
    // synchronized burst.
    if !interruptible_sleep(&cancel, stagger).await {
        tracing::debug!("worker {id} stopped before its first phase");
        return;
    }

    loop {
        let burst = draw_duration(config.active_min, config.active_max, &mut rng);
        let rate = rng.random_range(config.min_rate..=config.max_rate);
        tracing::info!("worker {id} ACTIVE {:.0}s ~{rate}/min", burst.as_secs_f64());

        let deadline = Instant::now() + burst;
        while Instant::now() < deadline && !cancel.is_cancelled() {
            executor.hit(id, &mut rng).await;
            if !interruptible_sleep(&cancel, pacer.interval(rate, &mut rng)).await {
                break;
            }
        }
        if cancel.is_cancelled() {
            break;
        }

        if rng.random::<f64>() < config.idle_entry {
            let quiet = draw_duration(config.idle_min, config.idle_max, &mut rng);
            tracing::info!("worker {id} IDLE {:.0}s", quiet.as_secs_f64());
            if !interruptible_sleep(&cancel, quiet).await {
                break;
            }
        }
    }

    tracing::debug!("worker {id} stopped");
}

fn draw_duration(min: Duration, max: Duration, rng: &mut impl Rng) -> Duration {
    if max <= min {
        return min;
    }
    Duration::from_secs_f64(rng.random_range(min.as_secs_f64()..=max.as_secs_f64()))
}

/// Sleeps for `pause`; false means the engine stopped mid-wait.
async fn interruptible_sleep(cancel: &CancellationToken, pause: Duration) -> bool {
    if pause.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = sleep(pause) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng as _;
    use tokio::{task::yield_now, time};

    #[test]
    fn drawn_durations_respect_the_bounds() {
        let mut rng = SmallRng::seed_from_u64(19);
        let min = Duration::from_secs(10);
        let max = Duration::from_secs(40);

        for _ in 0..1_000 {
            let drawn = draw_duration(min, max, &mut rng);
            assert!(drawn >= min && drawn <= max, "{drawn:?} outside bounds");
        }
    }

    #[test]
    fn degenerate_bounds_collapse_to_the_minimum() {
        let mut rng = SmallRng::seed_from_u64(25);
        let pinned = Duration::from_secs(5);

        assert_eq!(draw_duration(pinned, pinned, &mut rng), pinned);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn sleep_is_cut_short_by_cancellation() {
        time::pause();

        let cancel = CancellationToken::new();
        let waiter = {
            let cancel = cancel.clone();
            tokio::spawn(async move { interruptible_sleep(&cancel, Duration::from_secs(3600)).await })
        };

        yield_now().await;
        assert!(!waiter.is_finished());

        cancel.cancel();
        assert!(!waiter.await.expect("task join"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn sleep_runs_to_completion_without_cancellation() {
        time::pause();

        let cancel = CancellationToken::new();
        let waiter = {
            let cancel = cancel.clone();
            tokio::spawn(async move { interruptible_sleep(&cancel, Duration::from_secs(2)).await })
        };

        yield_now().await;
        assert!(!waiter.is_finished());

        time::advance(Duration::from_secs(2)).await;
        assert!(waiter.await.expect("task join"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn zero_pause_reports_the_flag_state() {
        let cancel = CancellationToken::new();
        assert!(interruptible_sleep(&cancel, Duration::ZERO).await);

        cancel.cancel();
        assert!(!interruptible_sleep(&cancel, Duration::ZERO).await);
    }
}
