use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use anyhow::{Context as _, Result, bail};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use clap::Args;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Args)]
/// run a local always-answering target, handy for dry runs and tests
pub struct MockCommand {
    /// address to bind to
    #[arg(long, short = 'b', value_name = "ADDRESS", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Base processing latency per request
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    latency: f64,

    /// Uniform latency spread around the base
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    jitter: f64,

    /// Fraction of requests answered with a 500
    #[arg(long, value_name = "FRACTION", default_value_t = 0.0)]
    error_rate: f32,
}

pub async fn exec(cancel: CancellationToken, args: MockCommand) -> Result<()> {
    let behavior = MockBehavior::try_new(args.latency, args.jitter, args.error_rate)?;
    let state = MockState {
        behavior: Arc::new(behavior),
        hits: Arc::new(AtomicU64::new(0)),
    };

    let app = Router::new()
        .route("/__stats", get(stats_probe))
        .fallback(serve_hit)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("bind mock target to {}", args.bind))?;
    tracing::info!(
        "mock target listening on {}",
        listener.local_addr().context("get bound address")?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("serve mock target")
}

#[derive(Debug, Clone)]
struct MockState {
    behavior: Arc<MockBehavior>,
    hits: Arc<AtomicU64>,
}

#[derive(Debug)]
struct MockBehavior {
    base_latency: f64,
    jitter: f64,
    error_rate: f32,
}

impl MockBehavior {
    fn try_new(base_latency: f64, jitter: f64, error_rate: f32) -> Result<Self> {
        if base_latency < 0.0 || jitter < 0.0 {
            bail!("latency and jitter must be non-negative");
        }
        if !(0.0..=1.0).contains(&error_rate) {
            bail!("error_rate must be within 0..=1, got {error_rate}");
        }
        Ok(Self {
            base_latency,
            jitter,
            error_rate,
        })
    }

    fn compute_delay(&self) -> Duration {
        if self.jitter == 0.0 {
            return Duration::from_secs_f64(self.base_latency);
        }

        let span = self.jitter * 2.0;
        let u: f64 = rand::random();
        let secs = (self.base_latency + u * span - self.jitter).max(0.0);
        Duration::from_secs_f64(secs)
    }

    fn pick_error(&self) -> bool {
        rand::random::<f32>() < self.error_rate
    }
}

async fn serve_hit(State(state): State<MockState>) -> (StatusCode, &'static str) {
    let delay = state.behavior.compute_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let count = state.hits.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::debug!("mock target hit #{count}");

    if state.behavior.pick_error() {
        (StatusCode::INTERNAL_SERVER_ERROR, "injected error")
    } else {
        (StatusCode::OK, "ok")
    }
}

async fn stats_probe(State(state): State<MockState>) -> String {
    state.hits.load(Ordering::Acquire).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behavior_rejects_out_of_range_settings() {
        assert!(MockBehavior::try_new(-0.1, 0.0, 0.0).is_err());
        assert!(MockBehavior::try_new(0.0, -0.1, 0.0).is_err());
        assert!(MockBehavior::try_new(0.0, 0.0, 1.5).is_err());
        assert!(MockBehavior::try_new(0.05, 0.01, 0.1).is_ok());
    }

    #[test]
    fn zero_jitter_delay_is_exact() {
        let behavior = MockBehavior::try_new(0.25, 0.0, 0.0).unwrap();
        assert_eq!(behavior.compute_delay(), Duration::from_secs_f64(0.25));
    }

    #[test]
    fn jittered_delay_stays_in_band_and_never_goes_negative() {
        let behavior = MockBehavior::try_new(0.05, 0.1, 0.0).unwrap();
        for _ in 0..1_000 {
            let delay = behavior.compute_delay().as_secs_f64();
            assert!(delay >= 0.0);
            assert!(delay <= 0.05 + 0.1 + 1e-9);
        }
    }

    #[test]
    fn error_rate_bounds_are_deterministic() {
        let never = MockBehavior::try_new(0.0, 0.0, 0.0).unwrap();
        let always = MockBehavior::try_new(0.0, 0.0, 1.0).unwrap();

        for _ in 0..100 {
            assert!(!never.pick_error());
            assert!(always.pick_error());
        }
    }
}
