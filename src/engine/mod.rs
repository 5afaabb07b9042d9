use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use anyhow::{Context as _, Result};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{config::SimulationConfig, identity::SubnetPool};

pub mod executor;
pub mod pacer;
mod worker;

pub use self::executor::{FailureKind, HitExecutor, HitOutcome};

use self::worker::WorkerContext;

/// Gap between consecutive worker launches, so the pool's first hits do not
/// land as one synchronized burst.
const LAUNCH_STAGGER: Duration = Duration::from_millis(250);

/// Counters and the address pool shared by every worker of one engine.
/// Nothing here is shared across engine instances.
#[derive(Debug, Default)]
pub struct EngineShared {
    pub(crate) hits: AtomicU64,
    pub(crate) failed: AtomicU64,
    pub(crate) subnets: Mutex<SubnetPool>,
}

/// Point-in-time counter snapshot. `hits` counts attempts, not completions.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct EngineStats {
    pub hits: u64,
    pub failed: u64,
    pub distinct_subnets: usize,
    pub running: bool,
}

/// One running simulation against a single target URL.
///
/// Owns everything the workers touch: the resolved configuration, the HTTP
/// client, the counters, and the issued-prefix pool. Distinct engines are
/// fully isolated from each other.
pub struct TrafficEngine {
    config: Arc<SimulationConfig>,
    shared: Arc<EngineShared>,
    executor: HitExecutor,
    cancel: CancellationToken,
    running: AtomicBool,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl TrafficEngine {
    /// Validates the configuration and prepares the HTTP client.
    ///
    /// Construction is the only place an error surfaces to the caller;
    /// everything after `start` recovers locally and keeps the simulation
    /// going.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("build http client")?;

        let config = Arc::new(config);
        let shared = Arc::new(EngineShared::default());
        let executor = HitExecutor {
            client,
            config: config.clone(),
            shared: shared.clone(),
        };

        Ok(Self {
            config,
            shared,
            executor,
            cancel: CancellationToken::new(),
            running: AtomicBool::new(false),
            workers: Mutex::new(Vec::new()),
        })
    }

    /// Launches the configured worker set with staggered starts. Warns and
    /// does nothing when the engine is already running or was stopped.
    pub fn start(&self) {
        if self.cancel.is_cancelled() {
            tracing::warn!(
                "engine for {} was stopped and cannot be restarted",
                self.config.target
            );
            return;
        }
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("engine for {} is already running", self.config.target);
            return;
        }

        let mut workers = self.workers.lock();
        for id in 1..=self.config.workers {
            let ctx = WorkerContext {
                id,
                stagger: LAUNCH_STAGGER * (id - 1),
                config: self.config.clone(),
                executor: self.executor.clone(),
                cancel: self.cancel.clone(),
            };
            workers.push(tokio::spawn(worker::drive(ctx)));
        }

        tracing::info!(
            "engine started: {} workers against {}",
            self.config.workers,
            self.config.target
        );
    }

    /// Clears the running flag. Level-triggered, not an interrupt: in-flight
    /// requests finish or time out before their worker observes the stop.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        tracing::info!("engine stop requested for {}", self.config.target);
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst) && !self.cancel.is_cancelled()
    }

    /// Always safe to call, whatever the lifecycle state.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            hits: self.shared.hits.load(Ordering::Relaxed),
            failed: self.shared.failed.load(Ordering::Relaxed),
            distinct_subnets: self.shared.subnets.lock().len(),
            running: self.is_running(),
        }
    }

    /// Waits for every worker task to finish. A panicking worker is logged
    /// here and never takes its siblings or the engine down.
    pub async fn join(&self) {
        let handles = std::mem::take(&mut *self.workers.lock());
        for handle in handles {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    tracing::error!("worker task failed: {err}");
                }
            }
        }
    }

    #[cfg(test)]
    fn worker_count(&self) -> usize {
        self.workers.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use reqwest::Method;
    use std::net::SocketAddr;
    use tokio::time::{sleep, timeout};
    use url::Url;

    fn fast_config(target: Url) -> SimulationConfig {
        SimulationConfig {
            target,
            method: Method::GET,
            timeout: Duration::from_secs(2),
            workers: 1,
            // 6000/min floors the tick interval at 100ms.
            min_rate: 6_000,
            max_rate: 6_000,
            desktop_share: 50.0,
            active_min: Duration::from_secs(30),
            active_max: Duration::from_secs(30),
            idle_entry: 0.0,
            idle_min: Duration::from_secs(1),
            idle_max: Duration::from_secs(1),
            unique_visitor: 1.0,
            params: Vec::new(),
        }
    }

    async fn spawn_ok_target() -> SocketAddr {
        let app = Router::new().fallback(|| async { "ok" });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[test]
    fn construction_rejects_invalid_targets() {
        let mut config = fast_config("http://127.0.0.1:1/".parse().unwrap());
        config.target = "ftp://example.com/".parse().unwrap();

        assert!(TrafficEngine::new(config).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn engine_emits_hits_and_records_subnets() {
        let addr = spawn_ok_target().await;
        let engine =
            TrafficEngine::new(fast_config(format!("http://{addr}/").parse().unwrap())).unwrap();

        engine.start();
        assert!(engine.is_running());
        sleep(Duration::from_millis(700)).await;
        engine.stop();
        timeout(Duration::from_secs(1), engine.join())
            .await
            .expect("workers exit within one tick of a stop");

        let stats = engine.stats();
        assert!(stats.hits >= 3, "only {} hits emitted", stats.hits);
        assert_eq!(stats.failed, 0);
        assert!(stats.distinct_subnets > 0);
        assert!(!stats.running);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stop_halts_hit_production_at_the_next_checkpoint() {
        let addr = spawn_ok_target().await;
        let engine =
            TrafficEngine::new(fast_config(format!("http://{addr}/").parse().unwrap())).unwrap();

        engine.start();
        sleep(Duration::from_millis(400)).await;
        engine.stop();
        timeout(Duration::from_secs(1), engine.join())
            .await
            .expect("workers exit promptly");

        let frozen = engine.stats().hits;
        sleep(Duration::from_millis(400)).await;
        assert_eq!(engine.stats().hits, frozen);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn double_start_does_not_spawn_extra_workers() {
        let engine = TrafficEngine::new(fast_config("http://127.0.0.1:1/".parse().unwrap())).unwrap();

        engine.start();
        engine.start();
        assert_eq!(engine.worker_count(), 1);

        engine.stop();
        engine.join().await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stopped_engine_cannot_be_restarted() {
        let engine = TrafficEngine::new(fast_config("http://127.0.0.1:1/".parse().unwrap())).unwrap();

        engine.start();
        engine.stop();
        engine.join().await;

        engine.start();
        assert_eq!(engine.worker_count(), 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn stop_before_start_is_a_no_op() {
        let engine = TrafficEngine::new(fast_config("http://127.0.0.1:1/".parse().unwrap())).unwrap();

        engine.stop();
        assert!(!engine.is_running());
        // The cancel token must stay pristine so a later start still works.
        assert!(!engine.cancel.is_cancelled());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stats_are_safe_before_start_and_after_stop() {
        let engine = TrafficEngine::new(fast_config("http://127.0.0.1:1/".parse().unwrap())).unwrap();

        let before = engine.stats();
        assert_eq!(before.hits, 0);
        assert_eq!(before.distinct_subnets, 0);
        assert!(!before.running);

        engine.start();
        engine.stop();
        engine.join().await;
        assert!(!engine.stats().running);
    }
}
