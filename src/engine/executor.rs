use std::sync::{Arc, atomic::Ordering};

use rand::{Rng, rngs::SmallRng};
use reqwest::header;
use tokio::time::Instant;
use url::Url;

use crate::{config::SimulationConfig, identity};

use super::EngineShared;

/// Query key carrying the per-hit cache-busting token.
const CACHE_BUSTER_KEY: &str = "cb";

/// Issues one simulated hit against the target.
///
/// Cheap to clone: every worker holds its own copy over the same shared
/// counters and HTTP connection pool.
#[derive(Debug, Clone)]
pub struct HitExecutor {
    pub(crate) client: reqwest::Client,
    pub(crate) config: Arc<SimulationConfig>,
    pub(crate) shared: Arc<EngineShared>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    HttpStatus,
    Timeout,
    Transport,
}

/// What came back for one hit. `ok` means a 2xx/3xx response.
#[derive(Debug, Clone, Copy)]
pub struct HitOutcome {
    pub ok: bool,
    pub status: Option<u16>,
    pub failure: Option<FailureKind>,
}

impl HitExecutor {
    /// Performs one hit and reports its outcome. Never fails the caller:
    /// every network-level problem is folded into the outcome.
    ///
    /// The hit counter advances before the request goes out, so the counter
    /// reflects attempts rather than completions.
    pub async fn hit(&self, worker: u32, rng: &mut SmallRng) -> HitOutcome {
        let seq = self.shared.hits.fetch_add(1, Ordering::Relaxed) + 1;

        let persona = identity::persona(self.config.desktop_share, rng);
        let ip = {
            let mut pool = self.shared.subnets.lock();
            pool.address(persona.location.country_code, self.config.unique_visitor, rng)
        };
        let (url, applied) = self.build_url(rng);

        let started = Instant::now();
        let result = self
            .client
            .request(self.config.method.clone(), url)
            .header(header::USER_AGENT, persona.user_agent)
            .header(header::ACCEPT_LANGUAGE, persona.accept_language)
            .header(header::REFERER, persona.referer)
            .header("x-forwarded-for", ip.to_string())
            .header("x-real-ip", ip.to_string())
            .header("x-geo-country", persona.location.country_code)
            .header("x-geo-region", persona.location.region)
            .header("x-geo-city", persona.location.city)
            .header("x-geo-latitude", format!("{:.4}", persona.location.latitude))
            .header("x-geo-longitude", format!("{:.4}", persona.location.longitude))
            .send()
            .await;
        let latency_ms = started.elapsed().as_millis();

        let outcome = match result {
            Ok(response) => {
                let status = response.status().as_u16();
                let ok = (200..400).contains(&status);
                tracing::info!(
                    "worker {worker} hit #{seq} {status} {ip} {}/{} params=[{}] {latency_ms}ms",
                    persona.location.country_code,
                    persona.location.city,
                    applied.join(","),
                );
                HitOutcome {
                    ok,
                    status: Some(status),
                    failure: (!ok).then_some(FailureKind::HttpStatus),
                }
            }
            Err(err) => {
                let (kind, reason) = if err.is_timeout() {
                    (FailureKind::Timeout, "timeout")
                } else if err.is_connect() {
                    (FailureKind::Transport, "connect")
                } else {
                    (FailureKind::Transport, "request")
                };
                tracing::warn!(
                    "worker {worker} hit #{seq} ERROR {reason} {ip} {}/{}",
                    persona.location.country_code,
                    persona.location.city,
                );
                tracing::debug!("hit #{seq} transport error: {err}");
                HitOutcome {
                    ok: false,
                    status: None,
                    failure: Some(kind),
                }
            }
        };

        if !outcome.ok {
            self.shared.failed.fetch_add(1, Ordering::Relaxed);
        }
        outcome
    }

    /// Renders the request URL: cache buster first, then every parameter
    /// rule evaluated independently, in configuration order.
    fn build_url(&self, rng: &mut impl Rng) -> (Url, Vec<&str>) {
        let mut url = self.config.target.clone();
        let mut applied = Vec::new();

        {
            let mut query = url.query_pairs_mut();
            query.append_pair(CACHE_BUSTER_KEY, &format!("{:08x}", rng.random::<u32>()));

            for rule in &self.config.params {
                if rng.random_range(0.0..100.0) < rule.percent {
                    match &rule.value {
                        Some(value) => {
                            query.append_pair(&rule.key, value);
                        }
                        None => {
                            query.append_key_only(&rule.key);
                        }
                    }
                    applied.push(rule.key.as_str());
                }
            }
        }

        (url, applied)
    }
}
