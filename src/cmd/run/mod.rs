use std::{sync::Arc, time::Duration};

use anyhow::{Context as _, Result, bail};
use clap::Args;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    config::{Scenario, SimulationConfig, SimulationOpts},
    engine::TrafficEngine,
};

#[derive(Debug, Clone, Args)]
/// run the traffic engine against one target
pub struct RunCommand {
    /// URL receiving the simulated traffic
    #[arg(value_name = "TARGET_URL", required = true)]
    target: Url,

    #[clap(flatten)]
    opts: SimulationOpts,

    #[arg(long)]
    /// Scenario preset to start from,
    /// manually defined parameters overwrite scenario parameters.
    scenario: Option<Scenario>,

    /// Stop automatically after this many seconds (default: run until Ctrl-C)
    #[arg(long, value_name = "SECONDS")]
    duration: Option<f64>,

    /// Seconds between periodic stats lines
    #[arg(long, value_name = "SECONDS", default_value_t = 5.0)]
    stats_interval: f64,

    /// Print the final stats summary as JSON instead of a human line
    #[arg(long, default_value_t = false)]
    json: bool,
}

pub async fn exec(
    cancel: CancellationToken,
    graceful: Option<Duration>,
    args: RunCommand,
) -> Result<()> {
    if let Some(secs) = args.duration {
        if !(secs > 0.0) {
            bail!("duration must be positive, got {secs}");
        }
    }

    let merged = merge_simulation_opts(args.scenario, args.opts);
    let config = SimulationConfig::from_opts(args.target, merged)?;
    let engine = Arc::new(TrafficEngine::new(config)?);

    engine.start();

    let ticker = tokio::spawn(stats_ticker(
        engine.clone(),
        Duration::from_secs_f64(args.stats_interval.max(1.0)),
    ));

    match args.duration {
        Some(secs) => {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("interrupted before the configured duration elapsed");
                }
                _ = tokio::time::sleep(Duration::from_secs_f64(secs)) => {
                    tracing::info!("configured duration of {secs}s elapsed");
                }
            }
        }
        None => cancel.cancelled().await,
    }

    engine.stop();
    match graceful {
        Some(limit) => {
            if tokio::time::timeout(limit, engine.join()).await.is_err() {
                tracing::warn!("graceful limit of {limit:?} hit before all workers finished");
            }
        }
        None => engine.join().await,
    }
    ticker.abort();

    let stats = engine.stats();
    if args.json {
        println!(
            "{}",
            serde_json::to_string(&stats).context("serialize final stats")?
        );
    } else {
        println!(
            "done hits={} failed={} distinct_subnets={}",
            stats.hits, stats.failed, stats.distinct_subnets,
        );
    }

    Ok(())
}

async fn stats_ticker(engine: Arc<TrafficEngine>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    // The first tick of a tokio interval fires immediately.
    ticker.tick().await;

    let mut last = 0u64;
    loop {
        ticker.tick().await;
        let stats = engine.stats();
        tracing::info!(
            "stats hits={} (+{}) failed={} subnets={}",
            stats.hits,
            stats.hits - last,
            stats.failed,
            stats.distinct_subnets,
        );
        last = stats.hits;
    }
}

fn merge_simulation_opts(scenario: Option<Scenario>, overwrite: SimulationOpts) -> SimulationOpts {
    let scenario_cfg = scenario
        .map(|s| {
            tracing::info!("use scenario to define base options: {s:?}");
            s.simulation_opts()
        })
        .unwrap_or_else(|| {
            tracing::info!("no scenario defined, use defaults as base options");
            Default::default()
        });

    macro_rules! merge_opts {
        ($scenario:ident, $overwrite:ident, {$($property:ident),+ $(,)?}) => {
            SimulationOpts {
                $(
                    $property: if let Some(value) = $overwrite.$property {
                        tracing::info!("option '{}': use overwrite: {value}", stringify!($property));
                        Some(value)
                    } else if let Some(value) = $scenario.$property {
                        tracing::info!("option '{}': use scenario: {value}", stringify!($property));
                        Some(value)
                    } else {
                        tracing::debug!("option '{}': undefined", stringify!($property));
                        None
                    },
                )+
                params: if $overwrite.params.is_empty() {
                    $scenario.params
                } else {
                    $overwrite.params
                },
            }
        };
    }

    merge_opts!(
        scenario_cfg, overwrite,
        {
            min_rate,
            max_rate,
            workers,
            method,
            timeout,
            desktop_share,
            active_min,
            active_max,
            idle_entry,
            idle_min,
            idle_max,
            unique_visitor,
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_overwrite_scenario_values() {
        let overwrite = SimulationOpts {
            min_rate: Some(5),
            workers: Some(1),
            ..Default::default()
        };

        let merged = merge_simulation_opts(Some(Scenario::Steady), overwrite);

        assert_eq!(merged.min_rate, Some(5));
        assert_eq!(merged.workers, Some(1));
        // Untouched options fall through to the preset.
        assert_eq!(merged.max_rate, Scenario::Steady.simulation_opts().max_rate);
        assert_eq!(
            merged.idle_entry,
            Scenario::Steady.simulation_opts().idle_entry
        );
    }

    #[test]
    fn no_scenario_leaves_unset_options_undefined() {
        let merged = merge_simulation_opts(None, SimulationOpts::default());
        assert_eq!(merged.min_rate, None);
        assert_eq!(merged.method, None);
        assert!(merged.params.is_empty());
    }

    #[test]
    fn explicit_param_rules_survive_the_merge() {
        let overwrite = SimulationOpts {
            params: vec![crate::config::parse_param_rule("mine=1@50").unwrap()],
            ..Default::default()
        };
        let merged = merge_simulation_opts(Some(Scenario::Trickle), overwrite);

        assert_eq!(merged.params.len(), 1);
        assert_eq!(merged.params[0].key, "mine");
    }
}
