use std::time::Duration;

use anyhow::{Result, bail};
use reqwest::Method;
use url::Url;

/// One URL-parameter injection rule: evaluated independently per hit, the
/// key renders when a uniform draw in [0,100) lands below `percent`. A rule
/// without a value renders as a bare flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRule {
    pub key: String,
    pub value: Option<String>,
    pub percent: f64,
}

/// Resolved, immutable settings for one engine instance.
///
/// Rates are hits per minute per worker. `desktop_share` and parameter
/// probabilities are percentages; `idle_entry` and `unique_visitor` are
/// fractions in [0,1].
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub target: Url,
    pub method: Method,
    pub timeout: Duration,
    pub workers: u32,
    pub min_rate: u32,
    pub max_rate: u32,
    pub desktop_share: f64,
    pub active_min: Duration,
    pub active_max: Duration,
    pub idle_entry: f64,
    pub idle_min: Duration,
    pub idle_max: Duration,
    pub unique_visitor: f64,
    pub params: Vec<ParamRule>,
}

impl SimulationConfig {
    /// Builds the resolved configuration from an already-merged option set,
    /// filling unset options with the defaults below, then validates.
    pub fn from_opts(target: Url, opts: SimulationOpts) -> Result<Self> {
        let config = Self {
            target,
            method: opts.method.unwrap_or(Method::GET),
            timeout: seconds("timeout", opts.timeout.unwrap_or(10.0))?,
            workers: opts.workers.unwrap_or(3),
            min_rate: opts.min_rate.unwrap_or(30),
            max_rate: opts.max_rate.unwrap_or(90),
            desktop_share: opts.desktop_share.unwrap_or(60.0),
            active_min: seconds("active_min", opts.active_min.unwrap_or(30.0))?,
            active_max: seconds("active_max", opts.active_max.unwrap_or(90.0))?,
            idle_entry: opts.idle_entry.unwrap_or(0.3),
            idle_min: seconds("idle_min", opts.idle_min.unwrap_or(15.0))?,
            idle_max: seconds("idle_max", opts.idle_max.unwrap_or(60.0))?,
            unique_visitor: opts.unique_visitor.unwrap_or(0.7),
            params: opts.params,
        };
        config.validate()?;
        Ok(config)
    }

    /// Range and ordering checks. A failure here must keep `start`
    /// unreachable; nothing later re-validates.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.target.scheme(), "http" | "https") || self.target.host_str().is_none() {
            bail!("target must be an absolute http(s) URL, got '{}'", self.target);
        }
        if self.min_rate == 0 {
            bail!("min_rate must be at least 1 hit per minute");
        }
        if self.min_rate > self.max_rate {
            bail!(
                "min_rate {} exceeds max_rate {}",
                self.min_rate,
                self.max_rate
            );
        }
        if self.workers == 0 {
            bail!("workers must be at least 1");
        }
        if self.timeout.is_zero() {
            bail!("timeout must be positive");
        }
        if !(0.0..=100.0).contains(&self.desktop_share) {
            bail!(
                "desktop_share must be within 0..=100, got {}",
                self.desktop_share
            );
        }
        if self.active_min.is_zero() {
            bail!("active_min must be positive");
        }
        if self.active_min > self.active_max {
            bail!(
                "active_min {:?} exceeds active_max {:?}",
                self.active_min,
                self.active_max
            );
        }
        if self.idle_min > self.idle_max {
            bail!("idle_min {:?} exceeds idle_max {:?}", self.idle_min, self.idle_max);
        }
        for (name, fraction) in [
            ("idle_entry", self.idle_entry),
            ("unique_visitor", self.unique_visitor),
        ] {
            if !(0.0..=1.0).contains(&fraction) {
                bail!("{name} must be within 0..=1, got {fraction}");
            }
        }
        for rule in &self.params {
            if rule.key.is_empty() {
                bail!("url parameter rules need a non-empty key");
            }
            if !(0.0..=100.0).contains(&rule.percent) {
                bail!(
                    "parameter '{}' probability must be within 0..=100, got {}",
                    rule.key,
                    rule.percent
                );
            }
        }
        Ok(())
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration> {
    if !value.is_finite() || value < 0.0 {
        bail!("{name} must be a non-negative number of seconds, got {value}");
    }
    Ok(Duration::from_secs_f64(value))
}

/// The flat option set an operator layers over a scenario preset. Every
/// field is optional so presets and explicit flags merge cleanly.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SimulationOpts {
    /// Minimum hits per minute per worker during an active phase
    #[arg(long, value_name = "HITS_PER_MIN")]
    pub min_rate: Option<u32>,

    /// Maximum hits per minute per worker during an active phase
    #[arg(long, value_name = "HITS_PER_MIN")]
    pub max_rate: Option<u32>,

    /// Number of concurrent workers
    #[arg(long, value_name = "N")]
    pub workers: Option<u32>,

    /// HTTP method used for every hit
    #[arg(long, value_name = "METHOD", value_parser = parse_method)]
    pub method: Option<Method>,

    /// Per-request timeout; an expired request counts as a failed hit
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Percentage of hits carrying a desktop user agent
    #[arg(long, value_name = "PERCENT")]
    pub desktop_share: Option<f64>,

    /// Shortest active phase
    #[arg(long, value_name = "SECONDS")]
    pub active_min: Option<f64>,

    /// Longest active phase
    #[arg(long, value_name = "SECONDS")]
    pub active_max: Option<f64>,

    /// Probability of idling after an active phase ran its full course
    #[arg(long, value_name = "FRACTION")]
    pub idle_entry: Option<f64>,

    /// Shortest idle phase
    #[arg(long, value_name = "SECONDS")]
    pub idle_min: Option<f64>,

    /// Longest idle phase
    #[arg(long, value_name = "SECONDS")]
    pub idle_max: Option<f64>,

    /// Probability that a hit originates from a brand-new network
    #[arg(long, value_name = "FRACTION")]
    pub unique_visitor: Option<f64>,

    /// URL parameter rule, repeatable: KEY[=VALUE][@PERCENT]
    ///
    /// `utm_source=mail@80` renders `utm_source=mail` on 80% of hits;
    /// `nocache@25` renders a bare flag on a quarter of them. Omitting the
    /// percentage means always.
    #[arg(long = "param", value_name = "KEY[=VALUE][@PERCENT]", value_parser = parse_param_rule)]
    pub params: Vec<ParamRule>,
}

pub fn parse_method(input: &str) -> Result<Method, String> {
    Method::from_bytes(input.to_ascii_uppercase().as_bytes()).map_err(|err| err.to_string())
}

pub fn parse_param_rule(input: &str) -> Result<ParamRule, String> {
    let (body, percent) = match input.rsplit_once('@') {
        Some((head, tail)) => (
            head,
            tail.parse::<f64>()
                .map_err(|err| format!("invalid probability in '{input}': {err}"))?,
        ),
        None => (input, 100.0),
    };
    if !(0.0..=100.0).contains(&percent) {
        return Err(format!("probability must be within 0..=100 in '{input}'"));
    }

    let (key, value) = match body.split_once('=') {
        Some((key, value)) => (key, (!value.is_empty()).then(|| value.to_owned())),
        None => (body, None),
    };
    if key.is_empty() {
        return Err(format!("missing parameter key in '{input}'"));
    }

    Ok(ParamRule {
        key: key.to_owned(),
        value,
        percent,
    })
}
