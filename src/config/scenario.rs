use super::simulation::SimulationOpts;

/// High level traffic presets.
/// Each one is a complete option set; explicitly passed flags overwrite
/// individual preset values.
#[derive(Debug, Clone, Copy, clap::ValueEnum, Default)]
pub enum Scenario {
    /// Continuous moderate browsing, idle windows are rare and short.
    #[default]
    Steady,

    /// Short high-rate bursts separated by long quiet windows.
    /// Used to exercise spike handling on the receiving side.
    Bursty,

    /// A slow drip of mostly-new visitors.
    /// Used to grow unique-visitor counts without meaningful load.
    Trickle,
}

impl Scenario {
    /// Concrete option set backing this preset.
    pub fn simulation_opts(self) -> SimulationOpts {
        match self {
            Scenario::Steady => SimulationOpts {
                min_rate: Some(40),
                max_rate: Some(80),
                workers: Some(4),
                desktop_share: Some(65.0),
                active_min: Some(60.0),
                active_max: Some(180.0),
                idle_entry: Some(0.1),
                idle_min: Some(10.0),
                idle_max: Some(30.0),
                unique_visitor: Some(0.6),
                ..Default::default()
            },

            Scenario::Bursty => SimulationOpts {
                min_rate: Some(120),
                max_rate: Some(240),
                workers: Some(6),
                desktop_share: Some(55.0),
                active_min: Some(10.0),
                active_max: Some(30.0),
                idle_entry: Some(0.8),
                idle_min: Some(30.0),
                idle_max: Some(120.0),
                unique_visitor: Some(0.5),
                ..Default::default()
            },

            Scenario::Trickle => SimulationOpts {
                min_rate: Some(6),
                max_rate: Some(18),
                workers: Some(2),
                desktop_share: Some(45.0),
                active_min: Some(30.0),
                active_max: Some(60.0),
                idle_entry: Some(0.9),
                idle_min: Some(60.0),
                idle_max: Some(300.0),
                unique_visitor: Some(0.9),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;

    #[test]
    fn every_preset_resolves_to_a_valid_config() {
        for scenario in [Scenario::Steady, Scenario::Bursty, Scenario::Trickle] {
            let opts = scenario.simulation_opts();
            SimulationConfig::from_opts("https://example.com/".parse().unwrap(), opts)
                .unwrap_or_else(|err| panic!("{scenario:?} preset is invalid: {err}"));
        }
    }
}
