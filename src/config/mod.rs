mod scenario;
mod simulation;

pub use self::{
    scenario::Scenario,
    simulation::{ParamRule, SimulationConfig, SimulationOpts, parse_method, parse_param_rule},
};
