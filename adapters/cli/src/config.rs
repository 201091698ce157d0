//! Parameter resolution: defaults, then an optional TOML file, then flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Args;
use growth_model_core::Parameters;

/// Per-parameter overrides supplied on the command line.
#[derive(Args, Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ParameterOverrides {
    /// Core effort, an integer in 0..=100.
    #[arg(long)]
    pub(crate) core_effort: Option<u32>,
    /// Resources, an integer in 0..=100.
    #[arg(long)]
    pub(crate) resources: Option<u32>,
    /// Efficiency, a real in 0.1..=3.0.
    #[arg(long)]
    pub(crate) efficiency: Option<f64>,
    /// Time influence, a real in 0.1..=5.0.
    #[arg(long)]
    pub(crate) time_influence: Option<f64>,
    /// Cost / friction, an integer in 0..=500.
    #[arg(long)]
    pub(crate) friction: Option<u32>,
    /// Complexity cap, an integer in 1..=30.
    #[arg(long)]
    pub(crate) complexity_cap: Option<u32>,
}

impl ParameterOverrides {
    /// Replaces every parameter for which an override was supplied.
    pub(crate) fn apply(&self, parameters: &mut Parameters) {
        if let Some(value) = self.core_effort {
            parameters.core_effort = value;
        }
        if let Some(value) = self.resources {
            parameters.resources = value;
        }
        if let Some(value) = self.efficiency {
            parameters.efficiency = value;
        }
        if let Some(value) = self.time_influence {
            parameters.time_influence = value;
        }
        if let Some(value) = self.friction {
            parameters.friction = value;
        }
        if let Some(value) = self.complexity_cap {
            parameters.complexity_cap = value;
        }
    }
}

/// Builds the parameters for a pass.
///
/// Range checks are left to the evaluator so every entry point reports the
/// same error.
pub(crate) fn resolve(path: Option<&Path>, overrides: &ParameterOverrides) -> Result<Parameters> {
    let mut parameters = match path {
        Some(path) => load_parameters(path)?,
        None => Parameters::default(),
    };
    overrides.apply(&mut parameters);
    Ok(parameters)
}

fn load_parameters(path: &Path) -> Result<Parameters> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read parameter file {}", path.display()))?;
    parse_parameters(&contents)
        .with_context(|| format!("failed to load parameter file {}", path.display()))
}

fn parse_parameters(contents: &str) -> Result<Parameters> {
    toml::from_str(contents).context("failed to parse parameter toml contents")
}
