#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the growth model workspace.
//!
//! This crate defines the six bounded [`Parameters`] that drive a pass, the
//! validation errors raised when they fall outside their declared ranges, and
//! the [`Trajectory`] produced by the evaluator and consumed by the renderers.
//! Every value here is transient: a pass builds it, renders it and drops it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of samples in the fixed time grid.
pub const SAMPLE_COUNT: usize = 300;

/// First instant covered by the time grid.
pub const TIME_START: f64 = 0.0;

/// Last instant covered by the time grid, inclusive.
pub const TIME_END: f64 = 30.0;

/// Identifies one of the six user-adjustable inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterName {
    /// Core effort invested, an integer in `0..=100`.
    CoreEffort,
    /// Resources available, an integer in `0..=100`.
    Resources,
    /// Efficiency multiplier, a real in `0.1..=3.0`.
    Efficiency,
    /// Time influence divisor, a real in `0.1..=5.0`.
    TimeInfluence,
    /// Cost or friction subtracted from the output, an integer in `0..=500`.
    Friction,
    /// Complexity cap normalising the damping weight, an integer in `1..=30`.
    ComplexityCap,
}

impl ParameterName {
    /// All parameters in the order they are presented to users.
    pub const ALL: [ParameterName; 6] = [
        ParameterName::CoreEffort,
        ParameterName::Resources,
        ParameterName::Efficiency,
        ParameterName::TimeInfluence,
        ParameterName::Friction,
        ParameterName::ComplexityCap,
    ];

    /// Inclusive range of values accepted for the parameter.
    #[must_use]
    pub const fn range(self) -> ParameterRange {
        match self {
            Self::CoreEffort | Self::Resources => ParameterRange::new(0.0, 100.0),
            Self::Efficiency => ParameterRange::new(0.1, 3.0),
            Self::TimeInfluence => ParameterRange::new(0.1, 5.0),
            Self::Friction => ParameterRange::new(0.0, 500.0),
            Self::ComplexityCap => ParameterRange::new(1.0, 30.0),
        }
    }

    /// Human readable label shown next to the parameter value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CoreEffort => "Core Effort",
            Self::Resources => "Resources",
            Self::Efficiency => "Efficiency",
            Self::TimeInfluence => "Time Influence",
            Self::Friction => "Cost / Friction",
            Self::ComplexityCap => "Complexity Cap",
        }
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive bounds accepted for a parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterRange {
    /// Smallest accepted value.
    pub min: f64,
    /// Largest accepted value.
    pub max: f64,
}

impl ParameterRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Determines whether the value lies within the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The six scalar inputs of the growth model.
///
/// Missing fields fall back to [`Parameters::default`] when deserialising, so
/// a parameter file only needs to list the values it changes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    /// Core effort invested.
    pub core_effort: u32,
    /// Resources available.
    pub resources: u32,
    /// Efficiency multiplier applied to the investment.
    pub efficiency: f64,
    /// Divisor applied to the efficiency.
    pub time_influence: f64,
    /// Cost or friction subtracted from the output.
    pub friction: u32,
    /// Upper bound of the complexity damping weight.
    pub complexity_cap: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            core_effort: 42,
            resources: 36,
            efficiency: 1.2,
            time_influence: 1.0,
            friction: 100,
            complexity_cap: 12,
        }
    }
}

impl Parameters {
    /// Reads the value of the named parameter as a real number.
    #[must_use]
    pub fn value(&self, name: ParameterName) -> f64 {
        match name {
            ParameterName::CoreEffort => f64::from(self.core_effort),
            ParameterName::Resources => f64::from(self.resources),
            ParameterName::Efficiency => self.efficiency,
            ParameterName::TimeInfluence => self.time_influence,
            ParameterName::Friction => f64::from(self.friction),
            ParameterName::ComplexityCap => f64::from(self.complexity_cap),
        }
    }

    /// Confirms that every parameter lies within its declared range.
    ///
    /// A zero complexity cap is reported separately from other range failures
    /// because the model divides by it.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.complexity_cap == 0 {
            return Err(ParameterError::ZeroComplexityCap);
        }

        for parameter in ParameterName::ALL {
            let value = self.value(parameter);
            if !value.is_finite() {
                return Err(ParameterError::NotFinite { parameter });
            }

            let range = parameter.range();
            if !range.contains(value) {
                return Err(ParameterError::OutOfRange {
                    parameter,
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        Ok(())
    }
}

/// Reasons a set of parameters is refused before evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ParameterError {
    /// A parameter lies outside its inclusive range.
    #[error("{parameter} must lie within {min}..={max} (received {value})")]
    OutOfRange {
        /// Parameter that failed validation.
        parameter: ParameterName,
        /// Value that was supplied.
        value: f64,
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// The complexity cap was zero, which would divide by zero.
    #[error("complexity cap must be positive (received 0)")]
    ZeroComplexityCap,
    /// A real parameter was NaN or infinite.
    #[error("{parameter} must be a finite number")]
    NotFinite {
        /// Parameter that failed validation.
        parameter: ParameterName,
    },
}

/// Strategic boost components sampled on the time grid.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BoostTerms {
    /// Step relief event.
    pub relief: Vec<f64>,
    /// Periodic pulse boost.
    pub pulse: Vec<f64>,
    /// Complexity-clamped damping weight.
    pub weight: Vec<f64>,
    /// Combined strategic boost.
    pub strategic: Vec<f64>,
}

impl BoostTerms {
    /// Number of samples carried by each component.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategic.len()
    }

    /// Determines whether the terms contain no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategic.is_empty()
    }
}

/// Scalar terms that stay constant across the time grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aggregates {
    /// Investment `I`, the weighted sum of core effort and resources.
    pub investment: f64,
    /// Multiplier `M`, efficiency divided by time influence.
    pub multiplier: f64,
    /// Friction `F`, the cost plus the fixed baseline.
    pub friction: f64,
}

/// Model output aligned one-to-one with the time grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    /// Sample instants.
    pub time: Vec<f64>,
    /// Boost components at each instant.
    pub boost: BoostTerms,
    /// Constant aggregate terms.
    pub aggregates: Aggregates,
    /// `Δ` at each instant.
    pub delta: Vec<f64>,
    /// `G` at each instant, always three times `Δ`.
    pub growth: Vec<f64>,
}

impl Trajectory {
    /// Number of samples in the trajectory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Determines whether the trajectory holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Returns the sample at the provided index.
    #[must_use]
    pub fn sample(&self, index: usize) -> Option<Sample> {
        Some(Sample {
            time: *self.time.get(index)?,
            boost: *self.boost.strategic.get(index)?,
            delta: *self.delta.get(index)?,
            growth: *self.growth.get(index)?,
        })
    }
}

/// Values of a trajectory at a single instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Sample instant.
    pub time: f64,
    /// Strategic boost at the instant.
    pub boost: f64,
    /// `Δ` at the instant.
    pub delta: f64,
    /// `G` at the instant.
    pub growth: f64,
}
