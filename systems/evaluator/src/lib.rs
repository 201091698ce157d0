#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure evaluator that turns six bounded parameters into the `Δ` and `G`
//! trajectories sampled over the fixed time grid.

use std::f64::consts::PI;

use growth_model_core::{
    Aggregates, BoostTerms, ParameterError, Parameters, Trajectory, SAMPLE_COUNT, TIME_END,
    TIME_START,
};
use thiserror::Error;

/// Instant from which the relief step applies.
pub const RELIEF_ONSET: f64 = 5.0;
/// Height of the relief step.
pub const RELIEF_LEVEL: f64 = 40.0;
/// Angular frequency of the pulse boost.
pub const PULSE_FREQUENCY: f64 = 0.9;
/// Height of the pulse boost while the pulse is active.
pub const PULSE_LEVEL: f64 = 10.0;
/// Rate at which the complexity weight grows with time.
pub const WEIGHT_RATE: f64 = 0.5;
/// Weight applied to both core effort and resources in the investment term.
pub const INVESTMENT_WEIGHT: f64 = 9.0;
/// Fixed friction added to the user-supplied cost, `612·π`.
pub const FRICTION_BASELINE: f64 = 612.0 * PI;
/// Divisor normalising `Δ`.
pub const DELTA_SCALE: f64 = 51.0;
/// Ratio between `G` and `Δ`.
pub const GROWTH_FACTOR: f64 = 3.0;

/// Errors raised while evaluating the model.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum EvaluationError {
    /// The parameters were refused before any arithmetic ran.
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),
    /// The efficiency ratio would divide by a zero time influence.
    #[error("time influence of zero would divide the efficiency {efficiency} by zero")]
    DivideByZero {
        /// Efficiency that was about to be divided.
        efficiency: f64,
    },
}

/// Builds the fixed time grid of [`SAMPLE_COUNT`] evenly spaced instants.
///
/// The last sample is pinned to [`TIME_END`] so accumulated rounding never
/// leaves the grid short of the domain.
#[must_use]
pub fn time_grid() -> Vec<f64> {
    let step = (TIME_END - TIME_START) / (SAMPLE_COUNT - 1) as f64;
    (0..SAMPLE_COUNT)
        .map(|index| {
            if index == SAMPLE_COUNT - 1 {
                TIME_END
            } else {
                TIME_START + index as f64 * step
            }
        })
        .collect()
}

/// Relief step: [`RELIEF_LEVEL`] from [`RELIEF_ONSET`] onwards, zero before.
#[must_use]
pub fn relief(time: f64) -> f64 {
    if time >= RELIEF_ONSET {
        RELIEF_LEVEL
    } else {
        0.0
    }
}

/// Pulse boost: [`PULSE_LEVEL`] while `sin(0.9·t)` is positive.
#[must_use]
pub fn pulse(time: f64) -> f64 {
    if (PULSE_FREQUENCY * time).sin() > 0.0 {
        PULSE_LEVEL
    } else {
        0.0
    }
}

/// Complexity weight `clamp(0.5·t, 0, cap)`.
#[must_use]
pub fn weight(time: f64, complexity_cap: f64) -> f64 {
    (WEIGHT_RATE * time).clamp(0.0, complexity_cap)
}

/// Strategic boost `relief · pulse · (1 − weight / cap)`.
///
/// Callers must pass a positive cap; [`boost_terms`] enforces this.
#[must_use]
pub fn strategic_boost(time: f64, complexity_cap: f64) -> f64 {
    relief(time) * pulse(time) * (1.0 - weight(time, complexity_cap) / complexity_cap)
}

/// Samples every boost component over the provided instants.
pub fn boost_terms(time: &[f64], complexity_cap: u32) -> Result<BoostTerms, EvaluationError> {
    if complexity_cap == 0 {
        return Err(ParameterError::ZeroComplexityCap.into());
    }
    let cap = f64::from(complexity_cap);

    let mut terms = BoostTerms {
        relief: Vec::with_capacity(time.len()),
        pulse: Vec::with_capacity(time.len()),
        weight: Vec::with_capacity(time.len()),
        strategic: Vec::with_capacity(time.len()),
    };
    for &instant in time {
        terms.relief.push(relief(instant));
        terms.pulse.push(pulse(instant));
        terms.weight.push(weight(instant, cap));
        terms.strategic.push(strategic_boost(instant, cap));
    }

    Ok(terms)
}

/// Multiplier `M = efficiency / time_influence`.
pub fn efficiency_ratio(efficiency: f64, time_influence: f64) -> Result<f64, EvaluationError> {
    if time_influence == 0.0 {
        return Err(EvaluationError::DivideByZero { efficiency });
    }

    Ok(efficiency / time_influence)
}

/// Evaluates the model for the provided parameters.
///
/// Parameters are validated first, so an out-of-range input never produces
/// NaN or infinite samples.
pub fn evaluate(parameters: &Parameters) -> Result<Trajectory, EvaluationError> {
    parameters.validate()?;

    let time = time_grid();
    let boost = boost_terms(&time, parameters.complexity_cap)?;

    let aggregates = Aggregates {
        investment: INVESTMENT_WEIGHT * f64::from(parameters.core_effort)
            + INVESTMENT_WEIGHT * f64::from(parameters.resources),
        multiplier: efficiency_ratio(parameters.efficiency, parameters.time_influence)?,
        friction: f64::from(parameters.friction) + FRICTION_BASELINE,
    };

    let delta: Vec<f64> = boost
        .strategic
        .iter()
        .map(|&strategic| {
            (aggregates.multiplier * (aggregates.investment + strategic) - aggregates.friction)
                / DELTA_SCALE
        })
        .collect();
    let growth = delta.iter().map(|&value| GROWTH_FACTOR * value).collect();

    tracing::debug!(
        samples = time.len(),
        investment = aggregates.investment,
        multiplier = aggregates.multiplier,
        friction = aggregates.friction,
        "evaluated growth model"
    );

    Ok(Trajectory {
        time,
        boost,
        aggregates,
        delta,
        growth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_grid_spans_domain_with_fixed_length() {
        let grid = time_grid();

        assert_eq!(grid.len(), SAMPLE_COUNT);
        assert_eq!(grid[0], TIME_START);
        assert_eq!(grid[SAMPLE_COUNT - 1], TIME_END);
        assert!(grid.windows(2).all(|pair| pair[1] > pair[0]));
        assert!((grid[1] - 30.0 / 299.0).abs() < 1e-12);
    }

    #[test]
    fn relief_switches_on_at_onset() {
        assert_eq!(relief(4.999), 0.0);
        assert_eq!(relief(5.0), RELIEF_LEVEL);
        assert_eq!(relief(29.0), RELIEF_LEVEL);
    }

    #[test]
    fn pulse_follows_sign_of_sine() {
        assert_eq!(pulse(0.0), 0.0, "sin(0) is not positive");
        assert_eq!(pulse(1.0), PULSE_LEVEL);
        // sin(0.9 · 4) = sin(3.6) < 0
        assert_eq!(pulse(4.0), 0.0);
    }

    #[test]
    fn weight_is_clamped_to_cap() {
        assert_eq!(weight(4.0, 12.0), 2.0);
        assert_eq!(weight(30.0, 12.0), 12.0);
        assert_eq!(weight(-2.0, 12.0), 0.0);
    }

    #[test]
    fn boost_vanishes_once_weight_reaches_cap() {
        assert_eq!(strategic_boost(24.0, 12.0), 0.0);
        assert_eq!(strategic_boost(6.0, 1.0), 0.0);
    }

    #[test]
    fn boost_combines_components() {
        // sin(0.9 · 6) = sin(5.4) < 0, sin(0.9 · 7) = sin(6.3) > 0
        assert_eq!(strategic_boost(6.0, 12.0), 0.0);
        let expected = RELIEF_LEVEL * PULSE_LEVEL * (1.0 - 3.5 / 12.0);
        assert!((strategic_boost(7.0, 12.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn boost_terms_reject_zero_cap() {
        let error = boost_terms(&time_grid(), 0).expect_err("zero cap must be rejected");

        assert_eq!(
            error,
            EvaluationError::InvalidParameter(ParameterError::ZeroComplexityCap)
        );
    }

    #[test]
    fn efficiency_ratio_guards_zero_divisor() {
        assert_eq!(
            efficiency_ratio(1.2, 0.0),
            Err(EvaluationError::DivideByZero { efficiency: 1.2 })
        );
        assert_eq!(efficiency_ratio(3.0, 1.5), Ok(2.0));
    }

    #[test]
    fn default_scenario_matches_closed_form_at_origin() {
        let trajectory = evaluate(&Parameters::default()).expect("defaults evaluate");

        assert_eq!(trajectory.aggregates.investment, 702.0);
        assert_eq!(trajectory.aggregates.multiplier, 1.2);
        assert!((trajectory.aggregates.friction - (100.0 + 612.0 * PI)).abs() < 1e-9);

        let origin = trajectory.sample(0).expect("origin sample");
        assert_eq!(origin.boost, 0.0);
        let expected = (1.2 * 702.0 - (100.0 + 612.0 * PI)) / 51.0;
        assert!((origin.delta - expected).abs() < 1e-9);
        assert!((origin.delta - (-23.1422)).abs() < 1e-3);
        assert!((origin.growth - 3.0 * expected).abs() < 1e-9);
    }
}
