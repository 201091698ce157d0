use growth_model_core::{ParameterError, Parameters, SAMPLE_COUNT, TIME_END, TIME_START};
use growth_model_system_evaluator::{evaluate, EvaluationError, INVESTMENT_WEIGHT};

fn parameter_grid() -> Vec<Parameters> {
    let mut grid = Vec::new();
    for core_effort in [0, 42, 100] {
        for efficiency in [0.1, 1.2, 3.0] {
            for time_influence in [0.1, 1.0, 5.0] {
                for complexity_cap in [1, 12, 30] {
                    grid.push(Parameters {
                        core_effort,
                        resources: 100 - core_effort / 2,
                        efficiency,
                        time_influence,
                        friction: 250,
                        complexity_cap,
                    });
                }
            }
        }
    }
    grid
}

#[test]
fn growth_is_exactly_three_times_delta() {
    for parameters in parameter_grid() {
        let trajectory = evaluate(&parameters).expect("valid parameters evaluate");

        for (delta, growth) in trajectory.delta.iter().zip(&trajectory.growth) {
            assert_eq!(*growth, 3.0 * *delta, "parameters: {parameters:?}");
        }
    }
}

#[test]
fn every_sequence_is_aligned_with_the_time_grid() {
    for parameters in parameter_grid() {
        let trajectory = evaluate(&parameters).expect("valid parameters evaluate");

        assert_eq!(trajectory.len(), SAMPLE_COUNT);
        assert_eq!(trajectory.time[0], TIME_START);
        assert_eq!(trajectory.time[SAMPLE_COUNT - 1], TIME_END);
        assert_eq!(trajectory.delta.len(), SAMPLE_COUNT);
        assert_eq!(trajectory.growth.len(), SAMPLE_COUNT);
        assert_eq!(trajectory.boost.relief.len(), SAMPLE_COUNT);
        assert_eq!(trajectory.boost.pulse.len(), SAMPLE_COUNT);
        assert_eq!(trajectory.boost.weight.len(), SAMPLE_COUNT);
        assert_eq!(trajectory.boost.len(), SAMPLE_COUNT);
        assert!(trajectory
            .delta
            .iter()
            .chain(&trajectory.growth)
            .all(|value| value.is_finite()));
    }
}

#[test]
fn boost_is_zero_before_relief_onset() {
    for parameters in parameter_grid() {
        let trajectory = evaluate(&parameters).expect("valid parameters evaluate");

        for (time, boost) in trajectory.time.iter().zip(&trajectory.boost.strategic) {
            if *time < 5.0 {
                assert_eq!(*boost, 0.0, "boost must be gated at t = {time}");
            }
        }
    }
}

#[test]
fn effort_and_resources_shift_delta_by_multiplier() {
    let base = Parameters::default();
    let shifted = Parameters {
        core_effort: base.core_effort + 10,
        resources: base.resources - 6,
        ..base
    };

    let before = evaluate(&base).expect("base evaluates");
    let after = evaluate(&shifted).expect("shifted evaluates");

    let multiplier = base.efficiency / base.time_influence;
    let expected = multiplier * INVESTMENT_WEIGHT * (10.0 - 6.0) / 51.0;
    for (old, new) in before.delta.iter().zip(&after.delta) {
        assert!(((new - old) - expected).abs() < 1e-9);
    }
}

#[test]
fn complexity_cap_of_zero_is_refused_and_one_is_accepted() {
    let refused = evaluate(&Parameters {
        complexity_cap: 0,
        ..Parameters::default()
    })
    .expect_err("zero cap must be refused");
    assert_eq!(
        refused,
        EvaluationError::InvalidParameter(ParameterError::ZeroComplexityCap)
    );

    let accepted = evaluate(&Parameters {
        complexity_cap: 1,
        ..Parameters::default()
    })
    .expect("cap of one is valid");
    assert_eq!(accepted.len(), SAMPLE_COUNT);
}

#[test]
fn out_of_range_parameters_are_refused() {
    let error = evaluate(&Parameters {
        time_influence: 0.0,
        ..Parameters::default()
    })
    .expect_err("time influence below its range must be refused");

    assert!(matches!(
        error,
        EvaluationError::InvalidParameter(ParameterError::OutOfRange { .. })
    ));
}

#[test]
fn evaluation_is_deterministic() {
    let parameters = Parameters::default();

    assert_eq!(
        evaluate(&parameters).expect("first pass"),
        evaluate(&parameters).expect("second pass")
    );
}
