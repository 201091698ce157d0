use anyhow::{bail, Result};
use growth_model_core::{Parameters, SAMPLE_COUNT};
use growth_model_rendering::{
    render_animation, render_static, ChartBackend, ChartData, ChartPresentation, Viewport,
};
use growth_model_system_evaluator::evaluate;

#[derive(Default)]
struct RecordingBackend {
    viewports: Vec<Viewport>,
    point_counts: Vec<usize>,
    fail_at: Option<usize>,
}

impl ChartBackend for RecordingBackend {
    fn draw(&mut self, presentation: &ChartPresentation, data: &ChartData<'_>) -> Result<()> {
        if self.fail_at == Some(self.point_counts.len()) {
            bail!("recording backend asked to fail");
        }
        self.viewports.push(presentation.viewport);
        for series in data.series() {
            assert_eq!(series.len(), data.time().len());
        }
        self.point_counts.push(data.len());
        Ok(())
    }
}

#[test]
fn animation_reveals_curves_progressively() {
    let trajectory = evaluate(&Parameters::default()).expect("defaults evaluate");
    let data = ChartData::from_trajectory(&trajectory).expect("trajectory is aligned");
    let presentation = ChartPresentation::animated_chart(&data);
    let mut backend = RecordingBackend::default();

    let frames =
        render_animation(&mut backend, &presentation, &data).expect("animation renders");

    assert_eq!(frames, SAMPLE_COUNT);
    let expected: Vec<usize> = (1..=SAMPLE_COUNT).collect();
    assert_eq!(backend.point_counts, expected);
    assert!(backend
        .point_counts
        .iter()
        .take(SAMPLE_COUNT - 1)
        .all(|&count| count < SAMPLE_COUNT));
}

#[test]
fn viewport_is_identical_across_every_frame() {
    let trajectory = evaluate(&Parameters {
        efficiency: 2.7,
        complexity_cap: 4,
        ..Parameters::default()
    })
    .expect("parameters evaluate");
    let data = ChartData::from_trajectory(&trajectory).expect("trajectory is aligned");
    let presentation = ChartPresentation::animated_chart(&data);
    let mut backend = RecordingBackend::default();

    let _frames =
        render_animation(&mut backend, &presentation, &data).expect("animation renders");

    let full = Viewport::fixed_for(&data);
    assert_eq!(backend.viewports.len(), SAMPLE_COUNT);
    assert!(backend.viewports.iter().all(|viewport| *viewport == full));

    let (min, max) = data.value_extrema();
    assert_eq!(full.y_min, min - 10.0);
    assert_eq!(full.y_max, max + 10.0);
    assert_eq!((full.x_min, full.x_max), (0.0, 30.0));
}

#[test]
fn static_chart_draws_full_series_once() {
    let trajectory = evaluate(&Parameters::default()).expect("defaults evaluate");
    let data = ChartData::from_trajectory(&trajectory).expect("trajectory is aligned");
    let presentation = ChartPresentation::static_chart(&data);
    let mut backend = RecordingBackend::default();

    render_static(&mut backend, &presentation, &data).expect("static chart renders");

    assert_eq!(backend.point_counts, vec![SAMPLE_COUNT]);
}

#[test]
fn backend_failure_stops_the_animation() {
    let trajectory = evaluate(&Parameters::default()).expect("defaults evaluate");
    let data = ChartData::from_trajectory(&trajectory).expect("trajectory is aligned");
    let presentation = ChartPresentation::animated_chart(&data);
    let mut backend = RecordingBackend {
        fail_at: Some(5),
        ..RecordingBackend::default()
    };

    let error = render_animation(&mut backend, &presentation, &data)
        .expect_err("failing backend aborts the animation");

    assert!(format!("{error:#}").contains("frame 5"));
    assert_eq!(backend.point_counts.len(), 5);
}

#[test]
fn truncated_trajectory_is_rejected_before_rendering() {
    let mut trajectory = evaluate(&Parameters::default()).expect("defaults evaluate");
    let _ = trajectory.growth.pop();

    assert!(ChartData::from_trajectory(&trajectory).is_err());
}
