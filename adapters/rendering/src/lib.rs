#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for growth model chart adapters.
//!
//! Backends implement [`ChartBackend`] and receive a [`ChartPresentation`]
//! together with validated [`ChartData`]. The static chart is a single draw
//! call over the full series. The animation is a sequence of draw calls, one
//! per prefix returned by [`ChartData::prefix`], sharing one presentation so
//! the viewport never moves during playback.

use anyhow::{Context, Result as AnyResult};
use growth_model_core::{Trajectory, TIME_END, TIME_START};
use std::fmt;
use thiserror::Error;

/// Playback rate of the animated chart, in frames per second.
pub const ANIMATION_FPS: u32 = 30;

/// Vertical padding added above and below the data extrema.
pub const VIEWPORT_PADDING: f64 = 10.0;

/// Number of tick intervals aimed for on each axis.
pub const TARGET_TICKS: usize = 6;

/// RGBA color used when presenting charts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgb_u8(255, 255, 255);
    /// Series color for `Δ`.
    pub const BLUE: Self = Self::from_rgb_u8(0, 0, 255);
    /// Series color for `G`.
    pub const GREEN: Self = Self::from_rgb_u8(0, 128, 0);
    /// Neutral color used for the zero guide.
    pub const GRAY: Self = Self::from_rgb_u8(128, 128, 128);
    /// Color used for the axes frame.
    pub const CHARCOAL: Self = Self::from_rgb_u8(38, 38, 38);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Converts the color into byte RGBA channels.
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
            channel_to_u8(self.alpha),
        ]
    }

    /// Formats the RGB channels as a `#rrggbb` hex string.
    #[must_use]
    pub fn to_hex(self) -> String {
        let [red, green, blue, _] = self.to_rgba8();
        format!("#{red:02x}{green:02x}{blue:02x}")
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Validated series aligned with a shared time axis.
///
/// Construction guarantees the input is non-empty and that `Δ` and `G` carry
/// exactly one value per instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartData<'a> {
    time: &'a [f64],
    delta: &'a [f64],
    growth: &'a [f64],
}

impl<'a> ChartData<'a> {
    /// Validates the provided sequences.
    pub fn new(
        time: &'a [f64],
        delta: &'a [f64],
        growth: &'a [f64],
    ) -> Result<Self, RenderingError> {
        if time.is_empty() || delta.is_empty() || growth.is_empty() {
            return Err(RenderingError::InvalidInput(InputDefect::Empty));
        }
        for (series, values) in [("Δ", delta), ("G", growth)] {
            if values.len() != time.len() {
                return Err(RenderingError::InvalidInput(InputDefect::LengthMismatch {
                    series,
                    expected: time.len(),
                    actual: values.len(),
                }));
            }
        }

        Ok(Self {
            time,
            delta,
            growth,
        })
    }

    /// Validates the sequences carried by an evaluated trajectory.
    pub fn from_trajectory(trajectory: &'a Trajectory) -> Result<Self, RenderingError> {
        Self::new(&trajectory.time, &trajectory.delta, &trajectory.growth)
    }

    /// Number of points in each series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always `false`; validated data holds at least one point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Shared time axis.
    #[must_use]
    pub fn time(&self) -> &'a [f64] {
        self.time
    }

    /// `Δ` values.
    #[must_use]
    pub fn delta(&self) -> &'a [f64] {
        self.delta
    }

    /// `G` values.
    #[must_use]
    pub fn growth(&self) -> &'a [f64] {
        self.growth
    }

    /// Both series in legend order.
    #[must_use]
    pub fn series(&self) -> [&'a [f64]; 2] {
        [self.delta, self.growth]
    }

    /// Returns the data revealed by animation frame `frame`: the first
    /// `frame + 1` points of every sequence.
    #[must_use]
    pub fn prefix(&self, frame: usize) -> Option<ChartData<'a>> {
        if frame >= self.len() {
            return None;
        }
        let end = frame + 1;

        Some(Self {
            time: &self.time[..end],
            delta: &self.delta[..end],
            growth: &self.growth[..end],
        })
    }

    /// Iterates over every animation frame in playback order.
    pub fn frames(self) -> impl Iterator<Item = ChartData<'a>> {
        (0..self.len()).filter_map(move |frame| self.prefix(frame))
    }

    /// Smallest and largest value across both series.
    #[must_use]
    pub fn value_extrema(&self) -> (f64, f64) {
        self.delta
            .iter()
            .chain(self.growth)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &value| {
                (min.min(value), max.max(value))
            })
    }
}

/// Defects that make chart input unrenderable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputDefect {
    /// At least one sequence held no values.
    Empty,
    /// A series did not match the length of the time axis.
    LengthMismatch {
        /// Name of the offending series.
        series: &'static str,
        /// Length of the time axis.
        expected: usize,
        /// Length of the offending series.
        actual: usize,
    },
    /// The presentation requested a canvas without area.
    ZeroSizedCanvas {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

impl fmt::Display for InputDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "chart sequences must not be empty"),
            Self::LengthMismatch {
                series,
                expected,
                actual,
            } => write!(
                f,
                "series {series} holds {actual} values but the time axis holds {expected}"
            ),
            Self::ZeroSizedCanvas { width, height } => {
                write!(f, "canvas must have a positive area (received {width}x{height})")
            }
        }
    }
}

/// Errors that can occur while rendering chart artifacts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// The provided input cannot be rendered.
    #[error("invalid chart input: {0}")]
    InvalidInput(InputDefect),
    /// The artifact could not be serialised.
    #[error("could not encode {artifact}: {reason}")]
    EncodingFailure {
        /// Artifact being encoded.
        artifact: &'static str,
        /// Description of the failure reported by the encoder.
        reason: String,
    },
}

/// Axis bounds shared by every frame of a chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge of the horizontal axis.
    pub x_min: f64,
    /// Right edge of the horizontal axis.
    pub x_max: f64,
    /// Bottom edge of the vertical axis.
    pub y_min: f64,
    /// Top edge of the vertical axis.
    pub y_max: f64,
}

impl Viewport {
    /// Computes the bounds for the full data set.
    ///
    /// The horizontal axis always spans the model's time domain. The vertical
    /// axis spans both series padded by [`VIEWPORT_PADDING`].
    #[must_use]
    pub fn fixed_for(data: &ChartData<'_>) -> Self {
        let (min, max) = data.value_extrema();

        Self {
            x_min: TIME_START,
            x_max: TIME_END,
            y_min: min - VIEWPORT_PADDING,
            y_max: max + VIEWPORT_PADDING,
        }
    }

    /// Maps a data point to normalised coordinates where `(0, 0)` is the
    /// bottom-left corner of the viewport and `(1, 1)` the top-right.
    #[must_use]
    pub fn normalise(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.x_min) / (self.x_max - self.x_min),
            (y - self.y_min) / (self.y_max - self.y_min),
        )
    }

    /// Determines whether the horizontal zero guide falls inside the viewport.
    #[must_use]
    pub fn shows_zero(&self) -> bool {
        self.y_min <= 0.0 && self.y_max >= 0.0
    }

    /// Tick positions along the horizontal axis.
    #[must_use]
    pub fn x_ticks(&self) -> Ticks {
        Ticks::spanning(self.x_min, self.x_max, TARGET_TICKS)
    }

    /// Tick positions along the vertical axis.
    #[must_use]
    pub fn y_ticks(&self) -> Ticks {
        Ticks::spanning(self.y_min, self.y_max, TARGET_TICKS)
    }
}

/// Evenly spaced tick positions on a "nice" step of 1, 2 or 5 × 10ⁿ.
#[derive(Clone, Debug, PartialEq)]
pub struct Ticks {
    /// Distance between consecutive ticks.
    pub step: f64,
    /// Tick positions inside the spanned range.
    pub values: Vec<f64>,
}

impl Ticks {
    /// Chooses ticks covering `min..=max` with roughly `target` intervals.
    #[must_use]
    pub fn spanning(min: f64, max: f64, target: usize) -> Self {
        let span = max - min;
        if !span.is_finite() || span <= 0.0 || target == 0 {
            return Self {
                step: 0.0,
                values: Vec::new(),
            };
        }

        let step = nice_step(span / target as f64);
        let first = (min / step - 1e-9).ceil() as i64;
        let last = (max / step + 1e-9).floor() as i64;
        let values = (first..=last).map(|index| index as f64 * step).collect();

        Self { step, values }
    }

    /// Number of decimals needed to print tick labels without losing the step.
    #[must_use]
    pub fn precision(&self) -> usize {
        if self.step <= 0.0 || self.step >= 1.0 {
            0
        } else {
            (-self.step.log10() - 1e-9).ceil() as usize
        }
    }

    /// Formats a tick value at [`Ticks::precision`] decimals.
    ///
    /// Values that round to zero print as `0`, never `-0`.
    #[must_use]
    pub fn label(&self, value: f64) -> String {
        let precision = self.precision();
        let formatted = format!("{value:.precision$}");
        let unsigned = formatted.trim_start_matches('-');
        if unsigned.chars().all(|c| c == '0' || c == '.') {
            unsigned.to_owned()
        } else {
            formatted
        }
    }
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction < 1.5 {
        1.0
    } else if fraction < 3.0 {
        2.0
    } else if fraction < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Space reserved around the plot area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    /// Space left of the plot area.
    pub left: f64,
    /// Space right of the plot area.
    pub right: f64,
    /// Space above the plot area.
    pub top: f64,
    /// Space below the plot area.
    pub bottom: f64,
}

/// Pixel rectangle that hosts the plotted data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    /// Left edge in pixels.
    pub left: f64,
    /// Top edge in pixels.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl PlotArea {
    /// Shrinks a canvas by the provided margins.
    ///
    /// Margins larger than the canvas collapse the area to zero size rather
    /// than inverting it.
    #[must_use]
    pub fn inset(canvas_width: u32, canvas_height: u32, margins: Margins) -> Self {
        Self {
            left: margins.left,
            top: margins.top,
            width: (f64::from(canvas_width) - margins.left - margins.right).max(0.0),
            height: (f64::from(canvas_height) - margins.top - margins.bottom).max(0.0),
        }
    }

    /// Right edge in pixels.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge in pixels.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Projects a data point to pixel coordinates, with `y` growing downwards.
    #[must_use]
    pub fn project(&self, viewport: &Viewport, x: f64, y: f64) -> (f64, f64) {
        let (x, y) = viewport.normalise(x, y);
        (self.left + x * self.width, self.top + (1.0 - y) * self.height)
    }
}

/// Style applied to one plotted series.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesStyle {
    /// Legend label.
    pub label: String,
    /// Stroke color.
    pub color: Color,
}

impl SeriesStyle {
    /// Creates a new series style.
    #[must_use]
    pub fn new<T>(label: T, color: Color) -> Self
    where
        T: Into<String>,
    {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// Presentation descriptor consumed by chart backends.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartPresentation {
    /// Title drawn above the plot area.
    pub title: String,
    /// Label of the horizontal axis.
    pub x_label: String,
    /// Label of the vertical axis.
    pub y_label: String,
    /// Styles for `Δ` and `G`, in that order.
    pub series: [SeriesStyle; 2],
    /// Color of the dashed horizontal guide at zero, if drawn.
    pub zero_guide: Option<Color>,
    /// Color of the grid lines, if drawn.
    pub grid: Option<Color>,
    /// Color of the axes frame.
    pub frame: Color,
    /// Solid color used to clear the canvas.
    pub background: Color,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Axis bounds shared by every draw call.
    pub viewport: Viewport,
}

impl ChartPresentation {
    /// Width of the static chart in pixels.
    pub const STATIC_WIDTH: u32 = 1000;
    /// Height of the static chart in pixels.
    pub const STATIC_HEIGHT: u32 = 400;
    /// Width of the animated chart in pixels.
    pub const ANIMATED_WIDTH: u32 = 640;
    /// Height of the animated chart in pixels.
    pub const ANIMATED_HEIGHT: u32 = 480;

    /// Describes the static chart of the full series.
    #[must_use]
    pub fn static_chart(data: &ChartData<'_>) -> Self {
        Self::with_title(
            "Δ(t) and G(t) Over Time",
            Self::STATIC_WIDTH,
            Self::STATIC_HEIGHT,
            Viewport::fixed_for(data),
        )
    }

    /// Describes the animated chart.
    ///
    /// The viewport is computed here, once, from the full series.
    #[must_use]
    pub fn animated_chart(data: &ChartData<'_>) -> Self {
        Self::with_title(
            "Animated Growth Model",
            Self::ANIMATED_WIDTH,
            Self::ANIMATED_HEIGHT,
            Viewport::fixed_for(data),
        )
    }

    /// Overrides the canvas dimensions.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Confirms the canvas has a positive area.
    pub fn validate(&self) -> Result<(), RenderingError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderingError::InvalidInput(InputDefect::ZeroSizedCanvas {
                width: self.width,
                height: self.height,
            }));
        }
        Ok(())
    }

    fn with_title(title: &str, width: u32, height: u32, viewport: Viewport) -> Self {
        Self {
            title: title.to_owned(),
            x_label: "Time (t)".to_owned(),
            y_label: "Value".to_owned(),
            series: [
                SeriesStyle::new("Δ(t)", Color::BLUE),
                SeriesStyle::new("G(t)", Color::GREEN),
            ],
            zero_guide: Some(Color::GRAY),
            grid: Some(Color::GRAY.lighten(0.65)),
            frame: Color::CHARCOAL,
            background: Color::WHITE,
            width,
            height,
            viewport,
        }
    }
}

/// Rendering backend capable of drawing growth model charts.
pub trait ChartBackend {
    /// Draws one complete picture of `data` using `presentation`.
    ///
    /// Static charts receive a single call; animations receive one call per
    /// frame in playback order.
    fn draw(&mut self, presentation: &ChartPresentation, data: &ChartData<'_>) -> AnyResult<()>;
}

/// Draws the full series once.
pub fn render_static<B>(
    backend: &mut B,
    presentation: &ChartPresentation,
    data: &ChartData<'_>,
) -> AnyResult<()>
where
    B: ChartBackend + ?Sized,
{
    presentation.validate()?;
    backend
        .draw(presentation, data)
        .context("failed to draw static chart")?;
    tracing::debug!(points = data.len(), "rendered static chart");
    Ok(())
}

/// Draws every animation frame in order and returns how many were drawn.
///
/// Frame `k` reveals the first `k + 1` points of each series. All frames share
/// `presentation`, so the viewport stays fixed throughout playback.
pub fn render_animation<B>(
    backend: &mut B,
    presentation: &ChartPresentation,
    data: &ChartData<'_>,
) -> AnyResult<usize>
where
    B: ChartBackend + ?Sized,
{
    presentation.validate()?;
    let mut drawn = 0;
    for frame in data.frames() {
        backend
            .draw(presentation, &frame)
            .with_context(|| format!("failed to draw animation frame {drawn}"))?;
        drawn += 1;
    }
    tracing::debug!(frames = drawn, fps = ANIMATION_FPS, "rendered animation");
    Ok(drawn)
}
