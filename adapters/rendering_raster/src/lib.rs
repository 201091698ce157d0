#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Raster backends for growth model charts.
//!
//! Frames are rasterised into RGBA buffers with the title, axis and tick
//! labels, grid, dashed zero guide, both series and a labelled legend. Text is
//! set in an 8×8 bitmap font. [`RasterBackend`] keeps the latest frame and
//! encodes it as PNG, and [`GifBackend`] streams every frame it receives into
//! a looping GIF.

mod canvas;

use std::io::{Cursor, Write};

use anyhow::Result as AnyResult;
use glam::Vec2;
use growth_model_rendering::{
    ChartBackend, ChartData, ChartPresentation, Margins, PlotArea, RenderingError,
};
use image::{
    codecs::gif::{GifEncoder, Repeat},
    Delay, Frame, ImageFormat, RgbaImage,
};

use self::canvas::{text_width, Canvas, GLYPH_SIZE};

/// Stroke width of both series, in pixels.
const SERIES_WIDTH: f32 = 2.0;
/// Length of a legend swatch, in pixels.
const SWATCH_LENGTH: f32 = 24.0;
/// Spacing between the legend, its contents and the plot frame, in pixels.
const LEGEND_SPACING: f32 = 8.0;
/// Height of one legend row, in pixels.
const LEGEND_ROW: f32 = 12.0;
/// Gap between a label and the element it annotates, in pixels.
const LABEL_GAP: f32 = 4.0;
/// Glyph magnification of the title.
const TITLE_SCALE: u32 = 2;
/// Glyph magnification of tick, axis and legend labels.
const LABEL_SCALE: u32 = 1;
/// NeuQuant sampling factor passed to the GIF encoder (1 = best, 30 = fastest).
const GIF_SPEED: i32 = 20;

/// Rasterises one complete picture of `data`.
#[must_use]
pub fn rasterise(presentation: &ChartPresentation, data: &ChartData<'_>) -> RgbaImage {
    let width = presentation.width;
    let height = presentation.height;
    let area = PlotArea::inset(width, height, margins_for(width, height));
    let viewport = &presentation.viewport;
    let ink = presentation.frame;
    let mut canvas = Canvas::new(width, height, presentation.background);

    let top_left = Vec2::new(area.left as f32, area.top as f32);
    let bottom_right = Vec2::new(area.right() as f32, area.bottom() as f32);
    let glyph = (GLYPH_SIZE * LABEL_SCALE) as f32;

    let x_ticks = viewport.x_ticks();
    for &tick in &x_ticks.values {
        let (x, _) = area.project(viewport, tick, viewport.y_min);
        let x = x as f32;
        if let Some(grid) = presentation.grid {
            canvas.line(Vec2::new(x, top_left.y), Vec2::new(x, bottom_right.y), 1.0, grid);
        }
        let label = x_ticks.label(tick);
        let origin = Vec2::new(
            x - text_width(&label, LABEL_SCALE) / 2.0,
            bottom_right.y + LABEL_GAP,
        );
        canvas.text(origin, &label, LABEL_SCALE, ink);
    }

    let y_ticks = viewport.y_ticks();
    for &tick in &y_ticks.values {
        let (_, y) = area.project(viewport, viewport.x_min, tick);
        let y = y as f32;
        if let Some(grid) = presentation.grid {
            canvas.line(Vec2::new(top_left.x, y), Vec2::new(bottom_right.x, y), 1.0, grid);
        }
        let label = y_ticks.label(tick);
        let origin = Vec2::new(
            top_left.x - LABEL_GAP - text_width(&label, LABEL_SCALE),
            y - glyph / 2.0,
        );
        canvas.text(origin, &label, LABEL_SCALE, ink);
    }

    if let Some(guide) = presentation.zero_guide {
        if viewport.shows_zero() {
            let (_, y) = area.project(viewport, viewport.x_min, 0.0);
            let y = y as f32;
            canvas.dashed_line(
                Vec2::new(top_left.x, y),
                Vec2::new(bottom_right.x, y),
                1.0,
                guide,
            );
        }
    }

    for (style, values) in presentation.series.iter().zip(data.series()) {
        let points: Vec<Vec2> = data
            .time()
            .iter()
            .zip(values)
            .map(|(&x, &y)| {
                let (px, py) = area.project(viewport, x, y);
                Vec2::new(px as f32, py as f32)
            })
            .collect();
        canvas.polyline(&points, SERIES_WIDTH, style.color);
    }

    canvas.outline(top_left, bottom_right, ink);

    let title_height = (GLYPH_SIZE * TITLE_SCALE) as f32;
    canvas.text(
        Vec2::new(
            (width as f32 - text_width(&presentation.title, TITLE_SCALE)) / 2.0,
            ((top_left.y - title_height) / 2.0).max(0.0),
        ),
        &presentation.title,
        TITLE_SCALE,
        ink,
    );
    canvas.text(
        Vec2::new(
            (top_left.x + bottom_right.x - text_width(&presentation.x_label, LABEL_SCALE)) / 2.0,
            bottom_right.y + LABEL_GAP * 2.0 + glyph,
        ),
        &presentation.x_label,
        LABEL_SCALE,
        ink,
    );
    canvas.text_upwards(
        Vec2::new(
            LABEL_GAP,
            (top_left.y + bottom_right.y - text_width(&presentation.y_label, LABEL_SCALE)) / 2.0,
        ),
        &presentation.y_label,
        LABEL_SCALE,
        ink,
    );

    draw_legend(&mut canvas, presentation, top_left, bottom_right);

    canvas.into_image()
}

/// Legend box in the top-right corner of the plot area: one swatch and label
/// per series.
fn draw_legend(
    canvas: &mut Canvas,
    presentation: &ChartPresentation,
    top_left: Vec2,
    bottom_right: Vec2,
) {
    let longest = presentation
        .series
        .iter()
        .map(|style| text_width(&style.label, LABEL_SCALE))
        .fold(0.0, f32::max);
    let size = Vec2::new(
        LEGEND_SPACING * 3.0 + SWATCH_LENGTH + longest,
        LEGEND_SPACING * 2.0 + LEGEND_ROW * presentation.series.len() as f32,
    );
    let corner = Vec2::new(bottom_right.x - LEGEND_SPACING - size.x, top_left.y + LEGEND_SPACING);

    canvas.fill(corner, corner + size, presentation.background);
    canvas.outline(
        corner,
        corner + size,
        presentation.grid.unwrap_or(presentation.frame),
    );

    let glyph = (GLYPH_SIZE * LABEL_SCALE) as f32;
    for (row, style) in presentation.series.iter().enumerate() {
        let y = corner.y + LEGEND_SPACING + LEGEND_ROW * (row as f32 + 0.5);
        let swatch_left = corner.x + LEGEND_SPACING;
        canvas.line(
            Vec2::new(swatch_left, y),
            Vec2::new(swatch_left + SWATCH_LENGTH, y),
            SERIES_WIDTH,
            style.color,
        );
        canvas.text(
            Vec2::new(swatch_left + SWATCH_LENGTH + LEGEND_SPACING, y - glyph / 2.0),
            &style.label,
            LABEL_SCALE,
            presentation.frame,
        );
    }
}

/// Margins sized for the labels, shrunk proportionally on small canvases so
/// previews keep a usable plot area.
fn margins_for(width: u32, height: u32) -> Margins {
    let width = f64::from(width);
    let height = f64::from(height);

    Margins {
        left: 72.0_f64.min((width * 0.2).round()),
        right: 16.0_f64.min((width * 0.05).round()),
        top: 32.0_f64.min((height * 0.1).round()),
        bottom: 44.0_f64.min((height * 0.15).round()),
    }
}

fn encoding_failure(artifact: &'static str, error: image::ImageError) -> RenderingError {
    RenderingError::EncodingFailure {
        artifact,
        reason: error.to_string(),
    }
}

/// Chart backend that keeps the most recently rasterised frame.
#[derive(Debug, Default)]
pub struct RasterBackend {
    frame: Option<RgbaImage>,
}

impl RasterBackend {
    /// Creates a backend that has not drawn anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently drawn frame, if any.
    #[must_use]
    pub fn frame(&self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }

    /// Encodes the most recently drawn frame as PNG.
    pub fn finish_png(self) -> Result<Vec<u8>, RenderingError> {
        let frame = self.frame.ok_or_else(|| RenderingError::EncodingFailure {
            artifact: "PNG chart",
            reason: "no chart was drawn".to_owned(),
        })?;

        let mut bytes = Vec::new();
        frame
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|error| encoding_failure("PNG chart", error))?;
        Ok(bytes)
    }
}

impl ChartBackend for RasterBackend {
    fn draw(&mut self, presentation: &ChartPresentation, data: &ChartData<'_>) -> AnyResult<()> {
        self.frame = Some(rasterise(presentation, data));
        Ok(())
    }
}

/// Chart backend that streams every drawn frame into an animated GIF.
///
/// Frames are encoded as they arrive and are not retained, so memory use does
/// not grow with the number of frames.
pub struct GifBackend<W: Write> {
    encoder: GifEncoder<W>,
    delay: Delay,
    frames: usize,
}

impl<W: Write> GifBackend<W> {
    /// Starts a looping GIF written to `writer` at `fps` frames per second.
    pub fn new(writer: W, fps: u32) -> Result<Self, RenderingError> {
        if fps == 0 {
            return Err(RenderingError::EncodingFailure {
                artifact: "GIF animation",
                reason: "frame rate must be positive".to_owned(),
            });
        }

        let mut encoder = GifEncoder::new_with_speed(writer, GIF_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|error| encoding_failure("GIF animation", error))?;

        Ok(Self {
            encoder,
            delay: Delay::from_numer_denom_ms(1000, fps),
            frames: 0,
        })
    }

    /// Number of frames encoded so far.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Completes the animation and returns the number of encoded frames.
    ///
    /// An animation without frames is refused rather than emitted empty.
    pub fn finish(self) -> Result<usize, RenderingError> {
        let Self {
            encoder, frames, ..
        } = self;
        if frames == 0 {
            return Err(RenderingError::EncodingFailure {
                artifact: "GIF animation",
                reason: "no frames were drawn".to_owned(),
            });
        }

        // Dropping the encoder writes the GIF trailer.
        drop(encoder);
        tracing::debug!(frames, "finished GIF animation");
        Ok(frames)
    }
}

impl<W: Write> ChartBackend for GifBackend<W> {
    fn draw(&mut self, presentation: &ChartPresentation, data: &ChartData<'_>) -> AnyResult<()> {
        let image = rasterise(presentation, data);
        self.encoder
            .encode_frame(Frame::from_parts(image, 0, 0, self.delay))
            .map_err(|error| encoding_failure("GIF animation", error))?;
        self.frames += 1;
        Ok(())
    }
}
