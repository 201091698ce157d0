#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Vector backend that renders growth model charts as standalone SVG
//! documents.

use std::fmt::{self, Write as _};

use anyhow::Result as AnyResult;
use growth_model_rendering::{
    ChartBackend, ChartData, ChartPresentation, Margins, PlotArea, RenderingError,
};

const MARGINS: Margins = Margins {
    left: 72.0,
    right: 24.0,
    top: 44.0,
    bottom: 52.0,
};
const TITLE_SIZE: u32 = 16;
const LABEL_SIZE: u32 = 12;
const SERIES_WIDTH: f64 = 2.0;
const DASH_PATTERN: &str = "6 4";
const LEGEND_ROW: f64 = 18.0;
const LEGEND_PADDING: f64 = 8.0;
const LEGEND_SWATCH: f64 = 24.0;

/// Chart backend producing SVG markup.
///
/// Each draw replaces the held document, so after a static render it holds the
/// full chart and after an animation it holds the final frame.
#[derive(Clone, Debug, Default)]
pub struct SvgBackend {
    document: Option<String>,
}

impl SvgBackend {
    /// Creates a backend that has not drawn anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently drawn document, if any.
    #[must_use]
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Consumes the backend and returns the drawn document.
    pub fn finish(self) -> Result<String, RenderingError> {
        self.document.ok_or(RenderingError::EncodingFailure {
            artifact: "SVG chart",
            reason: "no chart was drawn".to_owned(),
        })
    }
}

impl ChartBackend for SvgBackend {
    fn draw(&mut self, presentation: &ChartPresentation, data: &ChartData<'_>) -> AnyResult<()> {
        let mut document = String::new();
        compose(&mut document, presentation, data)?;
        self.document = Some(document);
        Ok(())
    }
}

fn compose(out: &mut String, presentation: &ChartPresentation, data: &ChartData<'_>) -> fmt::Result {
    let width = presentation.width;
    let height = presentation.height;
    let area = PlotArea::inset(width, height, MARGINS);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="{LABEL_SIZE}">"#
    )?;
    writeln!(
        out,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        presentation.background.to_hex()
    )?;
    writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="{TITLE_SIZE}">{}</text>"#,
        f64::from(width) / 2.0,
        MARGINS.top / 2.0 + 6.0,
        escape(&presentation.title)
    )?;

    compose_axes(out, presentation, &area)?;

    if let Some(color) = presentation.zero_guide {
        if presentation.viewport.shows_zero() {
            let (_, y) = area.project(&presentation.viewport, presentation.viewport.x_min, 0.0);
            writeln!(
                out,
                r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-dasharray="{DASH_PATTERN}"/>"#,
                area.left,
                area.right(),
                color.to_hex()
            )?;
        }
    }

    for (style, values) in presentation.series.iter().zip(data.series()) {
        write!(
            out,
            r#"<polyline fill="none" stroke="{}" stroke-width="{SERIES_WIDTH}" stroke-linejoin="round" points=""#,
            style.color.to_hex()
        )?;
        for (index, (&x, &y)) in data.time().iter().zip(values).enumerate() {
            let (px, py) = area.project(&presentation.viewport, x, y);
            if index > 0 {
                out.push(' ');
            }
            write!(out, "{px:.2},{py:.2}")?;
        }
        writeln!(out, r#""/>"#)?;
    }

    writeln!(
        out,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{}"/>"#,
        area.left,
        area.top,
        area.width,
        area.height,
        presentation.frame.to_hex()
    )?;

    compose_legend(out, presentation, &area)?;

    writeln!(out, "</svg>")
}

fn compose_axes(out: &mut String, presentation: &ChartPresentation, area: &PlotArea) -> fmt::Result {
    let viewport = &presentation.viewport;
    let grid = presentation.grid.map(|color| color.to_hex());

    let x_ticks = viewport.x_ticks();
    for &tick in &x_ticks.values {
        let (x, _) = area.project(viewport, tick, viewport.y_min);
        if let Some(grid) = &grid {
            writeln!(
                out,
                r#"<line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="{grid}"/>"#,
                area.top,
                area.bottom()
            )?;
        }
        writeln!(
            out,
            r#"<text x="{x:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            area.bottom() + 16.0,
            x_ticks.label(tick)
        )?;
    }

    let y_ticks = viewport.y_ticks();
    for &tick in &y_ticks.values {
        let (_, y) = area.project(viewport, viewport.x_min, tick);
        if let Some(grid) = &grid {
            writeln!(
                out,
                r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{grid}"/>"#,
                area.left,
                area.right()
            )?;
        }
        writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="end">{}</text>"#,
            area.left - 8.0,
            y + 4.0,
            y_ticks.label(tick)
        )?;
    }

    writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
        area.left + area.width / 2.0,
        area.bottom() + 40.0,
        escape(&presentation.x_label)
    )?;
    writeln!(
        out,
        r#"<text transform="translate({:.2} {:.2}) rotate(-90)" text-anchor="middle">{}</text>"#,
        18.0,
        area.top + area.height / 2.0,
        escape(&presentation.y_label)
    )
}

fn compose_legend(out: &mut String, presentation: &ChartPresentation, area: &PlotArea) -> fmt::Result {
    let longest = presentation
        .series
        .iter()
        .map(|style| style.label.chars().count())
        .max()
        .unwrap_or(0);
    let width = LEGEND_PADDING * 3.0 + LEGEND_SWATCH + longest as f64 * 7.5;
    let height = LEGEND_PADDING * 2.0 + LEGEND_ROW * presentation.series.len() as f64;
    let left = area.right() - width - LEGEND_PADDING;
    let top = area.top + LEGEND_PADDING;

    writeln!(
        out,
        r#"<rect x="{left:.2}" y="{top:.2}" width="{width:.2}" height="{height:.2}" fill="{}" fill-opacity="0.8" stroke="{}"/>"#,
        presentation.background.to_hex(),
        presentation.grid.unwrap_or(presentation.frame).to_hex()
    )?;

    for (row, style) in presentation.series.iter().enumerate() {
        let y = top + LEGEND_PADDING + LEGEND_ROW * (row as f64 + 0.5);
        let swatch_left = left + LEGEND_PADDING;
        writeln!(
            out,
            r#"<line x1="{swatch_left:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="{SERIES_WIDTH}"/>"#,
            swatch_left + LEGEND_SWATCH,
            style.color.to_hex()
        )?;
        writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}">{}</text>"#,
            swatch_left + LEGEND_SWATCH + LEGEND_PADDING,
            y + 4.0,
            escape(&style.label)
        )?;
    }

    Ok(())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
