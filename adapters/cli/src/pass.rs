//! One evaluation-and-render pass from parameters to host-ready artifacts.

use anyhow::{ensure, Context, Result};
use clap::ValueEnum;
use growth_model_core::Parameters;
use growth_model_rendering::{
    render_animation, render_static, ChartData, ChartPresentation, ANIMATION_FPS,
};
use growth_model_rendering_raster::{GifBackend, RasterBackend};
use growth_model_rendering_svg::SvgBackend;
use growth_model_system_evaluator::evaluate;

use crate::{embed, page};

/// Format of the static chart artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum StaticFormat {
    /// Scalable vector chart with labels and legend text.
    #[default]
    Svg,
    /// Raster chart with bitmap-font labels.
    Png,
}

impl StaticFormat {
    /// File extension used when writing the artifact.
    pub(crate) const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// Knobs for a single pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PassOptions {
    static_format: StaticFormat,
    #[cfg(test)]
    animation_size: Option<(u32, u32)>,
}

impl PassOptions {
    /// Options producing the static chart in `static_format` and the
    /// animation at its preset size.
    pub(crate) fn new(static_format: StaticFormat) -> Self {
        Self {
            static_format,
            #[cfg(test)]
            animation_size: None,
        }
    }

    /// Shrinks the animation canvas so tests encode quickly.
    #[cfg(test)]
    fn with_animation_size(mut self, width: u32, height: u32) -> Self {
        self.animation_size = Some((width, height));
        self
    }

    fn animation_presentation(&self, data: &ChartData<'_>) -> ChartPresentation {
        let presentation = ChartPresentation::animated_chart(data);
        #[cfg(test)]
        if let Some((width, height)) = self.animation_size {
            return presentation.with_size(width, height);
        }
        presentation
    }
}

/// Everything a pass produces, held in memory until the host writes it.
#[derive(Clone, Debug)]
pub(crate) struct PassArtifacts {
    /// Format of [`PassArtifacts::static_chart`].
    pub(crate) static_format: StaticFormat,
    /// Encoded static chart.
    pub(crate) static_chart: Vec<u8>,
    /// Encoded GIF animation.
    pub(crate) animation: Vec<u8>,
    /// Number of frames in the animation.
    pub(crate) frames: usize,
    /// Self-contained page embedding both charts.
    pub(crate) page: String,
}

/// Runs one complete pass.
///
/// Nothing is returned unless every artifact was produced, so a failed pass
/// never leaves partial output behind.
pub(crate) fn run_pass(parameters: &Parameters, options: &PassOptions) -> Result<PassArtifacts> {
    let trajectory = evaluate(parameters).context("failed to evaluate growth model")?;
    let data = ChartData::from_trajectory(&trajectory)?;

    let static_presentation = ChartPresentation::static_chart(&data);
    let (static_chart, static_markup) = match options.static_format {
        StaticFormat::Svg => {
            let mut backend = SvgBackend::new();
            render_static(&mut backend, &static_presentation, &data)?;
            let document = backend.finish()?;
            (document.clone().into_bytes(), document)
        }
        StaticFormat::Png => {
            let mut backend = RasterBackend::new();
            render_static(&mut backend, &static_presentation, &data)?;
            let png = backend.finish_png()?;
            let markup = format!(
                r#"<img src="{}" alt="{}"/>"#,
                embed::data_uri("image/png", &png),
                static_presentation.title
            );
            (png, markup)
        }
    };

    let animation_presentation = options.animation_presentation(&data);
    let mut animation = Vec::new();
    let frames = {
        let mut backend = GifBackend::new(&mut animation, ANIMATION_FPS)?;
        let drawn = render_animation(&mut backend, &animation_presentation, &data)
            .context("failed to render animation")?;
        let encoded = backend.finish()?;
        ensure!(
            drawn == encoded,
            "animation drew {drawn} frames but encoded {encoded}"
        );
        encoded
    };

    let embedded = embed::embed_animation(&animation, embed::ANIMATION_HEIGHT)?;
    let page = page::compose_page(
        parameters,
        &trajectory.aggregates,
        &static_markup,
        &embedded,
    )
    .context("failed to compose host page")?;

    Ok(PassArtifacts {
        static_format: options.static_format,
        static_chart,
        animation,
        frames,
        page,
    })
}
