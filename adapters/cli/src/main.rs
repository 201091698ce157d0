#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line host that evaluates the growth model and writes the static
//! chart, the animated chart and a page embedding both.

mod config;
mod embed;
mod output;
mod page;
mod pass;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use self::{
    config::ParameterOverrides,
    pass::{PassArtifacts, PassOptions, StaticFormat},
};

/// Command-line arguments accepted by the host.
#[derive(Parser, Debug)]
#[command(author, version, about = "Growth model chart and animation generator", long_about = None)]
struct Cli {
    /// TOML file providing parameter values; flags take precedence.
    #[arg(long)]
    params: Option<PathBuf>,
    #[command(flatten)]
    overrides: ParameterOverrides,
    /// Directory receiving the generated artifacts.
    #[arg(long, default_value = "growth-model-out")]
    out_dir: PathBuf,
    /// Format of the static chart.
    #[arg(long, value_enum, default_value_t = StaticFormat::Svg)]
    static_format: StaticFormat,
}

/// Entry point for the growth model command-line interface.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let parameters = config::resolve(cli.params.as_deref(), &cli.overrides)?;
    tracing::info!(?parameters, "starting pass");

    let artifacts = pass::run_pass(&parameters, &PassOptions::new(cli.static_format))?;
    write_artifacts(&cli.out_dir, &artifacts)
}

/// Places the static chart, the animation and the page in `out_dir`
/// together; a failure leaves the directory as it was.
fn write_artifacts(out_dir: &Path, artifacts: &PassArtifacts) -> Result<()> {
    let static_name = format!("static.{}", artifacts.static_format.extension());
    output::commit(
        out_dir,
        &[
            (static_name.as_str(), artifacts.static_chart.as_slice()),
            ("animation.gif", artifacts.animation.as_slice()),
            ("index.html", artifacts.page.as_bytes()),
        ],
    )?;
    tracing::info!(frames = artifacts.frames, out_dir = %out_dir.display(), "pass complete");
    Ok(())
}
