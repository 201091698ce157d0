//! Host page that presents both artifacts of a pass.

use std::fmt::{self, Write as _};

use growth_model_core::{Aggregates, ParameterName, Parameters};

/// Heading shown at the top of the page.
pub(crate) const PAGE_TITLE: &str = "Growth Model: Δ(t) and G(t) with Animation";
/// Heading shown above the embedded animation.
pub(crate) const ANIMATION_HEADING: &str = "Animated Growth Progression";

/// Assembles a self-contained HTML page.
///
/// `static_chart` and `animation` are already-embeddable markup fragments.
pub(crate) fn compose_page(
    parameters: &Parameters,
    aggregates: &Aggregates,
    static_chart: &str,
    animation: &str,
) -> Result<String, fmt::Error> {
    let mut rows = String::new();
    compose_rows(&mut rows, parameters, aggregates)?;

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<title>{PAGE_TITLE}</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; margin: 1rem 0; }}
th, td {{ padding: 0.2rem 0.8rem; text-align: left; border-bottom: 1px solid #ddd; }}
</style>
</head>
<body>
<h1>{PAGE_TITLE}</h1>
<section class="static-chart">
{static_chart}
</section>
<table class="parameters">
{rows}</table>
<h3>{ANIMATION_HEADING}</h3>
{animation}
</body>
</html>
"#
    ))
}

/// One table row per parameter followed by the aggregates `I`, `M` and `F`.
fn compose_rows(out: &mut String, parameters: &Parameters, aggregates: &Aggregates) -> fmt::Result {
    for name in ParameterName::ALL {
        writeln!(
            out,
            "<tr><th>{}</th><td>{}</td></tr>",
            name.label(),
            parameters.value(name)
        )?;
    }
    writeln!(out, "<tr><th>I</th><td>{:.2}</td></tr>", aggregates.investment)?;
    writeln!(out, "<tr><th>M</th><td>{:.4}</td></tr>", aggregates.multiplier)?;
    writeln!(out, "<tr><th>F</th><td>{:.2}</td></tr>", aggregates.friction)
}
