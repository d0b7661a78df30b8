// ==============================================================================
// qq.rs - Q-Q Plot
// ==============================================================================
// Description: Observed vs expected -log10(p) under the uniform null, with the
//              genomic inflation factor in the title
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use anyhow::{bail, Context, Result};
use plotters::chart::SeriesLabelPosition;
use plotters::prelude::*;
use plotters::style::FontStyle;
use std::path::Path;
use tracing::info;

use super::{dashed_segments, font_px, marker_radius, FigureSize, PRIMARY_COLOR};
use crate::parsers::AssocParser;
use crate::stats::{expected_quantiles, minus_log10, GenomicControl};

/// Rank-paired quantiles
///
/// `expected[i]` is -log10((i + 1) / (n + 1)) and `observed[i]` is -log10 of
/// the (i + 1)-th smallest p-value, so both series descend together.
// Observed is not sorted ascending against a descending expected series; that
// pairing mirrors the cloud across the diagonal. Rank order keeps the smallest
// p on the largest expected quantile.
#[derive(Debug, Clone, PartialEq)]
pub struct QqPoints {
    pub expected: Vec<f64>,
    pub observed: Vec<f64>,
}

impl QqPoints {
    /// Build from valid (0 < p <= 1) p-values in any order
    pub fn from_p_values(p_values: &[f64]) -> Self {
        let mut sorted = p_values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Self {
            expected: expected_quantiles(sorted.len()),
            observed: sorted.into_iter().map(minus_log10).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Upper end of the identity line: the larger of both maxima
    pub fn max_value(&self) -> f64 {
        self.expected
            .iter()
            .chain(self.observed.iter())
            .copied()
            .fold(0.0, f64::max)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.expected.iter().copied().zip(self.observed.iter().copied())
    }
}

/// Plot title with lambda to three decimals
pub fn title_with_lambda(title: &str, lambda: f64) -> String {
    format!("{} (λ = {:.3})", title, lambda)
}

/// Parse an association file, draw its Q-Q plot and return lambda
pub fn render(
    assoc: &Path,
    output: &Path,
    title: &str,
    dpi: u32,
    genomic_control: &GenomicControl,
) -> Result<f64> {
    info!("Creating Q-Q plot from {:?}", assoc);

    let table = AssocParser::default()
        .parse(assoc)
        .with_context(|| format!("Failed to read association file {:?}", assoc))?;
    let p_values: Vec<f64> = table.cleaned().iter().map(|r| r.p_value).collect();

    if p_values.is_empty() {
        bail!("No variants with a valid p-value in {:?}", assoc);
    }

    let points = QqPoints::from_p_values(&p_values);
    let lambda = genomic_control.lambda(&p_values)?;

    draw(&points, output, &title_with_lambda(title, lambda), dpi)
        .with_context(|| format!("Failed to draw Q-Q plot {:?}", output))?;

    info!("Q-Q plot saved to: {:?}", output);
    Ok(lambda)
}

fn draw(points: &QqPoints, output: &Path, title: &str, dpi: u32) -> Result<()> {
    let (width, height) = FigureSize::QQ.pixels(dpi);
    let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_value = points.max_value();
    let axis_max = (max_value * 1.05).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            title,
            ("sans-serif", font_px(14.0, dpi))
                .into_font()
                .style(FontStyle::Bold),
        )
        .margin(font_px(8.0, dpi))
        .x_label_area_size(font_px(30.0, dpi))
        .y_label_area_size(font_px(40.0, dpi))
        .build_cartesian_2d(0.0..axis_max, 0.0..axis_max)?;

    chart
        .configure_mesh()
        .x_desc("Expected -log10(P-value)")
        .y_desc("Observed -log10(P-value)")
        .axis_desc_style(("sans-serif", font_px(12.0, dpi)))
        .label_style(("sans-serif", font_px(10.0, dpi)))
        .draw()?;

    let radius = marker_radius(10.0, dpi);
    chart.draw_series(
        points
            .pairs()
            .map(|(x, y)| Circle::new((x, y), radius, PRIMARY_COLOR.mix(0.6).filled())),
    )?;

    let style = RED.stroke_width(font_px(2.0, dpi));
    let dash = max_value / 60.0;
    let legend_len = font_px(20.0, dpi) as i32;

    chart
        .draw_series(
            dashed_segments(0.0, max_value, dash, dash * 0.6)
                .into_iter()
                .map(move |(a, b)| PathElement::new(vec![(a, a), (b, b)], style)),
        )?
        .label("Expected")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], style));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(("sans-serif", font_px(10.0, dpi)))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
