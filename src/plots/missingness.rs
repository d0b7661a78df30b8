// ==============================================================================
// missingness.rs - Missingness Histograms
// ==============================================================================
// Description: Per-variant and per-individual F_MISS histograms with the 2%
//              call-rate threshold marked
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use plotters::chart::SeriesLabelPosition;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontStyle;
use std::path::Path;
use tracing::{debug, info};

use super::{dashed_segments, font_px, FigureSize, PRIMARY_COLOR};
use crate::models::MISSINGNESS_THRESHOLD;
use crate::parsers::MissingnessParser;
use crate::stats::Histogram;

/// Bins per histogram
pub const HISTOGRAM_BINS: usize = 50;

/// One histogram panel
#[derive(Debug, Clone, PartialEq)]
pub struct MissingnessPanel {
    pub title: &'static str,
    pub x_desc: &'static str,
    pub histogram: Histogram,
}

impl MissingnessPanel {
    pub fn new(title: &'static str, x_desc: &'static str, rates: &[f64]) -> Self {
        Self {
            title,
            x_desc,
            histogram: Histogram::new(rates, HISTOGRAM_BINS),
        }
    }

    /// X range spanning every bin and the threshold line
    pub fn x_range(&self) -> std::ops::Range<f64> {
        let first = self.histogram.edges.first().copied().unwrap_or(0.0);
        let last = self.histogram.edges.last().copied().unwrap_or(1.0);
        let lo = first.min(MISSINGNESS_THRESHOLD);
        let hi = last.max(MISSINGNESS_THRESHOLD);
        let pad = (hi - lo) * 0.02;
        (lo - pad)..(hi + pad)
    }

    /// Y range with headroom above the tallest bar
    pub fn y_max(&self) -> f64 {
        (self.histogram.max_count() as f64 * 1.05).max(1.0)
    }
}

pub fn render(lmiss: &Path, imiss: &Path, output: &Path, dpi: u32) -> Result<()> {
    info!("Creating missingness plots");

    let variant_rates = MissingnessParser::parse(lmiss)
        .with_context(|| format!("Failed to read variant missingness {:?}", lmiss))?;
    let individual_rates = MissingnessParser::parse(imiss)
        .with_context(|| format!("Failed to read individual missingness {:?}", imiss))?;

    debug!(
        "Missingness rates: {} variants, {} individuals",
        variant_rates.len(),
        individual_rates.len()
    );

    let panels = [
        MissingnessPanel::new(
            "SNP Missingness Distribution",
            "SNP Missingness Rate",
            &variant_rates,
        ),
        MissingnessPanel::new(
            "Individual Missingness Distribution",
            "Individual Missingness Rate",
            &individual_rates,
        ),
    ];

    let (width, height) = FigureSize::MISSINGNESS.pixels(dpi);
    let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((1, 2));
    for (area, panel) in areas.iter().zip(panels.iter()) {
        draw_panel(area, panel, dpi)
            .with_context(|| format!("Failed to draw panel '{}'", panel.title))?;
    }

    root.present()
        .with_context(|| format!("Failed to write missingness plots {:?}", output))?;

    info!("Missingness plots saved to: {:?}", output);
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    panel: &MissingnessPanel,
    dpi: u32,
) -> Result<()> {
    let y_max = panel.y_max();

    let mut chart = ChartBuilder::on(area)
        .caption(
            panel.title,
            ("sans-serif", font_px(12.0, dpi))
                .into_font()
                .style(FontStyle::Bold),
        )
        .margin(font_px(8.0, dpi))
        .x_label_area_size(font_px(28.0, dpi))
        .y_label_area_size(font_px(40.0, dpi))
        .build_cartesian_2d(panel.x_range(), 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_desc)
        .y_desc("Frequency")
        .axis_desc_style(("sans-serif", font_px(11.0, dpi)))
        .label_style(("sans-serif", font_px(9.0, dpi)))
        .draw()?;

    let bins: Vec<(f64, f64, usize)> = panel.histogram.bins().filter(|b| b.2 > 0).collect();

    chart.draw_series(bins.iter().map(|&(left, right, count)| {
        Rectangle::new([(left, 0.0), (right, count as f64)], PRIMARY_COLOR.mix(0.7).filled())
    }))?;
    chart.draw_series(bins.iter().map(|&(left, right, count)| {
        Rectangle::new([(left, 0.0), (right, count as f64)], BLACK.stroke_width(1))
    }))?;

    let x = MISSINGNESS_THRESHOLD;
    let style = RED.stroke_width(font_px(1.0, dpi));
    let dash = y_max / 40.0;
    let legend_len = font_px(20.0, dpi) as i32;

    chart
        .draw_series(
            dashed_segments(0.0, y_max, dash, dash * 0.6)
                .into_iter()
                .map(move |(y0, y1)| PathElement::new(vec![(x, y0), (x, y1)], style)),
        )?
        .label("Threshold=0.02")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], style));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(("sans-serif", font_px(10.0, dpi)))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}
