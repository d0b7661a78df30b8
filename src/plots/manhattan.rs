// ==============================================================================
// manhattan.rs - Manhattan Plot
// ==============================================================================
// Description: -log10(p) against concatenated genome index, two alternating
//              chromosome colors, genome-wide and suggestive threshold lines
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Layout:
//   1. Keep records with a positive p-value
//   2. Stable sort by (chromosome order, BP)
//   3. Index 0..n along the x-axis (not base-pair coordinates)
//   4. Group consecutive records on the same chromosome; colors alternate per
//      group and each group gets one tick at (first + last) / 2
// ==============================================================================

use anyhow::{bail, Context, Result};
use plotters::chart::SeriesLabelPosition;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use std::path::Path;
use tracing::{debug, info};

use super::{dashed_segments, font_px, marker_radius, FigureSize, PRIMARY_COLOR, SECONDARY_COLOR};
use crate::models::{ChromosomeKey, TopHit, GENOME_WIDE_THRESHOLD, SUGGESTIVE_THRESHOLD};
use crate::parsers::assoc::sort_by_p_value;
use crate::parsers::{AssocParseError, AssocParser, AssocTable, ScoredRecord};
use crate::stats::minus_log10;

/// Number of variants returned to the caller
pub const TOP_HIT_COUNT: usize = 10;

/// One plotted variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManhattanPoint {
    /// Position along the concatenated genome axis
    pub index: usize,
    pub minus_log10_p: f64,
    /// Index into `ManhattanLayout::groups`
    pub group: usize,
}

/// Run of consecutive points on one chromosome
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeGroup {
    /// Chromosome code as written in the input
    pub label: String,
    pub first: usize,
    pub last: usize,
}

impl ChromosomeGroup {
    pub fn midpoint(&self) -> f64 {
        (self.first + self.last) as f64 / 2.0
    }
}

/// Color for the n-th chromosome group
pub fn group_color(group: usize) -> RGBColor {
    if group % 2 == 0 {
        PRIMARY_COLOR
    } else {
        SECONDARY_COLOR
    }
}

/// Points, chromosome groups and top hits ready for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct ManhattanLayout {
    pub points: Vec<ManhattanPoint>,
    pub groups: Vec<ChromosomeGroup>,
    /// Smallest p-values, ascending (ties in input order)
    pub top_hits: Vec<TopHit>,
}

struct Located<'a> {
    key: ChromosomeKey,
    position: u64,
    scored: ScoredRecord<'a>,
}

impl ManhattanLayout {
    /// Build the layout from a parsed association table
    ///
    /// Requires `CHR`, `SNP` and `BP` columns; a non-integer BP on a kept
    /// record is an error.
    pub fn from_table(table: &AssocTable) -> Result<Self, AssocParseError> {
        let chr_col = table.require_column("CHR")?;
        let snp_col = table.require_column("SNP")?;
        let bp_col = table.require_column("BP")?;

        let cleaned = table.cleaned();

        let mut ranked = cleaned.clone();
        sort_by_p_value(&mut ranked);
        let top_hits = ranked
            .iter()
            .take(TOP_HIT_COUNT)
            .map(|scored| {
                Ok(TopHit {
                    chromosome: scored.record.field(chr_col).to_string(),
                    snp: scored.record.field(snp_col).to_string(),
                    position: table.position(scored.record, bp_col)?,
                    p_value: scored.p_value,
                })
            })
            .collect::<Result<Vec<_>, AssocParseError>>()?;

        let mut located = cleaned
            .into_iter()
            .map(|scored| {
                Ok(Located {
                    key: ChromosomeKey::from_code(scored.record.field(chr_col)),
                    position: table.position(scored.record, bp_col)?,
                    scored,
                })
            })
            .collect::<Result<Vec<_>, AssocParseError>>()?;

        located.sort_by(|a, b| a.key.cmp(&b.key).then(a.position.cmp(&b.position)));

        let mut points = Vec::with_capacity(located.len());
        let mut groups: Vec<ChromosomeGroup> = Vec::new();
        let mut current: Option<&ChromosomeKey> = None;

        for (index, item) in located.iter().enumerate() {
            if current == Some(&item.key) {
                if let Some(group) = groups.last_mut() {
                    group.last = index;
                }
            } else {
                groups.push(ChromosomeGroup {
                    label: item.scored.record.field(chr_col).to_string(),
                    first: index,
                    last: index,
                });
                current = Some(&item.key);
            }

            points.push(ManhattanPoint {
                index,
                minus_log10_p: minus_log10(item.scored.p_value),
                group: groups.len() - 1,
            });
        }

        debug!(
            "Manhattan layout: {} points across {} chromosome groups",
            points.len(),
            groups.len()
        );

        Ok(Self {
            points,
            groups,
            top_hits,
        })
    }

    /// (x position, label) per chromosome group
    pub fn ticks(&self) -> Vec<(f64, &str)> {
        self.groups
            .iter()
            .map(|g| (g.midpoint(), g.label.as_str()))
            .collect()
    }

    pub fn max_minus_log10(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.minus_log10_p)
            .fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Parse an association file, draw its Manhattan plot and return the top hits
pub fn render(assoc: &Path, output: &Path, title: &str, dpi: u32) -> Result<Vec<TopHit>> {
    info!("Creating Manhattan plot from {:?}", assoc);

    let table = AssocParser::default()
        .parse(assoc)
        .with_context(|| format!("Failed to read association file {:?}", assoc))?;
    let layout = ManhattanLayout::from_table(&table)
        .with_context(|| format!("Failed to lay out {:?}", assoc))?;

    if layout.is_empty() {
        bail!("No variants with a valid p-value in {:?}", assoc);
    }

    draw(&layout, output, title, dpi)
        .with_context(|| format!("Failed to draw Manhattan plot {:?}", output))?;

    info!("Manhattan plot saved to: {:?}", output);
    Ok(layout.top_hits)
}

fn draw(layout: &ManhattanLayout, output: &Path, title: &str, dpi: u32) -> Result<()> {
    let (width, height) = FigureSize::MANHATTAN.pixels(dpi);
    let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_min = -0.5;
    let x_max = layout.points.len() as f64 - 0.5;
    let y_max = layout
        .max_minus_log10()
        .max(minus_log10(GENOME_WIDE_THRESHOLD))
        * 1.05;

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
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Chromosome")
        .y_desc("-log10(P-value)")
        .axis_desc_style(("sans-serif", font_px(12.0, dpi)))
        .label_style(("sans-serif", font_px(9.0, dpi)))
        .x_labels(0)
        .draw()?;

    // Chromosome labels sit under the x-axis at each group midpoint
    let label_style = ("sans-serif", font_px(9.0, dpi))
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    let label_offset = font_px(4.0, dpi) as i32;
    for (x, label) in layout.ticks() {
        let (px, py) = chart.backend_coord(&(x, 0.0));
        root.draw(&Text::new(
            label.to_string(),
            (px, py + label_offset),
            label_style.clone(),
        ))?;
    }

    let radius = marker_radius(5.0, dpi);
    chart.draw_series(layout.points.iter().map(|p| {
        Circle::new(
            (p.index as f64, p.minus_log10_p),
            radius,
            group_color(p.group).mix(0.6).filled(),
        )
    }))?;

    let line_width = font_px(1.0, dpi);
    let dash = (x_max - x_min) / 150.0;
    let legend_len = font_px(20.0, dpi) as i32;

    for (threshold, color, label) in [
        (GENOME_WIDE_THRESHOLD, RED, "p=5e-8"),
        (SUGGESTIVE_THRESHOLD, BLUE, "p=1e-5"),
    ] {
        let y = minus_log10(threshold);
        let style = color.stroke_width(line_width);

        chart
            .draw_series(
                dashed_segments(x_min, x_max, dash, dash * 0.6)
                    .into_iter()
                    .map(move |(x0, x1)| PathElement::new(vec![(x0, y), (x1, y)], style)),
            )?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], style));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(("sans-serif", font_px(10.0, dpi)))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
