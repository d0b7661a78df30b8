// ==============================================================================
// pca.rs - PCA Scatter Plots
// ==============================================================================
// Description: Side-by-side PC1 vs PC2 and PC2 vs PC3 panels
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use anyhow::{bail, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontStyle;
use std::path::Path;
use tracing::info;

use super::{font_px, marker_radius, padded_range, FigureSize, PRIMARY_COLOR};
use crate::parsers::{EigenvecParser, PcaRecord};

/// One scatter panel
#[derive(Debug, Clone, PartialEq)]
pub struct PcaPanel {
    pub title: &'static str,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    pub points: Vec<(f64, f64)>,
}

impl PcaPanel {
    /// Padded axis ranges covering every point
    pub fn ranges(&self) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
        let (x_lo, x_hi, y_lo, y_hi) = self.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(x_lo, x_hi, y_lo, y_hi), &(x, y)| (x_lo.min(x), x_hi.max(x), y_lo.min(y), y_hi.max(y)),
        );
        (padded_range(x_lo, x_hi, 0.05), padded_range(y_lo, y_hi, 0.05))
    }
}

/// PC1 vs PC2 and PC2 vs PC3 panels
pub fn panels(records: &[PcaRecord]) -> [PcaPanel; 2] {
    [
        PcaPanel {
            title: "PC1 vs PC2",
            x_desc: "PC1",
            y_desc: "PC2",
            points: records.iter().map(|r| (r.pc1, r.pc2)).collect(),
        },
        PcaPanel {
            title: "PC2 vs PC3",
            x_desc: "PC2",
            y_desc: "PC3",
            points: records.iter().map(|r| (r.pc2, r.pc3)).collect(),
        },
    ]
}

pub fn render(eigenvec: &Path, output: &Path, dpi: u32) -> Result<()> {
    info!("Creating PCA plot from {:?}", eigenvec);

    let records = EigenvecParser::parse(eigenvec)
        .with_context(|| format!("Failed to read eigenvector file {:?}", eigenvec))?;

    if records.is_empty() {
        bail!("No individuals in {:?}", eigenvec);
    }

    let (width, height) = FigureSize::PCA.pixels(dpi);
    let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((1, 2));
    for (area, panel) in areas.iter().zip(panels(&records).iter()) {
        draw_panel(area, panel, dpi)
            .with_context(|| format!("Failed to draw panel '{}'", panel.title))?;
    }

    root.present()
        .with_context(|| format!("Failed to write PCA plot {:?}", output))?;

    info!("PCA plot saved to: {:?}", output);
    Ok(())
}

fn draw_panel(area: &DrawingArea<BitMapBackend<'_>, Shift>, panel: &PcaPanel, dpi: u32) -> Result<()> {
    let (x_range, y_range) = panel.ranges();

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
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_desc)
        .y_desc(panel.y_desc)
        .axis_desc_style(("sans-serif", font_px(11.0, dpi)))
        .label_style(("sans-serif", font_px(9.0, dpi)))
        .draw()?;

    let radius = marker_radius(20.0, dpi);
    chart.draw_series(
        panel
            .points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), radius, PRIMARY_COLOR.mix(0.6).filled())),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pc1: f64, pc2: f64, pc3: f64) -> PcaRecord {
        PcaRecord {
            family_id: "F".to_string(),
            individual_id: "I".to_string(),
            pc1,
            pc2,
            pc3,
        }
    }

    #[test]
    fn test_panels_use_expected_components() {
        let records = vec![record(0.1, 0.2, 0.3), record(-0.1, -0.2, -0.3)];
        let [first, second] = panels(&records);

        assert_eq!(first.title, "PC1 vs PC2");
        assert_eq!(first.points, vec![(0.1, 0.2), (-0.1, -0.2)]);
        assert_eq!(second.title, "PC2 vs PC3");
        assert_eq!(second.points, vec![(0.2, 0.3), (-0.2, -0.3)]);
    }

    #[test]
    fn test_panel_ranges_cover_points() {
        let records = vec![record(0.0, -1.0, 5.0), record(2.0, 1.0, 5.0)];
        let [first, second] = panels(&records);

        let (x, y) = first.ranges();
        assert!(x.start < 0.0 && x.end > 2.0);
        assert!(y.start < -1.0 && y.end > 1.0);

        // Constant PC3 still yields a usable axis
        let (_, y) = second.ranges();
        assert_eq!(y, 4.5..5.5);
    }

    #[test]
    fn test_render_rejects_narrow_table() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("narrow.eigenvec");
        std::fs::write(&input, "F1 I1 0.1 0.2\n").unwrap();

        assert!(render(&input, &dir.path().join("pca.png"), 72).is_err());
    }
}
