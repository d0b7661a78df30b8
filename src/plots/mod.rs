// ==============================================================================
// plots/mod.rs - GWAS Diagnostic Plot Renderers
// ==============================================================================
// Description: Manhattan, Q-Q, PCA and missingness PNG renderers
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Figure sizes are given in inches and rasterised at the configured dpi.
// Font sizes are given in points (1 pt = dpi / 72 pixels).
// ==============================================================================

pub mod manhattan;
pub mod missingness;
pub mod pca;
pub mod qq;

use anyhow::Result;
use plotters::style::RGBColor;
use std::path::Path;

use crate::models::TopHit;
use crate::stats::GenomicControl;

/// Matplotlib default blue
pub const PRIMARY_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);

/// Matplotlib default orange
pub const SECONDARY_COLOR: RGBColor = RGBColor(0xff, 0x7f, 0x0e);

/// Figure dimensions in inches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl FigureSize {
    pub const MANHATTAN: FigureSize = FigureSize::new(16.0, 6.0);
    pub const QQ: FigureSize = FigureSize::new(8.0, 8.0);
    pub const PCA: FigureSize = FigureSize::new(14.0, 6.0);
    pub const MISSINGNESS: FigureSize = FigureSize::new(14.0, 5.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel dimensions at a given resolution
    pub fn pixels(&self, dpi: u32) -> (u32, u32) {
        let dpi = f64::from(dpi);
        (
            (self.width * dpi).round() as u32,
            (self.height * dpi).round() as u32,
        )
    }
}

/// Point size to pixels
pub fn font_px(points: f64, dpi: u32) -> u32 {
    (points * f64::from(dpi) / 72.0).round().max(1.0) as u32
}

/// Marker radius in pixels for a marker area given in pt^2
pub fn marker_radius(area_pt2: f64, dpi: u32) -> u32 {
    (area_pt2.sqrt() / 2.0 * f64::from(dpi) / 72.0).round().max(1.0) as u32
}

/// Split [start, end] into dash segments of length `dash` separated by `gap`
///
/// The last dash is clipped at `end`. An empty or inverted span yields no segments.
pub fn dashed_segments(start: f64, end: f64, dash: f64, gap: f64) -> Vec<(f64, f64)> {
    let mut segments = Vec::new();
    if end <= start || dash <= 0.0 {
        return segments;
    }

    let step = dash + gap.max(0.0);
    let mut x = start;
    while x < end {
        segments.push((x, (x + dash).min(end)));
        x += step;
    }
    segments
}

/// Range padded by `fraction` of its span on each side
///
/// A degenerate span is widened by 0.5 on each side.
pub fn padded_range(min: f64, max: f64, fraction: f64) -> std::ops::Range<f64> {
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if max <= min {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = (max - min) * fraction;
    (min - pad)..(max + pad)
}

/// Renders the four plot families
///
/// The orchestrator talks to this trait so runs can be exercised without
/// rasterising images.
pub trait PlotRenderer {
    /// Manhattan plot; returns the 10 most significant variants
    fn manhattan(&self, assoc: &Path, output: &Path, title: &str) -> Result<Vec<TopHit>>;

    /// Q-Q plot; returns the genomic inflation factor
    fn qq(&self, assoc: &Path, output: &Path, title: &str) -> Result<f64>;

    fn pca(&self, eigenvec: &Path, output: &Path) -> Result<()>;

    fn missingness(&self, lmiss: &Path, imiss: &Path, output: &Path) -> Result<()>;
}

/// PNG renderer backed by plotters' bitmap backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PngRenderer {
    pub dpi: u32,
    pub genomic_control: GenomicControl,
}

impl PngRenderer {
    pub fn new(dpi: u32, genomic_control: GenomicControl) -> Self {
        Self {
            dpi,
            genomic_control,
        }
    }
}

impl PlotRenderer for PngRenderer {
    fn manhattan(&self, assoc: &Path, output: &Path, title: &str) -> Result<Vec<TopHit>> {
        manhattan::render(assoc, output, title, self.dpi)
    }

    fn qq(&self, assoc: &Path, output: &Path, title: &str) -> Result<f64> {
        qq::render(assoc, output, title, self.dpi, &self.genomic_control)
    }

    fn pca(&self, eigenvec: &Path, output: &Path) -> Result<()> {
        pca::render(eigenvec, output, self.dpi)
    }

    fn missingness(&self, lmiss: &Path, imiss: &Path, output: &Path) -> Result<()> {
        missingness::render(lmiss, imiss, output, self.dpi)
    }
}
