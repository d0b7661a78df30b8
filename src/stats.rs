// ==============================================================================
// stats.rs - GWAS Summary Statistics
// ==============================================================================
// Description: -log10 transforms, Q-Q quantiles, genomic inflation factor and
//              histogram binning used by the plot renderers
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Genomic control:
//   lambda = median(chi2_obs) / median(chi2_null)
//   chi2_obs for a 1 d.f. test with p-value p is the (1 - p) quantile of
//   chi-square(1), i.e. Phi^-1(p / 2)^2. The null median is Phi^-1(0.25)^2
//   (about 0.4549).
// ==============================================================================

use anyhow::{bail, Context, Result};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

/// -log10(p)
pub fn minus_log10(p: f64) -> f64 {
    -p.log10()
}

/// Median with midpoint interpolation for even lengths
///
/// Returns `None` for an empty slice. NaN values are ordered last.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Expected -log10 quantiles of n uniform p-values: -log10(i / (n + 1)), i = 1..=n
pub fn expected_quantiles(n: usize) -> Vec<f64> {
    let denom = (n + 1) as f64;
    (1..=n).map(|i| minus_log10(i as f64 / denom)).collect()
}

/// How the genomic inflation factor is estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LambdaMethod {
    /// Median observed 1 d.f. chi-square over its null median
    #[default]
    #[value(name = "median-chisq")]
    MedianChiSquare,
    /// Median of squared scaled normal draws over the median p-value
    Resampled,
}

/// Genomic control settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenomicControl {
    pub method: LambdaMethod,
    /// Seed for `LambdaMethod::Resampled`; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl GenomicControl {
    pub fn new(method: LambdaMethod, seed: Option<u64>) -> Self {
        Self { method, seed }
    }

    /// Estimate lambda for a set of valid (0 < p <= 1) p-values
    ///
    /// An empty input yields 1.0. A value outside (0, 1] is an error.
    pub fn lambda(&self, p_values: &[f64]) -> Result<f64> {
        if p_values.is_empty() {
            return Ok(1.0);
        }

        if let Some(bad) = p_values.iter().copied().find(|p| !(*p > 0.0 && *p <= 1.0)) {
            bail!("P-value {} is outside (0, 1]", bad);
        }

        let normal = Normal::new(0.0, 1.0).context("standard normal distribution")?;

        let lambda = match self.method {
            LambdaMethod::MedianChiSquare => {
                let chisq: Vec<f64> = p_values
                    .iter()
                    .map(|&p| {
                        let z = normal.inverse_cdf(p / 2.0);
                        z * z
                    })
                    .collect();
                let null_median = normal.inverse_cdf(0.25).powi(2);

                match median(&chisq) {
                    Some(observed) => observed / null_median,
                    None => 1.0,
                }
            }
            LambdaMethod::Resampled => {
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };

                let draws: Vec<f64> = (0..p_values.len())
                    .map(|_| {
                        let z: f64 = normal.sample(&mut rng);
                        (std::f64::consts::SQRT_2 * z.abs()).powi(2)
                    })
                    .collect();

                let median_p = median(p_values).unwrap_or(0.0);
                if median_p > 0.0 {
                    median(&draws).unwrap_or(0.0) / median_p
                } else {
                    1.0
                }
            }
        };

        debug!("Genomic inflation ({:?}) over {} p-values: {:.4}", self.method, p_values.len(), lambda);
        Ok(lambda)
    }
}

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` values
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin values into `bins` equal-width bins spanning [min, max]
    ///
    /// The last bin is closed on the right. A degenerate range (all values
    /// equal) is widened to [v - 0.5, v + 0.5]; an empty input spans [0, 1].
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        if values.is_empty() {
            lo = 0.0;
            hi = 1.0;
        } else if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + i as f64 * width).collect();
        edges.push(hi);

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self { edges, counts }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// (left edge, right edge, count) per bin
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }
}
