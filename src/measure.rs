// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Ring measurement strategies
//!
//! A measurer turns a reference mesh into ring dimensions. The centre is
//! never taken from the reference: the recess is placed on the case it is
//! applied to.

use crate::geometry::{radial_distance, Mesh};
use crate::modify::RingSpec;

/// Number of histogram bins over the radial distances
pub const HISTOGRAM_BINS: usize = 50;

/// Bins with a count above this percentile are peaks
pub const PEAK_PERCENTILE: f64 = 75.0;

/// Inner radius as a fraction of the detected outer radius
pub const INNER_RATIO: f64 = 0.65;

/// Upper bound on a measured depth (mm)
pub const MAX_DEPTH: f64 = 3.0;

/// Derives ring dimensions from a mesh
pub trait RingMeasurer {
    fn measure_ring(&self, mesh: &Mesh) -> RingSpec;
}

/// Ignores the mesh and returns fixed dimensions
#[derive(Debug, Clone, Copy)]
pub struct FixedDefaults {
    pub ring: RingSpec,
}

impl Default for FixedDefaults {
    fn default() -> Self {
        Self {
            ring: RingSpec::default(),
        }
    }
}

impl RingMeasurer for FixedDefaults {
    fn measure_ring(&self, _mesh: &Mesh) -> RingSpec {
        self.ring
    }
}

/// Histogram-peak radius detection.
///
/// Radial XY distances from the reference's bounding-box centre are binned;
/// the last bin whose count exceeds the 75th percentile of bin counts gives
/// the outer radius. Ties between bins are resolved by taking the outermost.
#[derive(Debug, Clone, Copy)]
pub struct HistogramMeasurer {
    /// Returned when no peak is found
    pub fallback: RingSpec,
}

impl HistogramMeasurer {
    pub const FALLBACK_INNER_RADIUS: f64 = 18.0;
}

impl Default for HistogramMeasurer {
    fn default() -> Self {
        Self {
            fallback: RingSpec {
                center: None,
                outer_radius: RingSpec::DEFAULT_OUTER_RADIUS,
                inner_radius: Self::FALLBACK_INNER_RADIUS,
                depth: RingSpec::DEFAULT_DEPTH,
            },
        }
    }
}

impl RingMeasurer for HistogramMeasurer {
    fn measure_ring(&self, mesh: &Mesh) -> RingSpec {
        if mesh.is_empty() {
            tracing::warn!("reference mesh is empty, using fallback ring");
            return self.fallback;
        }

        let bbox = mesh.bounding_box();
        let center = bbox.center_xy();
        let distances: Vec<f64> = mesh
            .vertices
            .iter()
            .map(|v| radial_distance(&v.position, &center))
            .collect();

        let (counts, edges) = histogram(&distances, HISTOGRAM_BINS);
        let threshold = percentile(&counts, PEAK_PERCENTILE);
        let Some(peak) = counts.iter().rposition(|&c| c as f64 > threshold) else {
            tracing::warn!("no radial peak in reference mesh, using fallback ring");
            return self.fallback;
        };

        let outer_radius = (edges[peak] + edges[peak + 1]) / 2.0;
        let depth = bbox.size().z.min(MAX_DEPTH);
        let ring = RingSpec {
            center: None,
            outer_radius,
            inner_radius: outer_radius * INNER_RATIO,
            depth,
        };
        if let Err(err) = ring.validate() {
            tracing::warn!(%err, "measured ring is unusable, using fallback ring");
            return self.fallback;
        }
        tracing::debug!(outer_radius, inner = ring.inner_radius, depth, "ring measured");
        ring
    }
}

/// Equal-width histogram over the data range; the last bin includes its
/// upper edge. A zero-width range is widened by 0.5 on each side.
fn histogram(values: &[f64], bins: usize) -> (Vec<usize>, Vec<f64>) {
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|k| lo + k as f64 * width).collect();
    let mut counts = vec![0usize; bins];
    for &v in values {
        let bin = (((v - lo) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    (counts, edges)
}

/// Percentile with linear interpolation between closest ranks
fn percentile(counts: &[usize], q: f64) -> f64 {
    let mut sorted: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    let frac = rank - below as f64;
    sorted[below] + (sorted[above] - sorted[below]) * frac
}
