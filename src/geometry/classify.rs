// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex classification by plane height and radial position
//!
//! All thresholds are absolute millimetres. Classifications are recomputed
//! from current coordinates on every call; indices shift after any topology
//! change, so nothing here is cached.

use super::{Mesh, Vertex};
use nalgebra::{Point2, Point3};

/// Half-width of the band around a plane that counts as "on" the plane
pub const PLANE_TOLERANCE: f64 = 0.5;

/// Cell size for canonical vertex deduplication (two decimals)
pub const DEDUP_RESOLUTION: f64 = 0.01;

/// Indices of vertices whose Z lies strictly within `tolerance` of `z`
pub fn plane_height_mask(vertices: &[Vertex], z: f64, tolerance: f64) -> Vec<usize> {
    vertices
        .iter()
        .enumerate()
        .filter(|(_, v)| (v.position.z - z).abs() < tolerance)
        .map(|(i, _)| i)
        .collect()
}

/// Distance from `center` in the XY plane; Z is ignored
pub fn radial_distance(position: &Point3<f64>, center: &Point2<f64>) -> f64 {
    (position.xy() - center).norm()
}

/// Region a vertex falls into relative to an annulus on the back plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexRegion {
    /// On the back plane, `d <= inner_radius`
    InnerDisc,
    /// On the back plane, `inner_radius < d <= outer_radius`
    RingBand,
    /// On the back plane, outside the outer radius
    BackSurface,
    /// Off the back plane
    Unaffected,
}

/// Disjoint partition of vertex indices around an annulus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexClassification {
    pub inner_disc: Vec<usize>,
    pub ring_band: Vec<usize>,
    pub back_surface: Vec<usize>,
    pub unaffected: Vec<usize>,
}

impl VertexClassification {
    /// Partition `mesh` vertices around an annulus centred on `center`,
    /// using the plane band at `z_plane`.
    pub fn classify(
        mesh: &Mesh,
        z_plane: f64,
        center: &Point2<f64>,
        inner_radius: f64,
        outer_radius: f64,
    ) -> Self {
        let mut classification = Self::default();
        for (index, vertex) in mesh.vertices.iter().enumerate() {
            let region = region_of(&vertex.position, z_plane, center, inner_radius, outer_radius);
            match region {
                VertexRegion::InnerDisc => classification.inner_disc.push(index),
                VertexRegion::RingBand => classification.ring_band.push(index),
                VertexRegion::BackSurface => classification.back_surface.push(index),
                VertexRegion::Unaffected => classification.unaffected.push(index),
            }
        }
        classification
    }

    /// Number of vertices detected on the back plane
    pub fn plane_count(&self) -> usize {
        self.inner_disc.len() + self.ring_band.len() + self.back_surface.len()
    }
}

/// Region of a single position
pub fn region_of(
    position: &Point3<f64>,
    z_plane: f64,
    center: &Point2<f64>,
    inner_radius: f64,
    outer_radius: f64,
) -> VertexRegion {
    if (position.z - z_plane).abs() >= PLANE_TOLERANCE {
        return VertexRegion::Unaffected;
    }
    let d = radial_distance(position, center);
    if d <= inner_radius {
        VertexRegion::InnerDisc
    } else if d <= outer_radius {
        VertexRegion::RingBand
    } else {
        VertexRegion::BackSurface
    }
}
