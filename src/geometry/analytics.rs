// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry analytics and statistics

use super::{mesh_utils, Mesh};
use serde::{Deserialize, Serialize};

/// Geometry statistics and analytics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Enclosed volume in cubic millimetres (absolute value)
    pub volume: f64,
    /// Signed volume; negative when the winding points inward
    pub signed_volume: f64,
    /// Total surface area in square millimetres
    pub surface_area: f64,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bbox: [f64; 6],
    /// Extent along each axis
    pub size: [f64; 3],
    /// Mean vertex position [x, y, z]
    pub centroid: [f64; 3],
    /// Number of vertices
    pub vertex_count: usize,
    /// Number of triangles
    pub triangle_count: usize,
    /// Every edge shared by exactly two triangles
    pub is_watertight: bool,
}

impl GeometryStats {
    /// Create empty stats
    pub fn empty() -> Self {
        Self {
            volume: 0.0,
            signed_volume: 0.0,
            surface_area: 0.0,
            bbox: [0.0; 6],
            size: [0.0; 3],
            centroid: [0.0; 3],
            vertex_count: 0,
            triangle_count: 0,
            is_watertight: false,
        }
    }
}

/// Analyze mesh geometry and compute statistics
pub fn analyze(mesh: &Mesh) -> GeometryStats {
    let vertex_count = mesh.vertices.len();
    let triangle_count = mesh.triangles.len();

    if vertex_count == 0 || triangle_count == 0 {
        return GeometryStats {
            vertex_count,
            triangle_count,
            ..GeometryStats::empty()
        };
    }

    let bbox = mesh.bounding_box();
    let size = bbox.size();
    let signed_volume = signed_volume(mesh);

    GeometryStats {
        volume: signed_volume.abs(),
        signed_volume,
        surface_area: surface_area(mesh),
        bbox: [
            bbox.min.x, bbox.min.y, bbox.min.z, bbox.max.x, bbox.max.y, bbox.max.z,
        ],
        size: [size.x, size.y, size.z],
        centroid: calculate_centroid(mesh),
        vertex_count,
        triangle_count,
        is_watertight: mesh_utils::is_closed(mesh),
    }
}

/// Sum of signed tetrahedron volumes against the origin
pub fn signed_volume(mesh: &Mesh) -> f64 {
    mesh.triangles
        .iter()
        .map(|triangle| {
            let [i0, i1, i2] = triangle.indices;
            let v0 = &mesh.position(i0).coords;
            let v1 = &mesh.position(i1).coords;
            let v2 = &mesh.position(i2).coords;
            v0.dot(&v1.cross(v2)) / 6.0
        })
        .sum()
}

/// Calculate total surface area
pub fn surface_area(mesh: &Mesh) -> f64 {
    mesh.triangles.iter().map(|t| mesh.face_area(t)).sum()
}

/// Calculate centroid (mean of vertex positions)
fn calculate_centroid(mesh: &Mesh) -> [f64; 3] {
    let sum = mesh
        .vertices
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, v| acc + v.position.coords);
    let mean = sum / mesh.vertices.len() as f64;
    [mean.x, mean.y, mean.z]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;

    #[test]
    fn test_analyze_slab() {
        let mesh = Primitive::slab(10.0, 10.0, 10.0, 5.0).to_mesh();
        let stats = analyze(&mesh);

        assert!((stats.volume - 1000.0).abs() < 1e-6);
        assert!((stats.surface_area - 600.0).abs() < 1e-6);
        // 2x2 cells top and bottom, two cells along each side wall
        assert_eq!(stats.triangle_count, 2 * 8 + 4 * 4);
        assert_eq!(stats.size, [10.0, 10.0, 10.0]);
        assert!(stats.is_watertight);
        assert!((stats.centroid[0] - 5.0).abs() < 0.1);
    }

    #[test]
    fn test_inverted_slab_has_negative_volume() {
        let mut mesh = Primitive::slab(4.0, 4.0, 4.0, 2.0).to_mesh();
        for t in &mut mesh.triangles {
            *t = t.flipped();
        }
        assert!(analyze(&mesh).signed_volume < 0.0);
    }

    #[test]
    fn test_empty_mesh() {
        let stats = analyze(&Mesh::new());
        assert_eq!(stats.vertex_count, 0);
        assert!(!stats.is_watertight);
    }
}
