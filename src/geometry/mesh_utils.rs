// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh validation utilities: edge sharing, boundaries and holes

use super::Mesh;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Undirected edge between two vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub v0: usize,
    pub v1: usize,
}

impl Edge {
    pub fn new(v0: usize, v1: usize) -> Self {
        // Always store edges with smaller index first for consistent hashing
        if v0 < v1 {
            Self { v0, v1 }
        } else {
            Self { v0: v1, v1: v0 }
        }
    }
}

/// Build edge count map for a mesh
pub fn build_edge_counts(mesh: &Mesh) -> AHashMap<Edge, u32> {
    let mut edge_counts: AHashMap<Edge, u32> = AHashMap::new();

    for triangle in &mesh.triangles {
        let [a, b, c] = triangle.indices;
        for edge in [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)] {
            *edge_counts.entry(edge).or_insert(0) += 1;
        }
    }

    edge_counts
}

/// Check if mesh is closed (each edge shared by exactly 2 triangles)
pub fn is_closed(mesh: &Mesh) -> bool {
    !mesh.triangles.is_empty() && build_edge_counts(mesh).values().all(|&count| count == 2)
}

/// Boundary edges (shared by exactly 1 triangle), sorted
pub fn find_boundary_edges(mesh: &Mesh) -> Vec<Edge> {
    let mut boundary: Vec<Edge> = build_edge_counts(mesh)
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(edge, _)| edge)
        .collect();
    boundary.sort_unstable();
    boundary
}

/// Number of connected chains of boundary edges.
///
/// For a shell with simple openings this equals the number of holes.
pub fn count_boundary_loops(mesh: &Mesh) -> usize {
    let boundary = find_boundary_edges(mesh);
    if boundary.is_empty() {
        return 0;
    }

    let mut parent: Vec<usize> = (0..mesh.vertices.len()).collect();
    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    for edge in &boundary {
        let (ra, rb) = (find(&mut parent, edge.v0), find(&mut parent, edge.v1));
        if ra != rb {
            parent[ra.max(rb)] = ra.min(rb);
        }
    }

    let mut roots: Vec<usize> = boundary
        .iter()
        .map(|edge| find(&mut parent, edge.v0))
        .collect();
    roots.sort_unstable();
    roots.dedup();
    roots.len()
}

/// Outcome of comparing detected holes against the expected count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleCheck {
    pub found: usize,
    pub expected: usize,
}

impl HoleCheck {
    pub fn matches(&self) -> bool {
        self.found == self.expected
    }
}

/// Count boundary loops and compare with `expected`
pub fn verify_hole_count(mesh: &Mesh, expected: usize) -> HoleCheck {
    HoleCheck {
        found: count_boundary_loops(mesh),
        expected,
    }
}

/// Edge-level topology summary, shown by `backplate info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshValidation {
    pub is_manifold: bool,
    pub is_closed: bool,
    pub edge_count: usize,
    pub boundary_edge_count: usize,
    pub boundary_loops: usize,
}

/// Count edge uses once and summarize manifoldness and openings
pub fn validate_mesh(mesh: &Mesh) -> MeshValidation {
    let edge_counts = build_edge_counts(mesh);

    let boundary_edges = edge_counts.values().filter(|&&count| count == 1).count();

    MeshValidation {
        is_manifold: edge_counts.values().all(|&count| count <= 2),
        is_closed: !edge_counts.is_empty() && edge_counts.values().all(|&count| count == 2),
        edge_count: edge_counts.len(),
        boundary_edge_count: boundary_edges,
        boundary_loops: count_boundary_loops(mesh),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Footprint, Primitive};

    #[test]
    fn test_slab_is_closed() {
        let mesh = Primitive::slab(10.0, 8.0, 3.0, 2.0).to_mesh();
        assert!(is_closed(&mesh));
        assert_eq!(count_boundary_loops(&mesh), 0);

        let validation = validate_mesh(&mesh);
        assert!(validation.is_manifold);
        assert!(validation.is_closed);
        assert_eq!(validation.boundary_edge_count, 0);
        // Euler on a closed triangulated surface: 3F = 2E
        assert_eq!(2 * validation.edge_count, 3 * mesh.triangle_count());
    }

    #[test]
    fn test_plate_has_one_boundary_loop() {
        let mesh = Primitive::plate(10.0, 10.0, 2.0).to_mesh();
        assert!(!is_closed(&mesh));
        assert_eq!(count_boundary_loops(&mesh), 1);
    }

    #[test]
    fn test_window_counts_as_hole() {
        let window = Footprint::new(4.0, 8.0, 4.0, 8.0);
        let mesh = Primitive::slab_with_window(12.0, 12.0, 3.0, 2.0, window).to_mesh();
        let validation = validate_mesh(&mesh);

        assert!(validation.is_manifold);
        assert!(!validation.is_closed);
        assert_eq!(validation.boundary_loops, 1);
        assert_eq!(validation.boundary_edge_count, 8);

        let check = verify_hole_count(&mesh, 1);
        assert!(check.matches());
        assert!(!verify_hole_count(&mesh, 7).matches());
    }
}
