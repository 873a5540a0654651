// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation and utilities

use super::BoundingBox;
use crate::error::{ModifyError, Result};
use ahash::{AHashMap, AHashSet};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }

    /// Vertex with a placeholder normal, to be filled by `recompute_normals`
    pub fn at(position: Point3<f64>) -> Self {
        Self::new(position, Vector3::z())
    }
}

/// Triangle defined by three vertex indices; winding gives the outward side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }

    /// Same vertices, opposite winding
    pub fn flipped(&self) -> Self {
        Self::new([self.indices[0], self.indices[2], self.indices[1]])
    }

    /// Vertex set regardless of winding or starting vertex
    pub fn sorted_key(&self) -> [usize; 3] {
        let mut key = self.indices;
        key.sort_unstable();
        key
    }

    pub fn has_repeated_index(&self) -> bool {
        let [a, b, c] = self.indices;
        a == b || b == c || a == c
    }
}

/// Triangular mesh.
///
/// Vertex order defines identity: faces address vertices by index, so any
/// edit that drops or reorders vertices must remap every face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Build a mesh from raw positions and index triples
    pub fn from_parts(positions: &[Point3<f64>], faces: &[[usize; 3]]) -> Self {
        let mut mesh = Self::with_capacity(positions.len(), faces.len());
        for &position in positions {
            mesh.add_vertex(Vertex::at(position));
        }
        for &face in faces {
            mesh.add_triangle(Triangle::new(face));
        }
        mesh.recompute_normals();
        mesh
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_vertices(&self.vertices)
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn position(&self, index: usize) -> &Point3<f64> {
        &self.vertices[index].position
    }

    /// Minimum Z over all vertices, `None` for an empty mesh
    pub fn z_min(&self) -> Option<f64> {
        self.vertices
            .iter()
            .map(|v| v.position.z)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Fail on the first face that points past the vertex list
    pub fn validate_indices(&self) -> Result<()> {
        let vertex_count = self.vertices.len();
        for (face, triangle) in self.triangles.iter().enumerate() {
            if let Some(&index) = triangle.indices.iter().find(|&&i| i >= vertex_count) {
                return Err(ModifyError::RepairInconsistency {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Un-normalized face normal (length is twice the area)
    pub fn face_cross(&self, triangle: &Triangle) -> Vector3<f64> {
        let [i0, i1, i2] = triangle.indices;
        let v0 = self.position(i0);
        let edge1 = self.position(i1) - v0;
        let edge2 = self.position(i2) - v0;
        edge1.cross(&edge2)
    }

    /// Unit face normal, `None` for zero-area faces
    pub fn face_normal(&self, triangle: &Triangle) -> Option<Vector3<f64>> {
        self.face_cross(triangle).try_normalize(1e-12)
    }

    pub fn face_area(&self, triangle: &Triangle) -> f64 {
        self.face_cross(triangle).norm() * 0.5
    }

    /// Merge with another mesh (simple concatenation without CSG)
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);

        for triangle in &other.triangles {
            self.triangles.push(Triangle::new([
                triangle.indices[0] + offset,
                triangle.indices[1] + offset,
                triangle.indices[2] + offset,
            ]));
        }
    }

    /// Merge vertices whose coordinates round to the same grid cell.
    ///
    /// `resolution` is the cell size (0.01 rounds to two decimals). The first
    /// vertex in each cell survives with its exact position; later ones are
    /// remapped onto it. Returns the number of vertices removed.
    pub fn weld_vertices(&mut self, resolution: f64) -> Result<usize> {
        self.validate_indices()?;
        if self.vertices.is_empty() {
            return Ok(0);
        }

        let original_count = self.vertices.len();
        let mut cells: AHashMap<[i64; 3], usize> = AHashMap::with_capacity(original_count);
        let mut new_vertices: Vec<Vertex> = Vec::with_capacity(original_count);
        let mut new_indices: Vec<usize> = vec![0; original_count];

        for (i, vertex) in self.vertices.iter().enumerate() {
            let key = quantize(&vertex.position, resolution);
            let target = *cells.entry(key).or_insert_with(|| {
                new_vertices.push(*vertex);
                new_vertices.len() - 1
            });
            new_indices[i] = target;
        }

        for triangle in &mut self.triangles {
            for index in &mut triangle.indices {
                *index = new_indices[*index];
            }
        }

        self.vertices = new_vertices;
        Ok(original_count - self.vertices.len())
    }

    /// Remove faces with a repeated index or an area at or below `min_area`.
    /// Returns the number of triangles removed.
    pub fn remove_degenerate_triangles(&mut self, min_area: f64) -> Result<usize> {
        self.validate_indices()?;
        let original_count = self.triangles.len();
        let kept: Vec<Triangle> = self
            .triangles
            .iter()
            .filter(|t| !t.has_repeated_index() && self.face_area(t) > min_area)
            .copied()
            .collect();
        self.triangles = kept;
        Ok(original_count - self.triangles.len())
    }

    /// Remove triangles that share a vertex set with an earlier triangle,
    /// regardless of winding. The first occurrence is kept.
    /// Returns the number of triangles removed.
    pub fn remove_duplicate_triangles(&mut self) -> usize {
        let original_count = self.triangles.len();
        let mut seen: AHashSet<[usize; 3]> = AHashSet::with_capacity(original_count);
        self.triangles.retain(|t| seen.insert(t.sorted_key()));
        original_count - self.triangles.len()
    }

    /// Remove orphaned vertices (vertices not referenced by any triangle)
    /// Returns the number of vertices removed
    pub fn remove_orphaned_vertices(&mut self) -> Result<usize> {
        self.validate_indices()?;

        let mut used_vertices = vec![false; self.vertices.len()];
        for triangle in &self.triangles {
            for &index in &triangle.indices {
                used_vertices[index] = true;
            }
        }

        // Build remapping: old_index -> new_index
        let mut new_indices = vec![0; self.vertices.len()];
        let mut new_vertices = Vec::new();

        for (old_idx, &used) in used_vertices.iter().enumerate() {
            if used {
                new_indices[old_idx] = new_vertices.len();
                new_vertices.push(self.vertices[old_idx]);
            }
        }

        for triangle in &mut self.triangles {
            for index in &mut triangle.indices {
                *index = new_indices[*index];
            }
        }

        let removed = self.vertices.len() - new_vertices.len();
        self.vertices = new_vertices;
        Ok(removed)
    }

    /// Recompute vertex normals from triangle geometry
    /// This calculates face normals and averages them at shared vertices
    pub fn recompute_normals(&mut self) {
        if self.vertices.is_empty() || self.triangles.is_empty() {
            return;
        }

        let mut normal_sums: Vec<Vector3<f64>> = vec![Vector3::zeros(); self.vertices.len()];

        for triangle in &self.triangles {
            // Area weighted: the cross product length is twice the area
            let face_normal = self.face_cross(triangle);
            if face_normal.norm() > 1e-10 {
                for &idx in &triangle.indices {
                    normal_sums[idx] += face_normal;
                }
            }
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(normal_sums) {
            vertex.normal = sum.try_normalize(1e-12).unwrap_or_else(Vector3::z);
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Grid cell of a position at the given resolution
pub(crate) fn quantize(position: &Point3<f64>, resolution: f64) -> [i64; 3] {
    [
        (position.x / resolution).round() as i64,
        (position.y / resolution).round() as i64,
        (position.z / resolution).round() as i64,
    ]
}
