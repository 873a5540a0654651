// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Append-only geometry buffer for a single edit
//!
//! A builder takes ownership of the mesh being edited and records new
//! vertices and faces separately, with indices already offset past the
//! mesh's current vertex count. Nothing is shared between builders, so
//! concurrent edits on different meshes never see each other's offsets.

use crate::error::Result;
use crate::geometry::{Mesh, Triangle, Vertex};
use nalgebra::Point3;

#[derive(Debug)]
pub struct MeshBuilder {
    mesh: Mesh,
    offset: usize,
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
}

impl MeshBuilder {
    pub fn new(mesh: Mesh) -> Self {
        let offset = mesh.vertex_count();
        Self {
            mesh,
            offset,
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// The mesh as it was before this edit
    pub fn base(&self) -> &Mesh {
        &self.mesh
    }

    /// Move existing vertices; topology of the base mesh is untouched
    pub fn base_vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.mesh.vertices
    }

    /// Index the next pushed vertex will receive
    pub fn next_index(&self) -> usize {
        self.offset + self.vertices.len()
    }

    /// Append a vertex and return its index in the finished mesh
    pub fn push_vertex(&mut self, position: Point3<f64>) -> usize {
        let index = self.next_index();
        self.vertices.push(Vertex::at(position));
        index
    }

    /// Append a face; indices are in finished-mesh space
    pub fn push_triangle(&mut self, indices: [usize; 3]) {
        self.triangles.push(Triangle::new(indices));
    }

    pub fn added_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Discard pending geometry and hand the base mesh back
    pub fn abandon(self) -> Mesh {
        self.mesh
    }

    /// Append the pending geometry and check every face index
    pub fn finish(self) -> Result<Mesh> {
        let Self {
            mut mesh,
            vertices,
            triangles,
            ..
        } = self;
        mesh.vertices.extend(vertices);
        mesh.triangles.extend(triangles);
        mesh.validate_indices()?;
        mesh.recompute_normals();
        Ok(mesh)
    }
}
