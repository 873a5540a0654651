// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Content digest of a mesh

use crate::geometry::Mesh;
use sha2::{Digest, Sha256};

/// SHA-256 over vertex coordinates and face indices, as lowercase hex.
///
/// Vertex normals are not included. Two meshes share a digest only when
/// their vertex order, coordinates and faces are bit-identical.
pub fn mesh_digest(mesh: &Mesh) -> String {
    let mut hasher = Sha256::new();
    hasher.update((mesh.vertex_count() as u64).to_le_bytes());
    for v in &mesh.vertices {
        for c in [v.position.x, v.position.y, v.position.z] {
            hasher.update(c.to_le_bytes());
        }
    }
    hasher.update((mesh.triangle_count() as u64).to_le_bytes());
    for t in &mesh.triangles {
        for i in t.indices {
            hasher.update((i as u64).to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}
