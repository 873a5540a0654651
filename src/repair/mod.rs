// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh repair pipeline
//!
//! A fixed, ordered list of mesh-to-mesh stages applied after every
//! structural edit: merge vertices, drop degenerate faces, drop duplicate
//! faces, prune unreferenced vertices and, for generated walls, fix normals.
//! Running the pipeline twice gives the same mesh as running it once.

mod normals;

pub use normals::fix_normals;

use crate::error::Result;
use crate::geometry::{Mesh, DEDUP_RESOLUTION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Faces with an area at or below this are degenerate (mm²)
pub const DEGENERATE_AREA: f64 = 1e-10;

/// One step of the repair pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairStage {
    MergeVertices,
    RemoveDegenerate,
    RemoveDuplicates,
    RemoveUnreferenced,
    FixNormals,
}

impl RepairStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStage::MergeVertices => "merge-vertices",
            RepairStage::RemoveDegenerate => "remove-degenerate",
            RepairStage::RemoveDuplicates => "remove-duplicates",
            RepairStage::RemoveUnreferenced => "remove-unreferenced",
            RepairStage::FixNormals => "fix-normals",
        }
    }

    /// Consume a mesh and return the repaired mesh with the number of
    /// elements this stage changed
    pub fn apply(self, mut mesh: Mesh) -> Result<(Mesh, usize)> {
        let changed = match self {
            RepairStage::MergeVertices => mesh.weld_vertices(DEDUP_RESOLUTION)?,
            RepairStage::RemoveDegenerate => mesh.remove_degenerate_triangles(DEGENERATE_AREA)?,
            RepairStage::RemoveDuplicates => {
                mesh.validate_indices()?;
                mesh.remove_duplicate_triangles()
            }
            RepairStage::RemoveUnreferenced => mesh.remove_orphaned_vertices()?,
            RepairStage::FixNormals => fix_normals(&mut mesh)?,
        };
        Ok((mesh, changed))
    }
}

/// Ordered list of repair stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairPipeline {
    stages: Vec<RepairStage>,
}

impl RepairPipeline {
    /// Merge, degenerate, duplicate and unreferenced cleanup
    pub fn standard() -> Self {
        Self {
            stages: vec![
                RepairStage::MergeVertices,
                RepairStage::RemoveDegenerate,
                RepairStage::RemoveDuplicates,
                RepairStage::RemoveUnreferenced,
            ],
        }
    }

    /// Standard cleanup followed by a global normal fix
    pub fn with_normal_fix() -> Self {
        let mut pipeline = Self::standard();
        pipeline.stages.push(RepairStage::FixNormals);
        pipeline
    }

    pub fn stages(&self) -> &[RepairStage] {
        &self.stages
    }

    pub fn run(&self, mesh: Mesh) -> Result<(Mesh, RepairSummary)> {
        let mut summary = RepairSummary {
            initial_vertices: mesh.vertex_count(),
            initial_faces: mesh.triangle_count(),
            ..RepairSummary::default()
        };

        let mut mesh = mesh;
        for &stage in &self.stages {
            let (repaired, changed) = stage.apply(mesh)?;
            mesh = repaired;
            match stage {
                RepairStage::MergeVertices => summary.vertices_merged = changed,
                RepairStage::RemoveDegenerate => summary.degenerate_removed = changed,
                RepairStage::RemoveDuplicates => summary.duplicates_removed = changed,
                RepairStage::RemoveUnreferenced => summary.unreferenced_removed = changed,
                RepairStage::FixNormals => summary.faces_flipped = changed,
            }
        }

        summary.final_vertices = mesh.vertex_count();
        summary.final_faces = mesh.triangle_count();
        tracing::debug!(%summary, "repair finished");
        Ok((mesh, summary))
    }
}

/// Run the standard pipeline
pub fn repair(mesh: Mesh) -> Result<Mesh> {
    RepairPipeline::standard().run(mesh).map(|(mesh, _)| mesh)
}

/// Run the standard pipeline plus the normal fix
pub fn repair_with_normals(mesh: Mesh) -> Result<Mesh> {
    RepairPipeline::with_normal_fix().run(mesh).map(|(mesh, _)| mesh)
}

/// Counts collected by a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairSummary {
    pub initial_vertices: usize,
    pub initial_faces: usize,
    pub final_vertices: usize,
    pub final_faces: usize,
    pub vertices_merged: usize,
    pub degenerate_removed: usize,
    pub duplicates_removed: usize,
    pub unreferenced_removed: usize,
    pub faces_flipped: usize,
}

impl RepairSummary {
    pub fn had_changes(&self) -> bool {
        self.vertices_merged > 0
            || self.degenerate_removed > 0
            || self.duplicates_removed > 0
            || self.unreferenced_removed > 0
            || self.faces_flipped > 0
    }
}

impl fmt::Display for RepairSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} verts ({} merged, {} unreferenced), {} faces ({} degenerate, {} duplicate, {} flipped)",
            self.final_vertices,
            self.vertices_merged,
            self.unreferenced_removed,
            self.final_faces,
            self.degenerate_removed,
            self.duplicates_removed,
            self.faces_flipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModifyError;
    use crate::geometry::{Primitive, Triangle, Vertex};
    use nalgebra::Point3;

    fn messy_plate() -> Mesh {
        let mut mesh = Primitive::plate(6.0, 6.0, 2.0).to_mesh();
        let copy = mesh.clone();
        // Second copy of every vertex, nudged below the dedup resolution
        let offset = mesh.vertex_count();
        for v in &copy.vertices {
            mesh.add_vertex(Vertex::at(v.position + nalgebra::Vector3::new(0.001, 0.0, 0.0)));
        }
        for t in &copy.triangles {
            let [a, b, c] = t.indices;
            mesh.add_triangle(Triangle::new([a + offset, c + offset, b + offset]));
        }
        mesh.add_triangle(Triangle::new([0, 0, 1]));
        mesh.add_vertex(Vertex::at(Point3::new(50.0, 50.0, 50.0)));
        mesh
    }

    #[test]
    fn test_stage_order_is_fixed() {
        assert_eq!(
            RepairPipeline::with_normal_fix().stages(),
            &[
                RepairStage::MergeVertices,
                RepairStage::RemoveDegenerate,
                RepairStage::RemoveDuplicates,
                RepairStage::RemoveUnreferenced,
                RepairStage::FixNormals,
            ]
        );
    }

    #[test]
    fn test_standard_cleanup_counts() {
        let plate = Primitive::plate(6.0, 6.0, 2.0).to_mesh();
        let (mesh, summary) = RepairPipeline::standard().run(messy_plate()).unwrap();

        assert_eq!(summary.vertices_merged, plate.vertex_count());
        assert_eq!(summary.degenerate_removed, 1);
        assert_eq!(summary.duplicates_removed, plate.triangle_count());
        assert_eq!(summary.unreferenced_removed, 1);
        assert_eq!(mesh.vertex_count(), plate.vertex_count());
        assert_eq!(mesh.triangle_count(), plate.triangle_count());
        assert!(summary.had_changes());
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let pipeline = RepairPipeline::with_normal_fix();
        let (once, _) = pipeline.run(messy_plate()).unwrap();
        let (twice, summary) = pipeline.run(once.clone()).unwrap();
        assert_eq!(once, twice);
        assert!(!summary.had_changes());
    }

    #[test]
    fn test_bad_index_is_fatal() {
        let mut mesh = Primitive::plate(4.0, 4.0, 2.0).to_mesh();
        mesh.add_triangle(Triangle::new([0, 1, 999]));
        for stage in RepairPipeline::with_normal_fix().stages() {
            let err = stage.apply(mesh.clone()).unwrap_err();
            assert!(matches!(err, ModifyError::RepairInconsistency { index: 999, .. }));
        }
    }
}
