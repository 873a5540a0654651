// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Backplate
//!
//! Deterministic back-plate edits for printable case shells: closing the
//! battery-cover opening with a planar infill, and pressing an annular
//! MagSafe recess into the back plate. Both edits are followed by mesh
//! repair so the output stays printable.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod measure;
pub mod modify;
pub mod render;
pub mod repair;

pub use error::{ModifyError, Result};
pub use geometry::{BoundaryRegion, Footprint, Mesh, Primitive, Triangle, Vertex};
pub use io::{export_stl, import_stl, mesh_digest};
pub use measure::{FixedDefaults, HistogramMeasurer, RingMeasurer};
pub use modify::{
    add_annular_recess, apply_modifications, fill_planar_gap, Modifications, RingSpec,
};
pub use repair::{fix_normals, repair, repair_with_normals, RepairPipeline, RepairSummary};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_modifications_accepts_any_mesh() {
        let slab = Primitive::slab(60.0, 60.0, 4.0, 4.0).to_mesh();
        let result = apply_modifications(slab, Modifications::default(), None);
        assert!(result.is_ok());
    }
}
