// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and operations

mod analytics;
mod bbox;
pub mod classify;
pub mod delaunay;
mod footprint;
mod mesh;
pub mod mesh_utils;
pub mod predicates;
mod primitives;

pub use analytics::{analyze, signed_volume, surface_area, GeometryStats};
pub use bbox::BoundingBox;
pub use classify::{
    plane_height_mask, radial_distance, VertexClassification, VertexRegion, DEDUP_RESOLUTION,
    PLANE_TOLERANCE,
};
pub use footprint::{BoundaryRegion, Footprint};
pub(crate) use mesh::quantize;
pub use mesh::{Mesh, Triangle, Vertex};
pub use mesh_utils::{
    count_boundary_loops, validate_mesh, verify_hole_count, HoleCheck, MeshValidation,
};
pub use primitives::Primitive;
