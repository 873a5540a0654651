// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Structural edits on the back plate
//!
//! Every edit consumes the mesh it is given and returns a new one; no stage
//! keeps state between calls.

pub mod builder;
pub mod gap_fill;
pub mod pipeline;
pub mod recess;

pub use builder::MeshBuilder;
pub use gap_fill::{fill_planar_gap, locate_gap, GRID_SPACING};
pub use pipeline::{apply_modifications, back_plate_z_range, Modifications, Stage};
pub use recess::{add_annular_recess, RingSpec, WallFacing, NUM_SEGMENTS};
