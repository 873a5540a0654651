// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Modification orchestrator
//!
//! Runs the requested edits in a fixed order: gap fill, then recess, then a
//! global normal fix. The recess centre defaults to the bounding box of the
//! mesh it receives, so it must see the already-filled plate.

use super::gap_fill::fill_planar_gap;
use super::recess::{add_annular_recess, RingSpec};
use crate::error::{ModifyError, Result};
use crate::geometry::{plane_height_mask, Mesh};
use crate::repair::fix_normals;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Band above the lowest Z reported by the back-plate sanity read (mm)
pub const BACK_PLATE_BAND: f64 = 0.1;

/// Which edits to apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifications {
    /// Close the battery opening in the back plate
    pub remove_gap: bool,
    /// Carve the magnetic-ring recess
    pub add_recess: bool,
}

impl Modifications {
    pub fn all() -> Self {
        Self {
            remove_gap: true,
            add_recess: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.remove_gap && !self.add_recess
    }

    /// Parse a comma-separated list such as `no-battery-cover,magsafe`.
    ///
    /// Names are case-insensitive. Unknown names are logged and ignored.
    pub fn parse(list: &str) -> Self {
        let mut mods = Self::default();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name.to_ascii_lowercase().as_str() {
                "no-battery-cover" | "no-battery" => mods.remove_gap = true,
                "magsafe" => mods.add_recess = true,
                other => tracing::warn!(modification = other, "unknown modification ignored"),
            }
        }
        mods
    }
}

impl fmt::Display for Modifications {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.remove_gap {
            names.push("no-battery-cover");
        }
        if self.add_recess {
            names.push("magsafe");
        }
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(","))
        }
    }
}

/// Pipeline states, in the only order they can be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    GapFilled,
    Recessed,
    NormalsFixed,
}

fn enter(stage: Stage, mesh: &Mesh) {
    tracing::info!(
        ?stage,
        vertices = mesh.vertex_count(),
        faces = mesh.triangle_count(),
        "stage complete"
    );
}

/// Z range of the vertices within [`BACK_PLATE_BAND`] of the lowest Z
pub fn back_plate_z_range(mesh: &Mesh) -> Option<(f64, f64)> {
    let z_min = mesh.z_min()?;
    plane_height_mask(&mesh.vertices, z_min, BACK_PLATE_BAND)
        .into_iter()
        .map(|i| mesh.position(i).z)
        .fold(None, |range, z| match range {
            None => Some((z, z)),
            Some((lo, hi)) => Some((f64::min(lo, z), f64::max(hi, z))),
        })
}

/// Apply the requested edits.
///
/// `ring` is required when `mods.add_recess` is set and ignored otherwise.
/// With no edits requested the mesh is returned as is.
pub fn apply_modifications(
    mesh: Mesh,
    mods: Modifications,
    ring: Option<&RingSpec>,
) -> Result<Mesh> {
    if mods.is_empty() {
        tracing::info!("no modifications requested");
        return Ok(mesh);
    }
    let ring = match (mods.add_recess, ring) {
        (true, Some(ring)) => {
            ring.validate()?;
            Some(ring)
        }
        (true, None) => return Err(ModifyError::MissingRing),
        (false, _) => None,
    };

    let mut mesh = mesh;
    enter(Stage::Start, &mesh);

    if mods.remove_gap {
        mesh = fill_planar_gap(mesh, None)?;
        enter(Stage::GapFilled, &mesh);
    }

    if let Some(ring) = ring {
        mesh = add_annular_recess(mesh, ring)?;
        enter(Stage::Recessed, &mesh);
    }

    let flipped = fix_normals(&mut mesh)?;
    mesh.recompute_normals();
    tracing::debug!(flipped, "final normal fix");
    enter(Stage::NormalsFixed, &mesh);

    if let Some((lo, hi)) = back_plate_z_range(&mesh) {
        tracing::info!("back plate Z range: {:.2} to {:.2}", lo, hi);
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;

    #[test]
    fn test_parse_modifications() {
        assert_eq!(Modifications::parse("no-battery-cover,magsafe"), Modifications::all());
        assert_eq!(
            Modifications::parse(" No-Battery , bogus "),
            Modifications {
                remove_gap: true,
                add_recess: false
            }
        );
        assert!(Modifications::parse("").is_empty());
        assert_eq!(Modifications::parse("magsafe").to_string(), "magsafe");
        assert_eq!(Modifications::default().to_string(), "none");
    }

    #[test]
    fn test_stage_order() {
        assert!(Stage::Start < Stage::GapFilled);
        assert!(Stage::GapFilled < Stage::Recessed);
        assert!(Stage::Recessed < Stage::NormalsFixed);
    }

    #[test]
    fn test_recess_without_ring_fails() {
        let mesh = Primitive::slab(10.0, 10.0, 2.0, 2.0).to_mesh();
        let mods = Modifications {
            remove_gap: false,
            add_recess: true,
        };
        assert!(matches!(
            apply_modifications(mesh, mods, None),
            Err(ModifyError::MissingRing)
        ));
    }

    #[test]
    fn test_ring_ignored_without_recess() {
        let mesh = Primitive::slab(10.0, 10.0, 2.0, 2.0).to_mesh();
        let bogus = RingSpec {
            center: None,
            outer_radius: 1.0,
            inner_radius: 2.0,
            depth: 1.0,
        };
        let out = apply_modifications(mesh.clone(), Modifications::default(), Some(&bogus)).unwrap();
        assert_eq!(out, mesh);
    }

    #[test]
    fn test_back_plate_z_range() {
        let mesh = Primitive::slab(10.0, 10.0, 2.0, 2.0).to_mesh();
        assert_eq!(back_plate_z_range(&mesh), Some((0.0, 0.0)));
        assert_eq!(back_plate_z_range(&Mesh::new()), None);
    }
}
