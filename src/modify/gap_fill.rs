// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Planar gap fill
//!
//! Closes a rectangular opening in the back plate by laying a Delaunay
//! triangulation over the footprint. Boundary vertices already on the plane
//! are kept fixed, a regular grid supplies the interior, and the result is
//! appended to the mesh. Existing faces are never removed here; overlap with
//! the original plate is cleaned up by the repair pipeline.

use super::builder::MeshBuilder;
use crate::error::{ModifyError, Result};
use crate::geometry::{
    delaunay, plane_height_mask, quantize, BoundaryRegion, BoundingBox, Footprint, Mesh,
    DEDUP_RESOLUTION, PLANE_TOLERANCE,
};
use crate::repair;
use ahash::AHashSet;
use nalgebra::{Point2, Point3};

/// Spacing of generated interior points (mm)
pub const GRID_SPACING: f64 = 2.0;

/// Band above `z_min` searched when deriving a default footprint (mm)
pub const GAP_SEARCH_BAND: f64 = 2.0;

/// Default footprint size relative to the bottom bounding box
pub const GAP_SCALE: f64 = 0.6;

/// Upper bound on generated interior points
pub const MAX_GRID_POINTS: usize = 1 << 20;

/// Slack on footprint edges so rim vertices on the boundary are kept
const FOOTPRINT_EPSILON: f64 = 1e-6;

/// Derive the default gap region from the bottom of the mesh.
///
/// Takes the bounding box of every vertex at most [`GAP_SEARCH_BAND`] above the
/// lowest Z and shrinks it to [`GAP_SCALE`] about its centre. Returns `None`
/// for an empty mesh or a bottom with no XY extent.
pub fn locate_gap(mesh: &Mesh) -> Option<BoundaryRegion> {
    let z_plane = mesh.z_min()?;
    let bbox = BoundingBox::from_points(
        mesh.vertices
            .iter()
            .map(|v| &v.position)
            .filter(|p| p.z <= z_plane + GAP_SEARCH_BAND),
    );
    if bbox.is_empty() {
        return None;
    }

    let footprint = Footprint::from_bbox(&bbox).scaled(GAP_SCALE);
    if footprint.is_empty() {
        return None;
    }
    Some(BoundaryRegion { z_plane, footprint })
}

/// Number of values `start, start + step, ...` strictly below `stop`
fn step_count(start: f64, stop: f64, step: f64) -> usize {
    ((stop - start) / step).ceil().max(0.0) as usize
}

fn arange(start: f64, count: usize, step: f64) -> impl Iterator<Item = f64> {
    (0..count).map(move |k| start + k as f64 * step)
}

/// Regular grid over the footprint, row by row along X.
///
/// The upper X and Y edges are excluded; boundary vertices cover them.
/// Fails with [`ModifyError::Degenerate`] for an empty or unbounded
/// footprint, a non-positive spacing, or more than [`MAX_GRID_POINTS`]
/// points.
pub fn grid_points(footprint: &Footprint, spacing: f64) -> Result<Vec<Point2<f64>>> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(ModifyError::degenerate(format!(
            "grid spacing must be positive, got {}",
            spacing
        )));
    }
    if footprint.is_empty() {
        return Err(ModifyError::degenerate(format!(
            "gap footprint has no finite area: {:?}",
            footprint
        )));
    }

    let nx = step_count(footprint.x_min, footprint.x_max, spacing);
    let ny = step_count(footprint.y_min, footprint.y_max, spacing);
    match nx.checked_mul(ny) {
        Some(total) if total <= MAX_GRID_POINTS => {}
        _ => {
            return Err(ModifyError::degenerate(format!(
                "gap footprint {:.1} x {:.1} mm needs more than {} grid points",
                footprint.width(),
                footprint.height(),
                MAX_GRID_POINTS
            )))
        }
    }

    let xs: Vec<f64> = arange(footprint.x_min, nx, spacing).collect();
    Ok(arange(footprint.y_min, ny, spacing)
        .flat_map(|y| xs.iter().map(move |&x| Point2::new(x, y)))
        .collect())
}

/// Keep the first point of each 0.01 mm cell, in input order
fn dedup_points(points: impl IntoIterator<Item = Point3<f64>>) -> Vec<Point3<f64>> {
    let mut seen = AHashSet::new();
    points
        .into_iter()
        .filter(|p| seen.insert(quantize(p, DEDUP_RESOLUTION)))
        .collect()
}

/// Append the infill for `region` to the builder
fn add_infill(builder: &mut MeshBuilder, region: &BoundaryRegion) -> Result<()> {
    let base = builder.base();
    let on_plane = plane_height_mask(&base.vertices, region.z_plane, PLANE_TOLERANCE);
    let boundary: Vec<Point3<f64>> = on_plane
        .into_iter()
        .map(|i| *base.position(i))
        .filter(|p| region.footprint.contains(p, FOOTPRINT_EPSILON))
        .collect();
    if boundary.is_empty() {
        return Err(ModifyError::degenerate(
            "no back-plane vertices inside the gap footprint",
        ));
    }

    let interior = grid_points(&region.footprint, GRID_SPACING)?
        .into_iter()
        .map(|p| Point3::new(p.x, p.y, region.z_plane));
    let points = dedup_points(boundary.iter().copied().chain(interior));

    let projected: Vec<Point2<f64>> = points.iter().map(|p| p.xy()).collect();
    let triangles = delaunay::triangulate(&projected)?;

    let indices: Vec<usize> = points.iter().map(|&p| builder.push_vertex(p)).collect();
    for [a, b, c] in triangles {
        // Triangulation is counter-clockwise; the back plate faces -Z
        builder.push_triangle([indices[a], indices[c], indices[b]]);
    }

    tracing::debug!(
        boundary = boundary.len(),
        points = points.len(),
        faces = builder.added_triangles(),
        "gap infill triangulated"
    );
    Ok(())
}

/// Fill a planar opening on the back plate.
///
/// `footprint` defaults to [`locate_gap`]. The plane is the mesh's lowest Z.
/// Degenerate input (nothing on the plane inside the footprint, too few
/// points, collinear points) leaves the mesh untouched.
pub fn fill_planar_gap(mesh: Mesh, footprint: Option<Footprint>) -> Result<Mesh> {
    let Some(z_plane) = mesh.z_min() else {
        tracing::debug!("gap fill skipped: empty mesh");
        return Ok(mesh);
    };
    let footprint = match footprint.or_else(|| locate_gap(&mesh).map(|r| r.footprint)) {
        Some(footprint) => footprint,
        None => {
            tracing::debug!("gap fill skipped: no footprint on the back plane");
            return Ok(mesh);
        }
    };
    let region = BoundaryRegion { z_plane, footprint };

    let mut builder = MeshBuilder::new(mesh);
    match add_infill(&mut builder, &region) {
        Ok(()) => {}
        Err(err) if err.is_recoverable() => {
            tracing::debug!(%err, "gap fill skipped");
            return Ok(builder.abandon());
        }
        Err(err) => return Err(err),
    }

    let mesh = builder.finish()?;
    repair::repair(mesh)
}
