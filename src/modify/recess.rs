// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Annular recess
//!
//! Pushes the ring band of the back plate into the solid by `depth` and
//! closes the step with two vertical wall strips sampled at a fixed number
//! of segments. Wall vertices are synthesized on exact circles; they are not
//! snapped to nearby plate vertices.

use super::builder::MeshBuilder;
use crate::error::{ModifyError, Result};
use crate::geometry::{Mesh, VertexClassification};
use crate::repair;
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Segments per wall circle
pub const NUM_SEGMENTS: usize = 64;

/// Ring dimensions in millimetres, with an optional XY centre.
///
/// Without a centre the recess is placed at the XY bounding-box midpoint of
/// the mesh it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Point2<f64>>,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub depth: f64,
}

impl RingSpec {
    pub const DEFAULT_OUTER_RADIUS: f64 = 28.0;
    pub const DEFAULT_INNER_RADIUS: f64 = 22.5;
    pub const DEFAULT_DEPTH: f64 = 2.5;

    pub fn new(outer_radius: f64, inner_radius: f64, depth: f64) -> Result<Self> {
        let ring = Self {
            center: None,
            outer_radius,
            inner_radius,
            depth,
        };
        ring.validate()?;
        Ok(ring)
    }

    pub fn with_center(mut self, center: Point2<f64>) -> Self {
        self.center = Some(center);
        self
    }

    /// Check `0 < inner_radius < outer_radius` and `depth > 0`
    pub fn validate(&self) -> Result<()> {
        let finite = [self.outer_radius, self.inner_radius, self.depth]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ModifyError::InvalidRing {
                reason: "dimensions must be finite".to_string(),
            });
        }
        if self.inner_radius <= 0.0 {
            return Err(ModifyError::InvalidRing {
                reason: format!("inner radius {} must be positive", self.inner_radius),
            });
        }
        if self.inner_radius >= self.outer_radius {
            return Err(ModifyError::InvalidRing {
                reason: format!(
                    "inner radius {} must be smaller than outer radius {}",
                    self.inner_radius, self.outer_radius
                ),
            });
        }
        if self.depth <= 0.0 {
            return Err(ModifyError::InvalidRing {
                reason: format!("depth {} must be positive", self.depth),
            });
        }
        Ok(())
    }
}

impl Default for RingSpec {
    fn default() -> Self {
        Self {
            center: None,
            outer_radius: Self::DEFAULT_OUTER_RADIUS,
            inner_radius: Self::DEFAULT_INNER_RADIUS,
            depth: Self::DEFAULT_DEPTH,
        }
    }
}

/// Side of a wall strip its faces point to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallFacing {
    /// Normals point at the circle centre (outer wall of the pocket)
    TowardCenter,
    /// Normals point away from the centre (edge of the raised platform)
    AwayFromCenter,
}

/// Point on the circle at segment `i`
pub fn wall_point(center: &Point2<f64>, radius: f64, i: usize) -> Point2<f64> {
    let angle = i as f64 * (TAU / NUM_SEGMENTS as f64);
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Append a closed vertical strip between `z_bottom` and `z_top`.
///
/// Vertices go in bottom/top pairs per segment; each segment is one quad
/// split into two triangles.
pub fn ring_wall(
    builder: &mut MeshBuilder,
    center: &Point2<f64>,
    radius: f64,
    z_bottom: f64,
    z_top: f64,
    facing: WallFacing,
) {
    let first = builder.next_index();
    for i in 0..NUM_SEGMENTS {
        let p = wall_point(center, radius, i);
        builder.push_vertex(Point3::new(p.x, p.y, z_bottom));
        builder.push_vertex(Point3::new(p.x, p.y, z_top));
    }

    for i in 0..NUM_SEGMENTS {
        let next = (i + 1) % NUM_SEGMENTS;
        let bottom = first + 2 * i;
        let top = bottom + 1;
        let next_bottom = first + 2 * next;
        let next_top = next_bottom + 1;
        match facing {
            WallFacing::TowardCenter => {
                builder.push_triangle([bottom, top, next_top]);
                builder.push_triangle([bottom, next_top, next_bottom]);
            }
            WallFacing::AwayFromCenter => {
                builder.push_triangle([bottom, next_bottom, next_top]);
                builder.push_triangle([bottom, next_top, top]);
            }
        }
    }
}

/// Carve an annular recess into the back plate.
///
/// Back-plate vertices (within the plane band of the lowest Z) in the ring
/// band move up by `depth`; the inner disc and everything outside the outer
/// radius keep their position. Both walls are always generated, even when no
/// vertex lies on the back plate. The result goes through repair with the
/// normal fix.
pub fn add_annular_recess(mesh: Mesh, ring: &RingSpec) -> Result<Mesh> {
    ring.validate()?;
    let Some(z_min) = mesh.z_min() else {
        tracing::debug!("recess skipped: empty mesh");
        return Ok(mesh);
    };
    let center = ring
        .center
        .unwrap_or_else(|| mesh.bounding_box().center_xy());

    let classification = VertexClassification::classify(
        &mesh,
        z_min,
        &center,
        ring.inner_radius,
        ring.outer_radius,
    );
    if classification.plane_count() == 0 {
        tracing::debug!("no back-plane vertices, generating walls only");
    }
    tracing::debug!(
        x = center.x,
        y = center.y,
        inner_disc = classification.inner_disc.len(),
        ring_band = classification.ring_band.len(),
        "recess classification"
    );

    let mut builder = MeshBuilder::new(mesh);
    let vertices = builder.base_vertices_mut();
    for &i in &classification.ring_band {
        vertices[i].position.z += ring.depth;
    }

    let z_top = z_min + ring.depth;
    ring_wall(
        &mut builder,
        &center,
        ring.outer_radius,
        z_min,
        z_top,
        WallFacing::TowardCenter,
    );
    ring_wall(
        &mut builder,
        &center,
        ring.inner_radius,
        z_min,
        z_top,
        WallFacing::AwayFromCenter,
    );

    let mesh = builder.finish()?;
    repair::repair_with_normals(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;

    #[test]
    fn test_ring_validation() {
        assert!(RingSpec::new(28.0, 22.5, 2.5).is_ok());
        assert!(matches!(
            RingSpec::new(20.0, 22.5, 2.5),
            Err(ModifyError::InvalidRing { .. })
        ));
        assert!(RingSpec::new(28.0, 0.0, 2.5).is_err());
        assert!(RingSpec::new(28.0, 22.5, -1.0).is_err());
        assert!(RingSpec::new(f64::NAN, 22.5, 2.5).is_err());
    }

    #[test]
    fn test_default_ring() {
        let ring = RingSpec::default();
        assert_eq!(ring.center, None);
        assert_relative_eq!(ring.outer_radius, 28.0);
        assert_relative_eq!(ring.inner_radius, 22.5);
        assert_relative_eq!(ring.depth, 2.5);
    }

    #[test]
    fn test_wall_point_samples_circle() {
        let center = Point2::new(50.0, 50.0);
        assert_relative_eq!(wall_point(&center, 28.0, 0), Point2::new(78.0, 50.0));
        let quarter = wall_point(&center, 28.0, NUM_SEGMENTS / 4);
        assert_relative_eq!(quarter, Point2::new(50.0, 78.0), epsilon = 1e-12);
    }

    #[test]
    fn test_wall_facing() {
        let mut builder = MeshBuilder::new(Mesh::new());
        let center = Point2::new(0.0, 0.0);
        ring_wall(&mut builder, &center, 10.0, 0.0, 2.0, WallFacing::TowardCenter);
        ring_wall(&mut builder, &center, 5.0, 0.0, 2.0, WallFacing::AwayFromCenter);
        let mesh = builder.finish().unwrap();
        assert_eq!(mesh.vertex_count(), 4 * NUM_SEGMENTS);
        assert_eq!(mesh.triangle_count(), 4 * NUM_SEGMENTS);

        for (k, t) in mesh.triangles.iter().enumerate() {
            let normal = mesh.face_normal(t).unwrap();
            let centroid = t
                .indices
                .iter()
                .fold(nalgebra::Vector2::zeros(), |acc, &i| acc + mesh.position(i).xy().coords)
                / 3.0;
            let radial = normal.xy().dot(&centroid);
            assert!(normal.z.abs() < 1e-9);
            if k < 2 * NUM_SEGMENTS {
                assert!(radial < 0.0, "outer wall face {} points away from centre", k);
            } else {
                assert!(radial > 0.0, "inner wall face {} points at centre", k);
            }
        }
    }

    #[test]
    fn test_walls_generated_without_back_plane_vertices() {
        let slab = Primitive::slab(10.0, 10.0, 4.0, 2.0).to_mesh();
        let ring = RingSpec::default().with_center(Point2::new(500.0, 500.0));
        let out = add_annular_recess(slab.clone(), &ring).unwrap();

        assert_eq!(out.triangle_count(), slab.triangle_count() + 4 * NUM_SEGMENTS);
        for (a, b) in slab.vertices.iter().zip(&out.vertices) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn test_invalid_ring_rejected_before_editing() {
        let slab = Primitive::slab(10.0, 10.0, 4.0, 2.0).to_mesh();
        let ring = RingSpec {
            center: None,
            outer_radius: 5.0,
            inner_radius: 6.0,
            depth: 1.0,
        };
        assert!(matches!(
            add_annular_recess(slab, &ring),
            Err(ModifyError::InvalidRing { .. })
        ));
    }

    #[test]
    fn test_ring_spec_json() {
        let ring = RingSpec::default().with_center(Point2::new(1.0, 2.0));
        let json = serde_json::to_string(&ring).unwrap();
        assert_eq!(serde_json::from_str::<RingSpec>(&json).unwrap(), ring);

        let no_center: RingSpec =
            serde_json::from_str(r#"{"outer_radius":28.0,"inner_radius":22.5,"depth":2.5}"#).unwrap();
        assert_eq!(no_center, RingSpec::default());
    }
}
