// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Rectangular footprints on the back plane

use super::BoundingBox;
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in the XY plane where an edit applies.
///
/// Openings are assumed rectangular. A non-rectangular opening must be
/// described by a rectangle that covers it; the infill then spans the whole
/// rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Footprint {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// XY extent of a bounding box
    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self::new(bbox.min.x, bbox.max.x, bbox.min.y, bbox.max.y)
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Same centre, width and height multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        let c = self.center();
        let half_w = self.width() * factor / 2.0;
        let half_h = self.height() * factor / 2.0;
        Self::new(c.x - half_w, c.x + half_w, c.y - half_h, c.y + half_h)
    }

    /// Inclusive containment test in XY, widened by `epsilon`
    pub fn contains(&self, position: &Point3<f64>, epsilon: f64) -> bool {
        position.x >= self.x_min - epsilon
            && position.x <= self.x_max + epsilon
            && position.y >= self.y_min - epsilon
            && position.y <= self.y_max + epsilon
    }

    pub fn is_finite(&self) -> bool {
        [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite())
    }

    /// No positive area, or not bounded
    pub fn is_empty(&self) -> bool {
        !(self.is_finite() && self.width() > 0.0 && self.height() > 0.0)
    }
}

/// A footprint together with the plane height it lives on.
///
/// Derived per call from current vertex positions; never stored on the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRegion {
    pub z_plane: f64,
    pub footprint: Footprint,
}
