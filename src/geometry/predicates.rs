// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Exact 2D geometric predicates for triangulation
//! Signs are exact (adaptive precision), magnitudes are not meaningful

use nalgebra::Point2;
use robust::Coord;

fn coord(p: &Point2<f64>) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Twice the signed area of (a, b, c)
/// Positive if counter-clockwise, negative if clockwise, zero if collinear
pub fn orient_2d(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    robust::orient2d(coord(a), coord(b), coord(c))
}

/// Positive if `d` lies strictly inside the circle through the
/// counter-clockwise triangle (a, b, c), zero if on it, negative outside
pub fn in_circle(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>, d: &Point2<f64>) -> f64 {
    robust::incircle(coord(a), coord(b), coord(c), coord(d))
}

/// True if `p` lies on segment (a, b), excluding the endpoints
pub fn on_open_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    orient_2d(a, b, p) == 0.0 && (p - a).dot(&(b - a)) > 0.0 && (p - b).dot(&(a - b)) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_signs() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert!(orient_2d(&a, &b, &Point2::new(0.0, 1.0)) > 0.0);
        assert!(orient_2d(&a, &b, &Point2::new(0.0, -1.0)) < 0.0);
        assert_eq!(orient_2d(&a, &b, &Point2::new(7.0, 0.0)), 0.0);
    }

    #[test]
    fn test_cocircular_points_are_exactly_zero() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        let c = Point2::new(2.0, 2.0);
        assert_eq!(in_circle(&a, &b, &c, &Point2::new(0.0, 2.0)), 0.0);
        assert!(in_circle(&a, &b, &c, &Point2::new(1.0, 1.0)) > 0.0);
        assert!(in_circle(&a, &b, &c, &Point2::new(5.0, 5.0)) < 0.0);
    }

    #[test]
    fn test_open_segment_excludes_endpoints() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(4.0, 2.0);
        assert!(on_open_segment(&a, &b, &Point2::new(2.0, 1.0)));
        assert!(!on_open_segment(&a, &b, &a));
        assert!(!on_open_segment(&a, &b, &Point2::new(6.0, 3.0)));
        assert!(!on_open_segment(&a, &b, &Point2::new(2.0, 1.5)));
    }
}
