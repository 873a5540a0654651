// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! 2D Delaunay triangulation (Bowyer-Watson)
//!
//! The triangulation starts from one non-degenerate triangle of the input and
//! closes the convex hull with ghost cells: each hull edge carries a cell
//! whose third vertex is a symbolic point at infinity. A ghost cell's
//! circumcircle is the open half-plane outside its edge, so the output always
//! covers the full convex hull. Ties on cocircular input (regular grids) are
//! broken by insertion order, so the output depends only on the point
//! sequence.

use super::predicates::{in_circle, on_open_segment, orient_2d};
use crate::error::{ModifyError, Result};
use nalgebra::Point2;

/// Minimum number of points we attempt to triangulate
pub const MIN_POINTS: usize = 4;

/// Vertex index of the point at infinity
const GHOST: usize = usize::MAX;

/// Counter-clockwise vertex triple. A ghost cell is `[u, v, GHOST]`, with the
/// outside of the hull to the left of `u -> v`.
type Cell = [usize; 3];

/// Triangulate `points`, returning counter-clockwise index triples into it.
///
/// Exact duplicates of an earlier point are skipped. Fails with
/// [`ModifyError::Degenerate`] for fewer than [`MIN_POINTS`] points or when
/// every point is collinear.
pub fn triangulate(points: &[Point2<f64>]) -> Result<Vec<[usize; 3]>> {
    if points.len() < MIN_POINTS {
        return Err(ModifyError::degenerate(format!(
            "need at least {} points to triangulate, got {}",
            MIN_POINTS,
            points.len()
        )));
    }

    let seed = seed_triangle(points)
        .ok_or_else(|| ModifyError::degenerate("all points are collinear"))?;
    let [a, b, c] = seed;
    let mut cells: Vec<Cell> = Vec::with_capacity(4 * points.len());
    cells.extend([seed, [b, a, GHOST], [c, b, GHOST], [a, c, GHOST]]);

    for p in (0..points.len()).filter(|p| !seed.contains(p)) {
        insert_point(points, &mut cells, p);
    }

    Ok(cells
        .into_iter()
        .filter(|cell| cell[2] != GHOST)
        .collect())
}

/// First non-collinear triple in input order, counter-clockwise
fn seed_triangle(points: &[Point2<f64>]) -> Option<Cell> {
    let a = 0;
    let b = (1..points.len()).find(|&i| points[i] != points[a])?;
    let (c, orientation) = (b + 1..points.len())
        .map(|i| (i, orient_2d(&points[a], &points[b], &points[i])))
        .find(|&(_, o)| o != 0.0)?;
    Some(if orientation > 0.0 { [a, b, c] } else { [a, c, b] })
}

/// Does `cell`'s circumcircle (or half-plane, for ghosts) strictly contain `p`
fn conflicts(points: &[Point2<f64>], cell: &Cell, p: &Point2<f64>) -> bool {
    let [a, b, c] = *cell;
    if c == GHOST {
        let (u, v) = (&points[a], &points[b]);
        let side = orient_2d(u, v, p);
        return side > 0.0 || (side == 0.0 && on_open_segment(u, v, p));
    }
    in_circle(&points[a], &points[b], &points[c], p) > 0.0
}

/// New cell on cavity edge `a -> b`, rotated so a ghost vertex comes last
fn fan_cell(a: usize, b: usize, p: usize) -> Cell {
    if a == GHOST {
        [b, p, GHOST]
    } else if b == GHOST {
        [p, a, GHOST]
    } else {
        [a, b, p]
    }
}

fn insert_point(points: &[Point2<f64>], cells: &mut Vec<Cell>, p: usize) {
    let point = points[p];

    let bad: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| conflicts(points, cell, &point))
        .map(|(i, _)| i)
        .collect();
    if bad.is_empty() {
        tracing::debug!(point = p, "duplicate point skipped");
        return;
    }

    // Cavity boundary: directed edges of bad cells whose reverse is not
    // also an edge of a bad cell
    let edges: Vec<(usize, usize)> = bad
        .iter()
        .flat_map(|&i| {
            let [a, b, c] = cells[i];
            [(a, b), (b, c), (c, a)]
        })
        .collect();
    let boundary: Vec<(usize, usize)> = edges
        .iter()
        .filter(|&&(a, b)| !edges.contains(&(b, a)))
        .copied()
        .collect();

    // `bad` is ascending; remove from the back so indices stay valid
    for &i in bad.iter().rev() {
        cells.swap_remove(i);
    }

    for (a, b) in boundary {
        let cell = fan_cell(a, b, p);
        if cell[2] != GHOST && orient_2d(&points[cell[0]], &points[cell[1]], &point) <= 0.0 {
            tracing::debug!(point = p, a, b, "flat cavity edge skipped");
            continue;
        }
        cells.push(cell);
    }
}
