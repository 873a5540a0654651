// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parametric plate and slab shapes
//!
//! Used as stand-ins for a case shell in tests and benchmarks. All shapes sit
//! on z = 0 with their minimum corner at the origin.

use super::{Footprint, Mesh, Triangle, Vertex};
use nalgebra::Point3;

/// Parametric shapes with a subdivided back face
#[derive(Debug, Clone, Copy)]
pub enum Primitive {
    /// Single-sided grid facing -Z
    Plate { width: f64, length: f64, spacing: f64 },
    /// Closed box; top and bottom subdivided at `spacing`, walls one cell high
    Slab {
        width: f64,
        length: f64,
        height: f64,
        spacing: f64,
    },
    /// Closed box whose back face has a rectangular opening
    SlabWithWindow {
        width: f64,
        length: f64,
        height: f64,
        spacing: f64,
        window: Footprint,
    },
}

impl Primitive {
    pub fn plate(width: f64, length: f64, spacing: f64) -> Self {
        Self::Plate {
            width,
            length,
            spacing,
        }
    }

    pub fn slab(width: f64, length: f64, height: f64, spacing: f64) -> Self {
        Self::Slab {
            width,
            length,
            height,
            spacing,
        }
    }

    pub fn slab_with_window(
        width: f64,
        length: f64,
        height: f64,
        spacing: f64,
        window: Footprint,
    ) -> Self {
        Self::SlabWithWindow {
            width,
            length,
            height,
            spacing,
            window,
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        match *self {
            Self::Plate {
                width,
                length,
                spacing,
            } => {
                let grid = Grid::new(width, length, spacing);
                let mut mesh = Mesh::new();
                grid.add_layer(&mut mesh, 0.0);
                grid.add_back_faces(&mut mesh, None);
                mesh.recompute_normals();
                mesh
            }
            Self::Slab {
                width,
                length,
                height,
                spacing,
            } => generate_slab(Grid::new(width, length, spacing), height, None),
            Self::SlabWithWindow {
                width,
                length,
                height,
                spacing,
                window,
            } => generate_slab(Grid::new(width, length, spacing), height, Some(&window)),
        }
    }
}

struct Grid {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
}

impl Grid {
    fn new(width: f64, length: f64, spacing: f64) -> Self {
        let nx = ((width / spacing).round() as usize).max(1);
        let ny = ((length / spacing).round() as usize).max(1);
        Self {
            nx,
            ny,
            dx: width / nx as f64,
            dy: length / ny as f64,
        }
    }

    fn layer_size(&self) -> usize {
        (self.nx + 1) * (self.ny + 1)
    }

    fn index(&self, i: usize, j: usize) -> usize {
        i * (self.ny + 1) + j
    }

    fn add_layer(&self, mesh: &mut Mesh, z: f64) {
        for i in 0..=self.nx {
            for j in 0..=self.ny {
                let p = Point3::new(i as f64 * self.dx, j as f64 * self.dy, z);
                mesh.add_vertex(Vertex::at(p));
            }
        }
    }

    fn cell_in_window(&self, i: usize, j: usize, window: Option<&Footprint>) -> bool {
        let Some(window) = window else {
            return false;
        };
        let cx = (i as f64 + 0.5) * self.dx;
        let cy = (j as f64 + 0.5) * self.dy;
        cx > window.x_min && cx < window.x_max && cy > window.y_min && cy < window.y_max
    }

    /// Quads of the first layer, wound to face -Z
    fn add_back_faces(&self, mesh: &mut Mesh, window: Option<&Footprint>) {
        for i in 0..self.nx {
            for j in 0..self.ny {
                if self.cell_in_window(i, j, window) {
                    continue;
                }
                let p00 = self.index(i, j);
                let p10 = self.index(i + 1, j);
                let p11 = self.index(i + 1, j + 1);
                let p01 = self.index(i, j + 1);
                mesh.add_triangle(Triangle::new([p00, p11, p10]));
                mesh.add_triangle(Triangle::new([p00, p01, p11]));
            }
        }
    }
}

fn generate_slab(grid: Grid, height: f64, window: Option<&Footprint>) -> Mesh {
    let mut mesh = Mesh::with_capacity(2 * grid.layer_size(), 4 * grid.nx * grid.ny);
    grid.add_layer(&mut mesh, 0.0);
    grid.add_layer(&mut mesh, height);
    let top = grid.layer_size();

    grid.add_back_faces(&mut mesh, window);

    // Top, facing +Z
    for i in 0..grid.nx {
        for j in 0..grid.ny {
            let q00 = top + grid.index(i, j);
            let q10 = top + grid.index(i + 1, j);
            let q11 = top + grid.index(i + 1, j + 1);
            let q01 = top + grid.index(i, j + 1);
            mesh.add_triangle(Triangle::new([q00, q10, q11]));
            mesh.add_triangle(Triangle::new([q00, q11, q01]));
        }
    }

    // Sides along X (y = 0 faces -Y, y = length faces +Y)
    for i in 0..grid.nx {
        for (j, outward_neg) in [(0, true), (grid.ny, false)] {
            let b0 = grid.index(i, j);
            let b1 = grid.index(i + 1, j);
            let (t0, t1) = (top + b0, top + b1);
            if outward_neg {
                mesh.add_triangle(Triangle::new([b0, b1, t1]));
                mesh.add_triangle(Triangle::new([b0, t1, t0]));
            } else {
                mesh.add_triangle(Triangle::new([b0, t1, b1]));
                mesh.add_triangle(Triangle::new([b0, t0, t1]));
            }
        }
    }

    // Sides along Y (x = 0 faces -X, x = width faces +X)
    for j in 0..grid.ny {
        for (i, outward_neg) in [(0, true), (grid.nx, false)] {
            let b0 = grid.index(i, j);
            let b1 = grid.index(i, j + 1);
            let (t0, t1) = (top + b0, top + b1);
            if outward_neg {
                mesh.add_triangle(Triangle::new([b0, t1, b1]));
                mesh.add_triangle(Triangle::new([b0, t0, t1]));
            } else {
                mesh.add_triangle(Triangle::new([b0, b1, t1]));
                mesh.add_triangle(Triangle::new([b0, t1, t0]));
            }
        }
    }

    mesh.recompute_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::analyze;
    use approx::assert_relative_eq;

    #[test]
    fn test_plate_faces_down() {
        let mesh = Primitive::plate(10.0, 6.0, 2.0).to_mesh();
        assert_eq!(mesh.vertex_count(), 6 * 4);
        assert_eq!(mesh.triangle_count(), 2 * 5 * 3);
        for t in &mesh.triangles {
            assert_relative_eq!(mesh.face_normal(t).unwrap().z, -1.0);
        }
    }

    #[test]
    fn test_slab_volume_and_orientation() {
        let mesh = Primitive::slab(10.0, 20.0, 5.0, 2.5).to_mesh();
        let stats = analyze(&mesh);
        assert!(stats.is_watertight);
        assert_relative_eq!(stats.signed_volume, 1000.0, epsilon = 1e-6);
        assert_relative_eq!(stats.surface_area, 2.0 * (200.0 + 50.0 + 100.0), epsilon = 1e-6);
    }

    #[test]
    fn test_window_removes_back_cells() {
        let window = Footprint::new(2.0, 6.0, 2.0, 4.0);
        let full = Primitive::slab(10.0, 10.0, 2.0, 2.0).to_mesh();
        let open = Primitive::slab_with_window(10.0, 10.0, 2.0, 2.0, window).to_mesh();
        assert_eq!(full.triangle_count() - open.triangle_count(), 2 * 2);
    }
}
