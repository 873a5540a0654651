// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Diagnostic raster output
//!
//! Two images: a 3x2 sheet of flat-shaded orthographic views, and a top-down
//! plan showing the silhouette with the gap footprint and ring circles drawn
//! over it. Rasterization is a plain z-buffered triangle fill.

use crate::error::{ModifyError, Result};
use crate::geometry::{Footprint, Mesh};
use crate::modify::{recess::wall_point, RingSpec, NUM_SEGMENTS};
use image::{Rgb, RgbImage};
use nalgebra::{Point2, Point3, Vector2, Vector3};
use std::path::Path;

/// Size of one view on the sheet
pub const PANEL_WIDTH: u32 = 400;
pub const PANEL_HEIGHT: u32 = 300;

/// Size of the plan image
pub const PLAN_SIZE: u32 = 800;

const BACKGROUND: Rgb<u8> = Rgb([15, 18, 26]);
const FOOTPRINT_COLOR: Rgb<u8> = Rgb([230, 60, 50]);
const RING_COLOR: Rgb<u8> = Rgb([60, 140, 240]);

/// Orthographic camera directions, in sheet order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Top,
    Bottom,
    Front,
    Back,
    Left,
    Right,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Top,
        View::Bottom,
        View::Front,
        View::Back,
        View::Left,
        View::Right,
    ];

    /// Screen right, screen up, and the direction towards the camera
    fn basis(self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let (x, y, z) = (Vector3::x(), Vector3::y(), Vector3::z());
        match self {
            View::Top => (x, y, z),
            View::Bottom => (x, -y, -z),
            View::Front => (x, z, -y),
            View::Back => (-x, z, y),
            View::Left => (-y, z, -x),
            View::Right => (y, z, x),
        }
    }

    /// Screen coordinates and depth (larger is closer)
    fn project(self, p: &Point3<f64>) -> Point3<f64> {
        let (right, up, toward) = self.basis();
        let c = p.coords;
        Point3::new(c.dot(&right), c.dot(&up), c.dot(&toward))
    }
}

/// Pixel-space rectangle a view is drawn into
#[derive(Debug, Clone, Copy)]
struct Viewport {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
}

/// Maps projected coordinates into a viewport, keeping aspect ratio
struct Fit {
    min: Vector2<f64>,
    max_v: f64,
    scale: f64,
    offset: Vector2<f64>,
}

impl Fit {
    fn new(points: &[Point3<f64>], viewport: &Viewport) -> Self {
        let mut min = Vector2::repeat(f64::INFINITY);
        let mut max = Vector2::repeat(f64::NEG_INFINITY);
        for p in points {
            min = min.inf(&p.xy().coords);
            max = max.sup(&p.xy().coords);
        }
        let span = (max - min).map(|s| s.max(1e-3));
        let scale = 0.9 * (viewport.width as f64 / span.x).min(viewport.height as f64 / span.y);
        let offset = Vector2::new(
            viewport.x0 as f64 + (viewport.width as f64 - span.x * scale) * 0.5,
            viewport.y0 as f64 + (viewport.height as f64 - span.y * scale) * 0.5,
        );
        Self {
            min,
            max_v: max.y,
            scale,
            offset,
        }
    }

    fn pixel(&self, u: f64, v: f64) -> Point2<f64> {
        Point2::new(
            (u - self.min.x) * self.scale + self.offset.x,
            (self.max_v - v) * self.scale + self.offset.y,
        )
    }
}

fn edge(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> f64 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

fn rasterize_triangle(
    image: &mut RgbImage,
    depth_buffer: &mut [f64],
    viewport: &Viewport,
    points: [Point2<f64>; 3],
    depths: [f64; 3],
    color: Rgb<u8>,
) {
    let lo_x = viewport.x0 as f64;
    let hi_x = (viewport.x0 + viewport.width - 1) as f64;
    let lo_y = viewport.y0 as f64;
    let hi_y = (viewport.y0 + viewport.height - 1) as f64;

    let min_x = points.iter().fold(f64::INFINITY, |acc, p| acc.min(p.x)).floor().max(lo_x) as i64;
    let max_x = points.iter().fold(f64::NEG_INFINITY, |acc, p| acc.max(p.x)).ceil().min(hi_x) as i64;
    let min_y = points.iter().fold(f64::INFINITY, |acc, p| acc.min(p.y)).floor().max(lo_y) as i64;
    let max_y = points.iter().fold(f64::NEG_INFINITY, |acc, p| acc.max(p.y)).ceil().min(hi_y) as i64;
    if min_x > max_x || min_y > max_y {
        return;
    }

    let area = edge(&points[0], &points[1], &points[2]);
    if area.abs() < 1e-9 {
        return;
    }
    let inv_area = 1.0 / area;
    let width = image.width() as usize;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Point2::new(x as f64 + 0.5, y as f64 + 0.5);
            let w0 = edge(&points[1], &points[2], &p);
            let w1 = edge(&points[2], &points[0], &p);
            let w2 = edge(&points[0], &points[1], &p);
            let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0) || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
            if !inside {
                continue;
            }

            let depth = (w0 * depths[0] + w1 * depths[1] + w2 * depths[2]) * inv_area;
            let idx = y as usize * width + x as usize;
            if depth > depth_buffer[idx] {
                depth_buffer[idx] = depth;
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

fn shade(intensity: f64) -> Rgb<u8> {
    let s = (intensity * 205.0 + 40.0).clamp(0.0, 255.0);
    Rgb([s as u8, (s * 0.92) as u8, (s * 0.78 + 20.0).min(255.0) as u8])
}

fn draw_view(image: &mut RgbImage, depth_buffer: &mut [f64], mesh: &Mesh, view: View, viewport: &Viewport) {
    let projected: Vec<Point3<f64>> = mesh.vertices.iter().map(|v| view.project(&v.position)).collect();
    let fit = Fit::new(&projected, viewport);
    let (_, _, toward) = view.basis();

    for tri in &mesh.triangles {
        let Some(normal) = mesh.face_normal(tri) else {
            continue;
        };
        let intensity = normal.dot(&toward).abs().max(0.05);
        let [i0, i1, i2] = tri.indices;
        let pts = [i0, i1, i2].map(|i| fit.pixel(projected[i].x, projected[i].y));
        let depths = [i0, i1, i2].map(|i| projected[i].z);
        rasterize_triangle(image, depth_buffer, viewport, pts, depths, shade(intensity));
    }
}

fn save(image: &RgbImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|e| ModifyError::Output {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Six orthographic views on a 3x2 sheet: top, bottom, front on the first
/// row; back, left, right on the second.
pub fn render_views(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    mesh.validate_indices()?;

    let (width, height) = (PANEL_WIDTH * 3, PANEL_HEIGHT * 2);
    let mut image = RgbImage::from_pixel(width, height, BACKGROUND);
    let mut depth_buffer = vec![f64::NEG_INFINITY; (width * height) as usize];

    if !mesh.is_empty() {
        for (k, view) in View::ALL.iter().enumerate() {
            let viewport = Viewport {
                x0: (k as u32 % 3) * PANEL_WIDTH,
                y0: (k as u32 / 3) * PANEL_HEIGHT,
                width: PANEL_WIDTH,
                height: PANEL_HEIGHT,
            };
            draw_view(&mut image, &mut depth_buffer, mesh, *view, &viewport);
        }
    }

    save(&image, path)?;
    tracing::debug!(path = %path.display(), "views rendered");
    Ok(())
}

fn draw_segment(image: &mut RgbImage, a: Point2<f64>, b: Point2<f64>, color: Rgb<u8>) {
    let steps = (b - a).amax().ceil().max(1.0) as usize;
    for s in 0..=steps {
        let p = a + (b - a) * (s as f64 / steps as f64);
        let (x, y) = (p.x.round(), p.y.round());
        if x >= 0.0 && y >= 0.0 && (x as u32) < image.width() && (y as u32) < image.height() {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Top-down plan of the planned edits.
///
/// The mesh silhouette is seen from below (the back plate). The gap
/// footprint is outlined in red and the ring circles in blue; the ring is
/// centred on its own centre or the mesh's XY bounding-box midpoint.
pub fn render_plan(
    mesh: &Mesh,
    footprint: Option<&Footprint>,
    ring: Option<&RingSpec>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    mesh.validate_indices()?;

    let mut image = RgbImage::from_pixel(PLAN_SIZE, PLAN_SIZE, BACKGROUND);
    let mut depth_buffer = vec![f64::NEG_INFINITY; (PLAN_SIZE * PLAN_SIZE) as usize];
    let viewport = Viewport {
        x0: 0,
        y0: 0,
        width: PLAN_SIZE,
        height: PLAN_SIZE,
    };

    if !mesh.is_empty() {
        draw_view(&mut image, &mut depth_buffer, mesh, View::Bottom, &viewport);

        let projected: Vec<Point3<f64>> = mesh
            .vertices
            .iter()
            .map(|v| View::Bottom.project(&v.position))
            .collect();
        let fit = Fit::new(&projected, &viewport);
        let to_pixel = |x: f64, y: f64| {
            let p = View::Bottom.project(&Point3::new(x, y, 0.0));
            fit.pixel(p.x, p.y)
        };

        if let Some(fp) = footprint {
            let corners = [
                to_pixel(fp.x_min, fp.y_min),
                to_pixel(fp.x_max, fp.y_min),
                to_pixel(fp.x_max, fp.y_max),
                to_pixel(fp.x_min, fp.y_max),
            ];
            for k in 0..4 {
                draw_segment(&mut image, corners[k], corners[(k + 1) % 4], FOOTPRINT_COLOR);
            }
        }

        if let Some(ring) = ring {
            let center = ring.center.unwrap_or_else(|| mesh.bounding_box().center_xy());
            for radius in [ring.inner_radius, ring.outer_radius] {
                for i in 0..NUM_SEGMENTS {
                    let a = wall_point(&center, radius, i);
                    let b = wall_point(&center, radius, (i + 1) % NUM_SEGMENTS);
                    draw_segment(&mut image, to_pixel(a.x, a.y), to_pixel(b.x, b.y), RING_COLOR);
                }
            }
        }
    }

    save(&image, path)?;
    tracing::debug!(path = %path.display(), "plan rendered");
    Ok(())
}
