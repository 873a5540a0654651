// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Consistent face winding by propagation across shared edges
//!
//! Each connected component is walked breadth-first from its lowest-index
//! face. A neighbour is flipped when it traverses the shared edge in the same
//! direction as the face it was reached from. Closed components with negative
//! signed volume are then inverted as a whole so their normals point outward.
//! Edges shared by more than two faces do not propagate orientation.

use crate::error::Result;
use crate::geometry::mesh_utils::Edge;
use crate::geometry::{Mesh, Triangle};
use std::collections::VecDeque;

/// Neighbour across a two-face edge
#[derive(Debug, Clone, Copy)]
struct Link {
    face: usize,
    u: usize,
    v: usize,
}

fn build_links(mesh: &Mesh) -> Vec<Vec<Link>> {
    let mut incidences: Vec<(Edge, usize)> = Vec::with_capacity(mesh.triangles.len() * 3);
    for (face, triangle) in mesh.triangles.iter().enumerate() {
        let [a, b, c] = triangle.indices;
        for (u, v) in [(a, b), (b, c), (c, a)] {
            incidences.push((Edge::new(u, v), face));
        }
    }
    incidences.sort_unstable();

    let mut links: Vec<Vec<Link>> = vec![Vec::new(); mesh.triangles.len()];
    for group in incidences.chunk_by(|a, b| a.0 == b.0) {
        if let [(edge, f), (_, g)] = group {
            if f == g {
                continue;
            }
            links[*f].push(Link {
                face: *g,
                u: edge.v0,
                v: edge.v1,
            });
            links[*g].push(Link {
                face: *f,
                u: edge.v0,
                v: edge.v1,
            });
        }
    }
    links
}

/// Does `triangle` (optionally flipped) contain the directed edge u -> v
fn traverses(triangle: &Triangle, flipped: bool, u: usize, v: usize) -> bool {
    let t = if flipped { triangle.flipped() } else { *triangle };
    let idx = t.indices;
    (0..3).any(|k| idx[k] == u && idx[(k + 1) % 3] == v)
}

/// Make winding consistent and outward. Returns the number of faces flipped.
pub fn fix_normals(mesh: &mut Mesh) -> Result<usize> {
    mesh.validate_indices()?;
    let face_count = mesh.triangles.len();
    if face_count == 0 {
        return Ok(0);
    }

    let links = build_links(mesh);
    let mut flip = vec![false; face_count];
    let mut visited = vec![false; face_count];

    for seed in 0..face_count {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut component = vec![seed];
        let mut queue = VecDeque::from([seed]);

        while let Some(f) = queue.pop_front() {
            for link in &links[f] {
                let g = link.face;
                if visited[g] {
                    continue;
                }
                let f_forward = traverses(&mesh.triangles[f], flip[f], link.u, link.v);
                let g_forward = traverses(&mesh.triangles[g], false, link.u, link.v);
                flip[g] = f_forward == g_forward;
                visited[g] = true;
                component.push(g);
                queue.push_back(g);
            }
        }

        // Closed when every face has three two-face neighbours
        let closed = component.iter().all(|&f| links[f].len() == 3);
        if closed && component_volume(mesh, &component, &flip) < 0.0 {
            for &f in &component {
                flip[f] = !flip[f];
            }
        }
    }

    let mut flipped = 0;
    for (triangle, &should_flip) in mesh.triangles.iter_mut().zip(&flip) {
        if should_flip {
            *triangle = triangle.flipped();
            flipped += 1;
        }
    }
    if flipped > 0 {
        mesh.recompute_normals();
    }
    Ok(flipped)
}

fn component_volume(mesh: &Mesh, component: &[usize], flip: &[bool]) -> f64 {
    component
        .iter()
        .map(|&f| {
            let t = if flip[f] {
                mesh.triangles[f].flipped()
            } else {
                mesh.triangles[f]
            };
            let [i0, i1, i2] = t.indices;
            let v0 = &mesh.position(i0).coords;
            let v1 = &mesh.position(i1).coords;
            let v2 = &mesh.position(i2).coords;
            v0.dot(&v1.cross(v2)) / 6.0
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{analyze, Primitive};

    #[test]
    fn test_consistent_slab_untouched() {
        let mut mesh = Primitive::slab(6.0, 4.0, 2.0, 2.0).to_mesh();
        let before = mesh.clone();
        assert_eq!(fix_normals(&mut mesh).unwrap(), 0);
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_single_flipped_face_restored() {
        let mut mesh = Primitive::slab(6.0, 4.0, 2.0, 2.0).to_mesh();
        let original = mesh.triangles.clone();
        mesh.triangles[5] = mesh.triangles[5].flipped();

        assert_eq!(fix_normals(&mut mesh).unwrap(), 1);
        assert_eq!(mesh.triangles, original);
    }

    #[test]
    fn test_inverted_closed_mesh_turned_outward() {
        let mut mesh = Primitive::slab(6.0, 4.0, 2.0, 2.0).to_mesh();
        for t in &mut mesh.triangles {
            *t = t.flipped();
        }
        let count = mesh.triangle_count();
        assert_eq!(fix_normals(&mut mesh).unwrap(), count);
        assert!(analyze(&mesh).signed_volume > 0.0);
    }

    #[test]
    fn test_open_plate_follows_first_face() {
        let mut mesh = Primitive::plate(6.0, 6.0, 2.0).to_mesh();
        mesh.triangles[3] = mesh.triangles[3].flipped();
        mesh.triangles[7] = mesh.triangles[7].flipped();

        assert_eq!(fix_normals(&mut mesh).unwrap(), 2);
        for t in &mesh.triangles {
            assert!(mesh.face_normal(t).unwrap().z < 0.0);
        }
    }

    #[test]
    fn test_idempotent() {
        let mut mesh = Primitive::plate(6.0, 6.0, 2.0).to_mesh();
        mesh.triangles[0] = mesh.triangles[0].flipped();
        fix_normals(&mut mesh).unwrap();
        let once = mesh.clone();
        assert_eq!(fix_normals(&mut mesh).unwrap(), 0);
        assert_eq!(mesh, once);
    }
}
