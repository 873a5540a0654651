// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL importer

use crate::error::{ModifyError, Result};
use crate::geometry::{Mesh, Triangle, Vertex};
use nalgebra::Point3;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn input_error(path: &Path, reason: impl ToString) -> ModifyError {
    ModifyError::Input {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Load a binary or ASCII STL file.
///
/// Identical corner positions are shared between faces, so the result is
/// indexed. Normals are recomputed from the winding.
pub fn import_stl(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| input_error(path, e))?;
    let mut reader = BufReader::new(file);
    let stl = stl_io::read_stl(&mut reader).map_err(|e| input_error(path, e))?;

    let mut mesh = Mesh::with_capacity(stl.vertices.len(), stl.faces.len());
    for v in &stl.vertices {
        let coords = [v[0], v[1], v[2]];
        if !coords.iter().all(|c| c.is_finite()) {
            return Err(input_error(path, format!("non-finite vertex {:?}", coords)));
        }
        mesh.add_vertex(Vertex::at(Point3::new(v[0] as f64, v[1] as f64, v[2] as f64)));
    }
    for face in &stl.faces {
        mesh.add_triangle(Triangle::new(face.vertices));
    }

    if let Err(err) = mesh.validate_indices() {
        return Err(input_error(path, err));
    }
    if mesh.triangle_count() == 0 {
        return Err(input_error(path, "file contains no triangles"));
    }

    mesh.recompute_normals();
    tracing::debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.triangle_count(),
        "mesh loaded"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ASCII_SQUARE: &str = "solid square
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 0 10 0
      vertex 10 10 0
    endloop
  endfacet
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 10 10 0
      vertex 10 0 0
    endloop
  endfacet
endsolid square
";

    #[test]
    fn test_import_ascii_shares_vertices() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{}", ASCII_SQUARE)?;

        let mesh = import_stl(file.path())?;
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for t in &mesh.triangles {
            assert!(mesh.face_normal(t).unwrap().z < 0.0);
        }
        Ok(())
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let err = import_stl("/nonexistent/case.stl").unwrap_err();
        assert!(matches!(err, ModifyError::Input { .. }));
    }

    #[test]
    fn test_non_finite_vertex_is_input_error() -> anyhow::Result<()> {
        let face = stl_io::Triangle {
            normal: stl_io::Normal::new([0.0, 0.0, -1.0]),
            vertices: [
                stl_io::Vertex::new([0.0, 0.0, 0.0]),
                stl_io::Vertex::new([f32::INFINITY, 0.0, 0.0]),
                stl_io::Vertex::new([0.0, 10.0, 0.0]),
            ],
        };
        let mut file = NamedTempFile::new()?;
        stl_io::write_stl(&mut file, [face].iter())?;
        file.flush()?;

        let err = import_stl(file.path()).unwrap_err();
        assert!(matches!(err, ModifyError::Input { .. }));
        Ok(())
    }

    #[test]
    fn test_garbage_is_input_error() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"not an stl")?;

        let err = import_stl(file.path()).unwrap_err();
        assert!(matches!(err, ModifyError::Input { .. }));
        Ok(())
    }
}
