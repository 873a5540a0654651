// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL exporter

use crate::error::{ModifyError, Result};
use crate::geometry::Mesh;
use nalgebra::Vector3;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

fn output_error(path: &Path, reason: impl ToString) -> ModifyError {
    ModifyError::Output {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Write a binary STL. Face normals follow the winding.
pub fn export_stl(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    mesh.validate_indices()?;

    let triangles: Vec<StlTriangle> = mesh
        .triangles
        .iter()
        .map(|tri| {
            let normal = mesh.face_normal(tri).unwrap_or_else(Vector3::zeros);
            let [v0, v1, v2] = tri.indices.map(|i| {
                let p = mesh.position(i);
                StlVertex::new([p.x as f32, p.y as f32, p.z as f32])
            });
            StlTriangle {
                normal: Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
                vertices: [v0, v1, v2],
            }
        })
        .collect();

    let file = File::create(path).map_err(|e| output_error(path, e))?;
    let mut writer = BufWriter::new(file);
    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| output_error(path, e))?;

    tracing::debug!(path = %path.display(), faces = triangles.len(), "mesh written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::io::import_stl;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_then_import() -> anyhow::Result<()> {
        let mesh = Primitive::slab(10.0, 6.0, 2.0, 2.0).to_mesh();
        let file = NamedTempFile::new()?;

        export_stl(&mesh, file.path())?;
        let loaded = import_stl(file.path())?;

        assert_eq!(loaded.vertex_count(), mesh.vertex_count());
        assert_eq!(loaded.triangle_count(), mesh.triangle_count());
        let size = loaded.bounding_box().size();
        assert!((size.x - 10.0).abs() < 1e-5);
        assert!((size.z - 2.0).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn test_unwritable_path_is_output_error() {
        let mesh = Primitive::plate(2.0, 2.0, 2.0).to_mesh();
        let err = export_stl(&mesh, "/nonexistent/dir/out.stl").unwrap_err();
        assert!(matches!(err, ModifyError::Output { .. }));
    }
}
