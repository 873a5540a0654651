// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Ring selection for the recess modification

use super::Reporter;
use crate::io::import_stl;
use crate::measure::{HistogramMeasurer, RingMeasurer};
use crate::modify::RingSpec;
use std::path::Path;

/// Ring measured from `reference` when given, otherwise `configured`.
///
/// A reference that cannot be loaded is reported as a warning and the
/// configured ring is used instead.
pub fn resolve_ring(configured: RingSpec, reference: Option<&Path>) -> RingSpec {
    let Some(path) = reference else {
        return configured;
    };

    match import_stl(path) {
        Ok(mesh) => {
            let ring = HistogramMeasurer::default().measure_ring(&mesh);
            Reporter::report_ring("Measured", &ring);
            ring
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "reference unusable, using configured ring");
            Reporter::report_warning(&format!(
                "Could not analyze MagSafe reference {}: {}; using configured ring",
                path.display(),
                e
            ));
            configured
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::io::export_stl;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn configured() -> RingSpec {
        RingSpec {
            center: None,
            outer_radius: 31.0,
            inner_radius: 24.5,
            depth: 1.2,
        }
    }

    #[test]
    fn test_no_reference_uses_configured() {
        assert_eq!(resolve_ring(configured(), None), configured());
    }

    #[test]
    fn test_missing_reference_falls_back() {
        let ring = resolve_ring(configured(), Some(Path::new("/nonexistent/magsafe.stl")));
        assert_eq!(ring, configured());
    }

    #[test]
    fn test_unreadable_reference_falls_back() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"definitely not an stl")?;

        assert_eq!(resolve_ring(configured(), Some(file.path())), configured());
        Ok(())
    }

    #[test]
    fn test_reference_is_measured() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("reference.stl");
        export_stl(&Primitive::slab(80.0, 80.0, 6.0, 4.0).to_mesh(), &path)?;

        let expected = HistogramMeasurer::default().measure_ring(&import_stl(&path)?);
        assert_eq!(resolve_ring(configured(), Some(&path)), expected);
        Ok(())
    }
}
