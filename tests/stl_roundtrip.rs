// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! File-level workflow: load, modify, save, reload

use anyhow::Result;
use approx::assert_relative_eq;
use backplate::geometry::{analyze, verify_hole_count, Footprint, Primitive};
use backplate::modify::{apply_modifications, Modifications};
use backplate::{export_stl, import_stl, mesh_digest};
use tempfile::TempDir;

#[test]
fn test_gap_fill_survives_save_and_reload() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("case.stl");
    let output = dir.path().join("case_modified.stl");

    let window = Footprint::new(4.0, 16.0, 4.0, 16.0);
    let case = Primitive::slab_with_window(20.0, 20.0, 4.0, 2.0, window).to_mesh();
    export_stl(&case, &input)?;

    let loaded = import_stl(&input)?;
    assert_eq!(loaded.triangle_count(), case.triangle_count());
    assert!(verify_hole_count(&loaded, 1).matches());

    let mods = Modifications::parse("no-battery-cover");
    let modified = apply_modifications(loaded, mods, None)?;
    export_stl(&modified, &output)?;

    let reloaded = import_stl(&output)?;
    assert_eq!(reloaded.vertex_count(), modified.vertex_count());
    assert_eq!(reloaded.triangle_count(), modified.triangle_count());
    assert!(verify_hole_count(&reloaded, 0).matches());

    let stats = analyze(&reloaded);
    assert!(stats.is_watertight);
    assert_relative_eq!(stats.volume, 1600.0, epsilon = 1e-3);
    Ok(())
}

#[test]
fn test_file_pipeline_is_reproducible() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("case.stl");
    export_stl(&Primitive::slab(80.0, 80.0, 6.0, 4.0).to_mesh(), &input)?;

    let ring = backplate::RingSpec::default();
    let run = || -> Result<String> {
        let mesh = import_stl(&input)?;
        let out = apply_modifications(mesh, Modifications::all(), Some(&ring))?;
        Ok(mesh_digest(&out))
    };
    assert_eq!(run()?, run()?);
    Ok(())
}
