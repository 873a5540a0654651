// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch modification of a directory of STL files
//!
//! Every file is loaded, modified and written independently; workers share
//! nothing but the read-only options.

use crate::geometry::count_boundary_loops;
use crate::io::{export_stl, import_stl, mesh_digest};
use crate::modify::{apply_modifications, locate_gap, Modifications, RingSpec};
use crate::render::{render_plan, render_views};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Name of the JSON summary written into the output directory
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub mods: Modifications,
    pub ring: RingSpec,
    pub expected_holes: usize,
    pub parallelism: Option<usize>,
    pub render: bool,
    pub show_progress: bool,
}

/// Result for one input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub vertices_before: usize,
    pub faces_before: usize,
    pub vertices_after: usize,
    pub faces_after: usize,
    pub holes: usize,
    pub holes_match: bool,
    pub digest: Option<String>,
    pub duration_ms: u64,
    pub error: Option<String>,
}

impl FileOutcome {
    fn failed(input: &Path, error: &anyhow::Error, duration_ms: u64) -> Self {
        Self {
            input: input.to_path_buf(),
            output: None,
            vertices_before: 0,
            faces_before: 0,
            vertices_after: 0,
            faces_after: 0,
            holes: 0,
            holes_match: false,
            digest: None,
            duration_ms,
            error: Some(format!("{:#}", error)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub modifications: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub files: Vec<FileOutcome>,
}

/// All `*.stl` files under `dir`, sorted
pub fn discover_stl_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|s| s.eq_ignore_ascii_case("stl"))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Output path for `input`: `<output_dir>/<relative path>` with a
/// `_modified` stem suffix
fn output_path(options: &BatchOptions, input: &Path) -> PathBuf {
    let relative = input.strip_prefix(&options.input_dir).unwrap_or(input);
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));
    options
        .output_dir
        .join(parent)
        .join(format!("{}_modified.stl", stem))
}

/// `<dir>/<stem>_<suffix>.png` next to `path`
pub fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}_{}.png", stem, suffix))
}

/// Load, modify and write one file
pub fn process_file(options: &BatchOptions, input: &Path) -> Result<FileOutcome> {
    let start = Instant::now();
    let mesh = import_stl(input)?;
    let (vertices_before, faces_before) = (mesh.vertex_count(), mesh.triangle_count());

    let output = output_path(options, input);
    if let Some(dir) = output.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
    }

    if options.render {
        let footprint = options
            .mods
            .remove_gap
            .then(|| locate_gap(&mesh).map(|region| region.footprint))
            .flatten();
        let ring = options.mods.add_recess.then_some(&options.ring);
        render_plan(&mesh, footprint.as_ref(), ring, sibling(&output, "plan"))?;
    }

    let modified = apply_modifications(mesh, options.mods, Some(&options.ring))
        .with_context(|| format!("Failed to modify {:?}", input))?;
    export_stl(&modified, &output)?;

    if options.render {
        render_views(&modified, sibling(&output, "views"))?;
    }

    let holes = count_boundary_loops(&modified);
    Ok(FileOutcome {
        input: input.to_path_buf(),
        output: Some(output),
        vertices_before,
        faces_before,
        vertices_after: modified.vertex_count(),
        faces_after: modified.triangle_count(),
        holes,
        holes_match: holes == options.expected_holes,
        digest: Some(mesh_digest(&modified)),
        duration_ms: start.elapsed().as_millis() as u64,
        error: None,
    })
}

/// Process every STL under the input directory and write `summary.json`
pub fn run_batch(options: &BatchOptions) -> Result<BatchSummary> {
    let files = discover_stl_files(&options.input_dir);
    tracing::info!(count = files.len(), dir = %options.input_dir.display(), "batch started");

    std::fs::create_dir_all(&options.output_dir).with_context(|| {
        format!("Failed to create output directory: {:?}", options.output_dir)
    })?;

    let progress = if options.show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = options.parallelism {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build().context("Failed to build worker pool")?;

    let files_out: Vec<FileOutcome> = pool.install(|| {
        files
            .par_iter()
            .map(|input| {
                let start = Instant::now();
                let outcome = process_file(options, input).unwrap_or_else(|e| {
                    tracing::warn!(file = %input.display(), error = %e, "file failed");
                    FileOutcome::failed(input, &e, start.elapsed().as_millis() as u64)
                });
                if let Some(ref pb) = progress {
                    pb.inc(1);
                }
                outcome
            })
            .collect()
    });

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let failed = files_out.iter().filter(|f| f.error.is_some()).count();
    let summary = BatchSummary {
        modifications: options.mods.to_string(),
        total: files_out.len(),
        succeeded: files_out.len() - failed,
        failed,
        files: files_out,
    };

    let summary_path = options.output_dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
    std::fs::write(&summary_path, json)
        .with_context(|| format!("Failed to write summary: {:?}", summary_path))?;

    Ok(summary)
}
