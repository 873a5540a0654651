// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Backplate CLI

use anyhow::{Context, Result};
use backplate::cli::batch::sibling;
use backplate::cli::{resolve_ring, run_batch, BatchOptions, Reporter};
use backplate::config::ToolConfig;
use backplate::geometry::{analyze, validate_mesh, verify_hole_count, Mesh};
use backplate::io::{export_stl, import_stl};
use backplate::measure::{HistogramMeasurer, RingMeasurer};
use backplate::modify::{apply_modifications, locate_gap, Modifications};
use backplate::render::{render_plan, render_views};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "backplate")]
#[command(about = "Back-plate edits for printable case shells: gap fill and MagSafe recess", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./backplate.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Modify a single STL file
    Modify {
        /// Input STL file
        input: PathBuf,

        /// Output STL file (defaults to <input>_modified.stl)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Comma-separated modifications: no-battery-cover, magsafe
        #[arg(short, long, default_value = "no-battery-cover,magsafe")]
        mods: String,

        /// Reference STL to measure the ring from
        #[arg(long, value_name = "FILE")]
        magsafe_ref: Option<PathBuf>,

        /// Write plan and view images next to the output
        #[arg(long)]
        visualize: bool,
    },

    /// Modify every STL file under a directory
    Batch {
        /// Input directory
        input_dir: PathBuf,

        /// Output directory (defaults to the configured one)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Comma-separated modifications: no-battery-cover, magsafe
        #[arg(short, long, default_value = "no-battery-cover,magsafe")]
        mods: String,

        /// Reference STL to measure the ring from
        #[arg(long, value_name = "FILE")]
        magsafe_ref: Option<PathBuf>,

        /// Worker threads
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Write plan and view images next to each output
        #[arg(long)]
        render: bool,
    },

    /// Measure ring dimensions from a reference STL and print them as JSON
    Measure {
        /// Reference STL file
        reference: PathBuf,
    },

    /// Show mesh statistics and hole count
    Info {
        /// Input STL file
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        Reporter::report_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = ToolConfig::load(cli.config.as_deref())?;
    let verbose = cli.verbose || config.verbose;
    init_tracing(verbose);

    match cli.command {
        Commands::Modify {
            input,
            output,
            mods,
            magsafe_ref,
            visualize,
        } => modify_command(
            &config,
            &input,
            output,
            &mods,
            magsafe_ref.as_deref(),
            visualize,
        ),
        Commands::Batch {
            input_dir,
            out,
            mods,
            magsafe_ref,
            jobs,
            render,
        } => {
            let ring = resolve_ring(config.ring, magsafe_ref.as_deref());
            let options = BatchOptions {
                input_dir,
                output_dir: out.unwrap_or_else(|| config.output_dir.clone()),
                mods: Modifications::parse(&mods),
                ring,
                expected_holes: config.expected_holes,
                parallelism: jobs.or(config.parallelism),
                render: render || config.render,
                show_progress: !verbose,
            };
            batch_command(&options)
        }
        Commands::Measure { reference } => measure_command(&reference),
        Commands::Info { input } => info_command(&config, &input),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(path: &Path) -> Result<Mesh> {
    import_stl(path).with_context(|| format!("Failed to load {:?}", path))
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());
    input.with_file_name(format!("{}_modified.stl", stem))
}

fn modify_command(
    config: &ToolConfig,
    input: &Path,
    output: Option<PathBuf>,
    mods: &str,
    reference: Option<&Path>,
    visualize: bool,
) -> Result<()> {
    let mods = Modifications::parse(mods);
    if mods.is_empty() {
        Reporter::report_warning("No known modifications requested; output equals input");
    }

    let output = output.unwrap_or_else(|| default_output(input));
    let ring = if mods.add_recess {
        let ring = resolve_ring(config.ring, reference);
        if reference.is_none() {
            Reporter::report_ring("Configured", &ring);
        }
        Some(ring)
    } else {
        None
    };

    Reporter::progress(&format!("Loading {}", input.display()));
    let mesh = load(input)?;
    let before = analyze(&mesh);

    if visualize {
        let footprint = mods
            .remove_gap
            .then(|| locate_gap(&mesh).map(|region| region.footprint))
            .flatten();
        let plan = sibling(&output, "plan");
        render_plan(&mesh, footprint.as_ref(), ring.as_ref(), &plan)?;
        Reporter::report_info(&format!("Plan written to {}", plan.display()));
    }

    let start = Instant::now();
    let modified = apply_modifications(mesh, mods, ring.as_ref())
        .with_context(|| format!("Failed to modify {:?}", input))?;
    let duration = start.elapsed();

    export_stl(&modified, &output)?;
    let after = analyze(&modified);
    Reporter::report_modification(
        &output.display().to_string(),
        &mods.to_string(),
        &before,
        &after,
        duration,
    );

    if visualize {
        let views = sibling(&output, "views");
        render_views(&modified, &views)?;
        Reporter::report_info(&format!("Views written to {}", views.display()));
    }

    Reporter::report_holes(&verify_hole_count(&modified, config.expected_holes));
    Reporter::success(&format!("Saved {}", output.display()));
    Ok(())
}

fn batch_command(options: &BatchOptions) -> Result<()> {
    let start = Instant::now();
    let summary = run_batch(options)?;
    Reporter::report_batch(&summary, start.elapsed());

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn measure_command(reference: &Path) -> Result<()> {
    let mesh = load(reference)?;
    let ring = HistogramMeasurer::default().measure_ring(&mesh);
    let json = serde_json::to_string_pretty(&ring).context("Failed to serialize ring")?;
    println!("{}", json);
    Ok(())
}

fn info_command(config: &ToolConfig, input: &Path) -> Result<()> {
    let mesh = load(input)?;
    Reporter::report_mesh("Mesh", &input.display().to_string(), &analyze(&mesh));
    Reporter::report_validation(&validate_mesh(&mesh));
    Reporter::report_holes(&verify_hole_count(&mesh, config.expected_holes));
    Ok(())
}
