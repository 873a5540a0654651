// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::batch::BatchSummary;
use crate::geometry::{GeometryStats, HoleCheck, MeshValidation};
use crate::modify::RingSpec;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    fn rule() {
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report mesh statistics under a heading
    pub fn report_mesh(title: &str, file: &str, stats: &GeometryStats) {
        println!();
        Self::rule();
        println!("{} {}", format!("{}:", title).bold(), file.cyan());
        Self::rule();
        Self::print_field("Vertices", stats.vertex_count.to_string().cyan());
        Self::print_field("Triangles", stats.triangle_count.to_string().cyan());
        Self::print_field(
            "Bounds",
            format!(
                "[{:.2}, {:.2}, {:.2}] to [{:.2}, {:.2}, {:.2}]",
                stats.bbox[0], stats.bbox[1], stats.bbox[2], stats.bbox[3], stats.bbox[4], stats.bbox[5]
            )
            .normal(),
        );
        Self::print_field(
            "Size",
            format!("{:.2} x {:.2} x {:.2}", stats.size[0], stats.size[1], stats.size[2]).normal(),
        );
        Self::print_field("Volume", format!("{:.2} mm³", stats.volume).normal());
        let watertight = if stats.is_watertight {
            "yes".green()
        } else {
            "no".yellow()
        };
        Self::print_field("Watertight", watertight);
    }

    /// Report edge topology
    pub fn report_validation(validation: &MeshValidation) {
        let yes_no = |ok: bool| if ok { "yes".green() } else { "no".yellow() };
        Self::print_field("Manifold", yes_no(validation.is_manifold));
        Self::print_field("Closed", yes_no(validation.is_closed));
        Self::print_field("Edges", validation.edge_count.to_string().cyan());
        Self::print_field(
            "Boundary",
            format!(
                "{} edges in {} loops",
                validation.boundary_edge_count, validation.boundary_loops
            )
            .normal(),
        );
    }

    /// Report a modification run
    pub fn report_modification(
        file: &str,
        mods: &str,
        before: &GeometryStats,
        after: &GeometryStats,
        duration: Duration,
    ) {
        println!();
        Self::rule();
        println!("{} {}", "Modified:".bold(), file.cyan());
        Self::rule();
        Self::print_field("Modifications", mods.cyan());
        Self::print_field(
            "Vertices",
            format!("{} -> {}", before.vertex_count, after.vertex_count).normal(),
        );
        Self::print_field(
            "Triangles",
            format!("{} -> {}", before.triangle_count, after.triangle_count).normal(),
        );
        Self::print_field("Time", Self::format_duration(duration).yellow());
        Self::rule();
    }

    /// Report ring dimensions in use
    pub fn report_ring(source: &str, ring: &RingSpec) {
        println!(
            "{} {} outer={:.1}mm inner={:.1}mm depth={:.1}mm",
            "ℹ️".bright_blue(),
            format!("{} ring:", source).bright_black(),
            ring.outer_radius,
            ring.inner_radius,
            ring.depth
        );
    }

    /// Report hole verification
    pub fn report_holes(check: &HoleCheck) {
        println!("\n{}", "Hole verification:".bold());
        println!("  Detected {} holes/boundaries", check.found);
        if check.matches() {
            println!("  {} {}", "✅".green(), format!("Matches expected count of {}", check.expected).green());
        } else {
            println!("  {} {}", "⚠️".yellow(), format!("Expected {} holes", check.expected).yellow());
        }
    }

    /// Report a batch summary
    pub fn report_batch(summary: &BatchSummary, duration: Duration) {
        println!();
        Self::rule();
        println!("{} {}", "Batch:".bold(), summary.modifications.cyan());
        Self::rule();
        for file in &summary.files {
            let name = file.input.display().to_string();
            match &file.error {
                None => println!("  {} {}", "✓".green(), name),
                Some(error) => println!("  {} {} - {}", "✗".red(), name, error.red()),
            }
        }
        println!();
        Self::print_field("Succeeded", summary.succeeded.to_string().green());
        let failed = if summary.failed == 0 {
            summary.failed.to_string().green()
        } else {
            summary.failed.to_string().red()
        };
        Self::print_field("Failed", failed);
        Self::print_field("Time", Self::format_duration(duration).yellow());
        Self::rule();
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    fn print_field(name: &str, value: ColoredString) {
        println!("  {} {}", format!("{}:", name).bright_black(), value);
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }

    /// Print progress message
    pub fn progress(message: &str) {
        println!("{} {}...", "⏳".bright_blue(), message.bright_black());
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }
}
