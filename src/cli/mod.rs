// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for the backplate tool

pub mod batch;
pub mod reporter;
pub mod ring;

pub use batch::{run_batch, BatchOptions, BatchSummary, FileOutcome};
pub use reporter::Reporter;
pub use ring::resolve_ring;
