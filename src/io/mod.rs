// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - STL import/export and mesh digests

mod digest;
mod exporter;
mod importer;

pub use digest::mesh_digest;
pub use exporter::export_stl;
pub use importer::import_stl;
