// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for mesh modification

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, ModifyError>;

/// Errors raised while loading, editing or writing a mesh
#[derive(Debug, Error)]
pub enum ModifyError {
    /// Mesh source could not be read or parsed
    #[error("failed to load mesh from {path}: {reason}")]
    Input { path: PathBuf, reason: String },

    /// Not enough usable geometry for a sub-operation.
    ///
    /// Callers recover from this locally: the sub-operation is skipped and the
    /// mesh passes through unchanged.
    #[error("degenerate geometry: {reason}")]
    Degenerate { reason: String },

    /// A face references a vertex that does not exist
    #[error("face {face} references vertex {index} but mesh has {vertex_count} vertices")]
    RepairInconsistency {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    /// Ring dimensions violate `0 < inner_radius < outer_radius`, `depth > 0`
    #[error("invalid ring: {reason}")]
    InvalidRing { reason: String },

    /// Recess requested without ring dimensions
    #[error("recess requested but no ring dimensions were supplied")]
    MissingRing,

    /// Writing a mesh or an image failed
    #[error("failed to write {path}: {reason}")]
    Output { path: PathBuf, reason: String },
}

impl ModifyError {
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate {
            reason: reason.into(),
        }
    }

    /// True for errors the pipeline recovers from by skipping a step
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Degenerate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_degenerate_is_recoverable() {
        assert!(ModifyError::degenerate("3 points").is_recoverable());
        assert!(!ModifyError::MissingRing.is_recoverable());
        assert!(!ModifyError::RepairInconsistency {
            face: 0,
            index: 9,
            vertex_count: 3
        }
        .is_recoverable());
    }

    #[test]
    fn test_messages_name_the_offending_index() {
        let err = ModifyError::RepairInconsistency {
            face: 4,
            index: 12,
            vertex_count: 10,
        };
        let message = err.to_string();
        assert!(message.contains("face 4"));
        assert!(message.contains("vertex 12"));
    }
}
