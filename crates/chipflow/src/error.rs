//! Error types for Chipflow operations.
//!
//! This module provides the main error type [`ChipflowError`]. The layout
//! engine itself never fails; errors only arise at the edges, when reading
//! scenes and configuration.

use std::{io, ops::Range};

use thiserror::Error;

/// The main error type for Chipflow operations.
///
/// # Diagnostic Variants
///
/// The `Scene` variant carries the scene source and, when known, the byte
/// range of the offending value, so callers can render a source snippet.
#[derive(Debug, Error)]
pub enum ChipflowError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{message}")]
    Scene {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChipflowError {
    /// Create a new `Scene` error with the associated source code.
    pub fn new_scene_error(
        message: impl Into<String>,
        span: Option<Range<usize>>,
        src: impl Into<String>,
    ) -> Self {
        Self::Scene {
            message: message.into(),
            span,
            src: src.into(),
        }
    }
}
