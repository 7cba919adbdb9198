//! Error Types
//!
//! This module defines the error types used throughout the costume engine.
//!
//! # Overview
//!
//! The main error type [`CostumeError`] covers:
//! - Malformed costume resources (fatal at load time)
//! - Out-of-range chore and component indices (local to the failing call)
//! - Colormap lookups the resource collaborator cannot satisfy
//!
//! Name lookups that miss (a chore name nobody declared, for instance) are not
//! errors; they surface as `None` or `false`.
//!
//! ```rust,ignore
//! use costume_core::errors::{CostumeError, Result};
//!
//! fn play(index: usize) -> Result<()> {
//!     Err(CostumeError::out_of_range("chore", index, 0))
//! }
//! ```

use thiserror::Error;

/// The main error type for the costume engine.
#[derive(Error, Debug)]
pub enum CostumeError {
    // ========================================================================
    // Load-time Errors
    // ========================================================================
    /// The resource blob could not be turned into a costume.
    ///
    /// `line` is 1-based; `0` means the problem is not tied to a line
    /// (for example a description assembled in code).
    #[error("Malformed costume resource (line {line}): {message}")]
    MalformedResource {
        /// Line of the resource where the problem was detected
        line: usize,
        /// Human readable description
        message: String,
    },

    /// Settings JSON failed to parse.
    #[error("Invalid costume settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),

    // ========================================================================
    // Runtime Errors
    // ========================================================================
    /// A chore or component index beyond the table size.
    #[error("{context} index out of range: {index} (len: {len})")]
    IndexOutOfRange {
        /// Which table was being accessed
        context: &'static str,
        /// The invalid index
        index: usize,
        /// Table size at the time of the call
        len: usize,
    },

    /// The resource collaborator does not know the requested colormap.
    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    /// Re-parenting would make a component its own ancestor.
    #[error("Cannot parent component {child} under {parent}: would create a cycle")]
    HierarchyCycle {
        /// Component being moved
        child: usize,
        /// Requested new parent
        parent: usize,
    },
}

impl CostumeError {
    /// Shorthand for [`CostumeError::MalformedResource`].
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedResource {
            line,
            message: message.into(),
        }
    }

    /// Shorthand for [`CostumeError::IndexOutOfRange`].
    #[must_use]
    pub fn out_of_range(context: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            context,
            index,
            len,
        }
    }

    /// True for load-time failures that abort construction.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResource { .. })
    }
}

/// Alias for `Result<T, CostumeError>`.
pub type Result<T> = std::result::Result<T, CostumeError>;
