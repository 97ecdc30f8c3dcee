//! Typed error kinds the core distinguishes, per the solver's error design.
//!
//! Placement and compaction failures are never represented here: a package
//! that can't be placed is *data* (an unplaced id), not an error. Only the
//! validator is allowed to raise [`SolverError::InvariantViolation`].

use thiserror::Error;

use crate::entities::PackageId;

pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Missing required fields, non-positive dimensions, `fragile && heavy`,
    /// or an empty `placeable_on` set.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// One or more priority packages could not be placed under any
    /// configuration produced by the search.
    #[error("infeasible: {} priority package(s) could not be placed: {unplaced_priority:?}", unplaced_priority.len())]
    Infeasible { unplaced_priority: Vec<PackageId> },

    /// The validator detected a broken invariant on a layout that claimed
    /// to be valid. This always indicates a bug in the core, never a
    /// property of the input.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A weight or volume aggregate overflowed its declared capacity.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// An adapter-layer I/O failure (reading/writing files or sockets).
    #[error("I/O error: {0}")]
    IoError(String),

    /// An adapter-layer parse failure (malformed CSV/JSON).
    #[error("parse error: {0}")]
    ParseError(String),
}
