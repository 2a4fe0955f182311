//! Error types for generator construction.
//!
//! Everything recoverable in this crate happens at construction time: a body
//! declares its suspension points and (optionally) a jump table, and both are
//! checked before the first step runs. Once a machine exists, the only failure
//! the engine itself can introduce is a corrupted resume key, which is a
//! contract violation and a panic, not a value of this type.

use thiserror::Error;

/// The result type for machine and dispatch-table construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// A contract violation detected while building a point table or jump table.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// A suspension point id does not fit in the 30-bit key field.
    #[error("suspension point id {0} exceeds the 30-bit maximum")]
    PointOutOfRange(u32),

    /// The same suspension point id was declared twice in one body.
    #[error("duplicate suspension point id {0}")]
    DuplicatePoint(u32),

    /// Point ids must be declared in strictly increasing order, mirroring the
    /// order the suspensions appear in the body's control flow.
    #[error("suspension point id {found} declared after {prev}; ids must be strictly increasing")]
    UnorderedPoint {
        /// The previously declared id.
        prev: u32,
        /// The out-of-order id.
        found: u32,
    },

    /// A jump table declares a different number of handlers than the body
    /// declares suspension points.
    #[error("jump table has {found} handlers but the body declares {expected} suspension points")]
    HandlerCount {
        /// Number of points the body declares.
        expected: usize,
        /// Number of handlers supplied.
        found: usize,
    },

    /// A jump-table slot is bound to a different point than the body declares
    /// at that position.
    #[error("jump table slot {slot} handles point id {found}, body declares {expected}")]
    HandlerPoint {
        /// Zero-based slot index.
        slot: usize,
        /// The point id the body declares at this slot.
        expected: u32,
        /// The point id the jump table bound instead.
        found: u32,
    },
}
