//! Error taxonomy (spec.md §7). The core never logs as control flow; every
//! failure is a return value the host decides how to handle.

use thiserror::Error;

/// Component and entity-level failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// Entity creation (or, for a component whose dense array cannot grow,
    /// component insertion) exceeded the configured `EntityLimit`.
    #[error("entity limit of {capacity} exceeded")]
    EntityLimitExceeded { capacity: usize },

    /// A component operation targeted a destroyed or never-created entity.
    #[error("entity {0:?} is not alive")]
    InvalidEntity(crate::entity::Entity),
}

/// Rollback-history failures (spec.md §4.7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RollbackError {
    #[error("frame {target} is out of the retained range [{oldest}, {current}]")]
    FrameOutOfRange {
        target: u64,
        oldest: u64,
        current: u64,
    },

    #[error("no snapshot found at or below frame {target}")]
    SnapshotNotFound { target: u64 },

    /// A registered system callback failed mid-tick. The tick is aborted and
    /// history is left untouched (spec.md §4.7 failure semantics).
    #[error("system '{system}' failed on frame {frame}: {reason}")]
    SystemFailed {
        system: &'static str,
        frame: u64,
        reason: String,
    },
}
