//! Error Types
//!
//! The engine distinguishes two classes of failure:
//!
//! - **Structural errors** (observation cycles, scheduler misuse, unknown
//!   handles) are returned synchronously to the caller attempting the
//!   invalid operation. Nothing is mutated when an error is returned.
//! - **Arithmetic edge cases** (zero-duration rotation segments, zero-length
//!   rotation axes, degenerate look-at frames during an update) never surface
//!   here. They are resolved locally with identity/no-op defaults and logged,
//!   so that a frame never aborts half way through a transform update.
//!
//! All fallible public APIs return [`Result<T>`].

use thiserror::Error;

use crate::{ActionHandle, NodeHandle};

/// Why an observation link was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationFault {
    /// A node may not observe itself.
    #[error("a node cannot observe itself")]
    SelfObservation,
    /// The observer already observes this exact target.
    #[error("the link already exists")]
    Duplicate,
    /// Following the target's upstream chain leads back to the observer.
    #[error("the link would close an observation cycle")]
    Cycle,
}

/// The main error type for the Pivot engine.
#[derive(Error, Debug)]
pub enum PivotError {
    // ========================================================================
    // Scene Graph Errors
    // ========================================================================
    /// The node handle is stale or was never issued by this scene.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// Attempted to create a cyclic, reflexive or duplicate observation link.
    #[error("Invalid observation of {target:?} by {observer:?}: {fault}")]
    InvalidObservation {
        /// The node that asked to observe.
        observer: NodeHandle,
        /// The node it asked to observe.
        target: NodeHandle,
        /// The rule the link would break.
        fault: ObservationFault,
    },

    // ========================================================================
    // Camera Errors
    // ========================================================================
    /// Projection parameters outside their valid ranges.
    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    /// The eye coincides with the target or the up vector is parallel to the
    /// viewing direction.
    #[error("Degenerate camera frame: eye, target and up do not span a view basis")]
    DegenerateCamera,

    // ========================================================================
    // Scheduler Errors
    // ========================================================================
    /// The action handle is stale or was removed.
    #[error("Action not found: {0:?}")]
    ActionNotFound(ActionHandle),

    /// An action with this name is already registered.
    #[error("Duplicate action name: {0}")]
    DuplicateActionName(String),

    /// Action durations must be finite and strictly positive.
    #[error("Invalid action duration: {0}")]
    InvalidDuration(f32),

    /// A caller contract violation on the scheduler state machine.
    #[error("Scheduler misuse on {action:?}: {reason}")]
    SchedulerMisuse {
        /// The action the invalid request addressed.
        action: ActionHandle,
        /// What was wrong with the request.
        reason: &'static str,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings could not be parsed.
    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    /// Settings parsed but hold out-of-range values.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

/// Alias for `Result<T, PivotError>`.
pub type Result<T> = std::result::Result<T, PivotError>;
