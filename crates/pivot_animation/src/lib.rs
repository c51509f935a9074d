//! Pivot Animation
//!
//! Time-sliced transform actions:
//!
//! - [`RotationSegmenter`] splits a rotation of any magnitude into a
//!   [`RotationPlan`] of winding-safe segments
//! - [`IncrementalRotationEvaluator`] turns a slice of that plan into one
//!   rotation delta
//! - [`TransformAction`] bundles translation, scale and rotation totals and
//!   hands out per-increment [`TransformDelta`]s
//! - [`ActionScheduler`] advances named actions from wall-clock time and
//!   feeds an [`ActionTarget`]

pub mod action;
pub mod builder;
pub mod evaluator;
pub mod scheduler;
pub mod segmenter;

pub use action::{TransformAction, TransformDelta};
pub use builder::TransformActionBuilder;
pub use evaluator::IncrementalRotationEvaluator;
pub use scheduler::{ActionEvent, ActionRunState, ActionRunner, ActionScheduler, ActionTarget, RunStatus};
pub use segmenter::{MAX_PLAN_SEGMENTS, RotationPlan, RotationSegment, RotationSegmenter};
