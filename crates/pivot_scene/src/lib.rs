//! Pivot Scene
//!
//! Transform nodes and the links between them:
//!
//! - [`TransformNode`]: world transform composed from incremental deltas
//! - [`observer`]: single-upstream observation links and delta fan-out
//! - [`camera`]: look-at cameras tracking a target, with projection
//! - [`Scene`]: the node arena, and the [`ActionTarget`](pivot_animation::ActionTarget)
//!   the scheduler drives

pub mod builder;
pub mod camera;
pub mod node;
pub mod observer;
pub mod scene;

pub use builder::CameraBuilder;
pub use camera::{CameraEvent, CameraState, Projection};
pub use node::{NodeKind, TransformNode};
pub use observer::ObservationLink;
pub use scene::Scene;
