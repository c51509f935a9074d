//! # Pivot
//!
//! A scene-graph transform engine. Nodes carry world transforms that change
//! through incremental deltas; deltas are produced by time-sliced actions and
//! replicated to observing nodes and cameras.
//!
//! - [`animation`]: rotation segmentation, transform actions, the scheduler
//! - [`scene`]: transform nodes, observation links, cameras
//! - [`errors`] / [`settings`]: the error taxonomy and engine configuration
//! - [`Engine`]: the per-frame driver

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;

pub use pivot_animation as animation;
pub use pivot_core::{errors, settings};
pub use pivot_scene as scene;

pub use engine::Engine;
pub use pivot_animation::{
    ActionEvent, ActionScheduler, RotationPlan, RotationSegmenter, RunStatus, TransformAction,
    TransformActionBuilder, TransformDelta,
};
pub use pivot_core::{ActionHandle, AnchorSpace, EngineSettings, NodeHandle, PivotError, Result};
pub use pivot_scene::{CameraBuilder, CameraEvent, ObservationLink, Projection, Scene, TransformNode};
