//! Camera construction.
//!
//! ```rust,ignore
//! let camera = scene.add_camera(
//!     CameraBuilder::new("Main")
//!         .position(Vec3::new(0.0, 2.0, 10.0))
//!         .target(Vec3::ZERO)
//!         .perspective(45.0, 16.0 / 9.0, 0.1, 500.0),
//! )?;
//! ```
#![allow(clippy::return_self_not_must_use)]

use std::borrow::Cow;

use glam::Vec3;
use pivot_core::{CameraDefaults, Result};

use crate::camera::{CameraState, Projection};
use crate::node::TransformNode;

#[derive(Debug, Clone)]
pub struct CameraBuilder {
    name: Cow<'static, str>,
    position: Vec3,
    target: Vec3,
    up: Vec3,
    projection: Projection,
}

impl CameraBuilder {
    /// A perspective camera at `(0, 0, 10)` looking at the origin.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_defaults(name, &CameraDefaults::default())
    }

    /// Same as [`new`](Self::new) but with the projection and up vector
    /// taken from `defaults`. The aspect ratio starts at 1.
    #[must_use]
    pub fn with_defaults(name: impl Into<Cow<'static, str>>, defaults: &CameraDefaults) -> Self {
        Self {
            name: name.into(),
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: defaults.up,
            projection: Projection::perspective(defaults.fov_y_degrees, 1.0, defaults.near, defaults.far),
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    pub fn perspective(mut self, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        self.projection = Projection::perspective(fov_y_degrees, aspect, near, far);
        self
    }

    pub fn orthographic(mut self, half_height: f32, aspect: f32, near: f32, far: f32) -> Self {
        self.projection = Projection::orthographic(half_height, aspect, near, far);
        self
    }

    pub fn aspect(mut self, aspect: f32) -> Self {
        self.projection = self.projection.with_aspect(aspect);
        self
    }

    /// Validates the configuration and computes the initial matrices.
    pub fn build(self) -> Result<TransformNode> {
        let camera = CameraState::new(self.position, self.target, self.up, self.projection)?;
        Ok(TransformNode::camera(self.name, self.position, camera))
    }
}
