//! Fluent construction of [`TransformAction`]s.
//!
//! ```rust,ignore
//! let orbit = TransformActionBuilder::new()
//!     .rotate_around(Vec3::Y, 720.0, Vec3::new(0.0, 0.0, -5.0))
//!     .move_up(2.0)
//!     .build();
//! ```
//!
//! Directions follow the right-handed, Y-up convention: forward is `-Z`.
#![allow(clippy::return_self_not_must_use)]

use glam::Vec3;

use crate::action::TransformAction;
use crate::segmenter::RotationSegmenter;

#[derive(Debug, Clone)]
pub struct TransformActionBuilder {
    segmenter: RotationSegmenter,
    translation: Vec3,
    scale: Vec3,
    target_translation: Vec3,
    rotation_axis: Vec3,
    rotation_degrees: f32,
    anchor: Vec3,
}

impl Default for TransformActionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformActionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_segmenter(RotationSegmenter::default())
    }

    /// Uses `segmenter` to split the rotation when [`build`](Self::build) runs.
    #[must_use]
    pub fn with_segmenter(segmenter: RotationSegmenter) -> Self {
        Self {
            segmenter,
            translation: Vec3::ZERO,
            scale: Vec3::ZERO,
            target_translation: Vec3::ZERO,
            rotation_axis: Vec3::Y,
            rotation_degrees: 0.0,
            anchor: Vec3::ZERO,
        }
    }

    // -- Translation --

    pub fn translate(mut self, offset: Vec3) -> Self {
        self.translation += offset;
        self
    }

    pub fn move_left(self, amount: f32) -> Self {
        self.translate(Vec3::NEG_X * amount)
    }

    pub fn move_right(self, amount: f32) -> Self {
        self.translate(Vec3::X * amount)
    }

    pub fn move_up(self, amount: f32) -> Self {
        self.translate(Vec3::Y * amount)
    }

    pub fn move_down(self, amount: f32) -> Self {
        self.translate(Vec3::NEG_Y * amount)
    }

    pub fn move_forward(self, amount: f32) -> Self {
        self.translate(Vec3::NEG_Z * amount)
    }

    pub fn move_backward(self, amount: f32) -> Self {
        self.translate(Vec3::Z * amount)
    }

    // -- Scale --

    /// Adds `amount` to the node's scale over the action.
    pub fn scale_by(mut self, amount: Vec3) -> Self {
        self.scale += amount;
        self
    }

    pub fn scale_uniform(self, amount: f32) -> Self {
        self.scale_by(Vec3::splat(amount))
    }

    // -- Rotation --

    /// Rotates by `degrees` about `axis` through the node's own position.
    ///
    /// An action carries one rotation; a later call replaces an earlier one.
    pub fn rotate(mut self, axis: Vec3, degrees: f32) -> Self {
        self.rotation_axis = axis;
        self.rotation_degrees = degrees;
        self
    }

    /// Rotates about a pivot offset from the node by `anchor`.
    pub fn rotate_around(self, axis: Vec3, degrees: f32, anchor: Vec3) -> Self {
        self.rotate(axis, degrees).anchor(anchor)
    }

    pub fn anchor(mut self, anchor: Vec3) -> Self {
        self.anchor = anchor;
        self
    }

    // -- Camera target --

    /// Moves a camera's look-at target without moving the eye.
    pub fn track_target(mut self, offset: Vec3) -> Self {
        self.target_translation += offset;
        self
    }

    /// Moves both eye and target, sliding the view sideways or vertically.
    pub fn pan(self, offset: Vec3) -> Self {
        self.translate(offset).track_target(offset)
    }

    pub fn pan_left(self, amount: f32) -> Self {
        self.pan(Vec3::NEG_X * amount)
    }

    pub fn pan_right(self, amount: f32) -> Self {
        self.pan(Vec3::X * amount)
    }

    pub fn pan_up(self, amount: f32) -> Self {
        self.pan(Vec3::Y * amount)
    }

    pub fn pan_down(self, amount: f32) -> Self {
        self.pan(Vec3::NEG_Y * amount)
    }

    #[must_use]
    pub fn build(self) -> TransformAction {
        let plan = self.segmenter.build(self.rotation_axis, self.rotation_degrees);
        TransformAction::with_plan(self.translation, self.scale, plan, self.anchor)
            .with_target_translation(self.target_translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_moves_eye_and_target_together() {
        let action = TransformActionBuilder::new().pan_left(3.0).build();
        assert_eq!(action.translation_delta(), Vec3::new(-3.0, 0.0, 0.0));
        assert_eq!(action.target_translation_delta(), Vec3::new(-3.0, 0.0, 0.0));
    }

    #[test]
    fn moves_accumulate() {
        let action = TransformActionBuilder::new()
            .move_right(2.0)
            .move_up(1.0)
            .move_forward(4.0)
            .build();
        assert_eq!(action.translation_delta(), Vec3::new(2.0, 1.0, -4.0));
        assert_eq!(action.target_translation_delta(), Vec3::ZERO);
    }

    #[test]
    fn custom_segmenter_is_used() {
        let action = TransformActionBuilder::with_segmenter(RotationSegmenter::new(90.0))
            .rotate(Vec3::X, 270.0)
            .build();
        assert_eq!(action.rotation_plan().segments().len(), 3);
    }
}
