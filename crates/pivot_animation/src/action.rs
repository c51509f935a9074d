use glam::{Quat, Vec3};

use crate::segmenter::{RotationPlan, RotationSegmenter};

/// A single-tick change to a node's transform.
///
/// Deltas are relative, never cumulative: applying one moves a node by
/// `translation`, adds `scale` to its scale, and rotates it by `rotation`
/// about the point `anchor` (expressed relative to the node's position).
/// Cameras additionally move their look-at target by `target_translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformDelta {
    pub translation: Vec3,
    pub scale: Vec3,
    pub rotation: Quat,
    pub anchor: Vec3,
    pub target_translation: Vec3,
}

impl TransformDelta {
    /// The delta that changes nothing.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        scale: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        anchor: Vec3::ZERO,
        target_translation: Vec3::ZERO,
    };

    #[inline]
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    #[inline]
    #[must_use]
    pub fn from_rotation(rotation: Quat, anchor: Vec3) -> Self {
        Self {
            rotation,
            anchor,
            ..Self::IDENTITY
        }
    }

    #[inline]
    #[must_use]
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    #[inline]
    #[must_use]
    pub fn with_target_translation(mut self, target_translation: Vec3) -> Self {
        self.target_translation = target_translation;
        self
    }

    /// Returns `true` if applying the delta would leave any node unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.translation == Vec3::ZERO
            && self.scale == Vec3::ZERO
            && self.target_translation == Vec3::ZERO
            && self.rotation.is_near_identity()
    }
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Total deltas an action applies over its whole run.
///
/// Translation, scale and target translation are spread linearly over the
/// normalized time axis. Rotation follows the action's [`RotationPlan`], so
/// multi-turn rotations keep their winding.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformAction {
    translation_delta: Vec3,
    scale_delta: Vec3,
    target_translation_delta: Vec3,
    rotation_plan: RotationPlan,
    rotation_anchor: Vec3,
}

impl TransformAction {
    /// Creates an action. The rotation is segmented with the default limit.
    #[must_use]
    pub fn new(
        translation_delta: Vec3,
        scale_delta: Vec3,
        rotation_axis: Vec3,
        rotation_degrees: f32,
        rotation_anchor: Vec3,
    ) -> Self {
        Self::with_plan(
            translation_delta,
            scale_delta,
            RotationSegmenter::default().build(rotation_axis, rotation_degrees),
            rotation_anchor,
        )
    }

    #[must_use]
    pub fn with_plan(
        translation_delta: Vec3,
        scale_delta: Vec3,
        rotation_plan: RotationPlan,
        rotation_anchor: Vec3,
    ) -> Self {
        Self {
            translation_delta,
            scale_delta,
            target_translation_delta: Vec3::ZERO,
            rotation_plan,
            rotation_anchor,
        }
    }

    /// Sets the total camera target movement.
    #[must_use]
    pub fn with_target_translation(mut self, target_translation_delta: Vec3) -> Self {
        self.target_translation_delta = target_translation_delta;
        self
    }

    #[inline]
    #[must_use]
    pub fn translation_delta(&self) -> Vec3 {
        self.translation_delta
    }

    #[inline]
    #[must_use]
    pub fn scale_delta(&self) -> Vec3 {
        self.scale_delta
    }

    #[inline]
    #[must_use]
    pub fn target_translation_delta(&self) -> Vec3 {
        self.target_translation_delta
    }

    #[inline]
    #[must_use]
    pub fn rotation_plan(&self) -> &RotationPlan {
        &self.rotation_plan
    }

    #[inline]
    #[must_use]
    pub fn rotation_anchor(&self) -> Vec3 {
        self.rotation_anchor
    }

    // ========================================================================
    // Per-increment deltas
    // ========================================================================

    /// Translation for one increment. Independent of `elapsed`.
    #[inline]
    #[must_use]
    pub fn incremental_translation(&self, _elapsed: f32, increment: f32) -> Vec3 {
        self.translation_delta * increment
    }

    /// Scale change for one increment. Independent of `elapsed`.
    #[inline]
    #[must_use]
    pub fn incremental_scale(&self, _elapsed: f32, increment: f32) -> Vec3 {
        self.scale_delta * increment
    }

    #[inline]
    #[must_use]
    pub fn incremental_target_translation(&self, _elapsed: f32, increment: f32) -> Vec3 {
        self.target_translation_delta * increment
    }

    #[inline]
    #[must_use]
    pub fn incremental_rotation(&self, elapsed: f32, increment: f32) -> Quat {
        self.rotation_plan.incremental_rotation(elapsed, increment)
    }

    /// Bundles every component for the slice `[elapsed, elapsed + increment]`.
    #[must_use]
    pub fn delta_at(&self, elapsed: f32, increment: f32) -> TransformDelta {
        TransformDelta {
            translation: self.incremental_translation(elapsed, increment),
            scale: self.incremental_scale(elapsed, increment),
            rotation: self.incremental_rotation(elapsed, increment),
            anchor: self.rotation_anchor,
            target_translation: self.incremental_target_translation(elapsed, increment),
        }
    }
}
