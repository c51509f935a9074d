//! Rotation segmentation.
//!
//! A single quaternion cannot express how many times, or in which direction,
//! a node should spin: `q` and `-q` describe the same orientation and slerp
//! always follows the shorter arc. A rotation of arbitrary magnitude is
//! therefore broken into a [`RotationPlan`] of segments that each turn by
//! less than 180°, and every segment is given its own slice of the action's
//! normalized `[0, 1]` time axis.

use glam::{Quat, Vec3};
use pivot_core::settings::DEFAULT_MAX_SEGMENT_DEGREES;

/// Upper bound on the number of segments in a single plan.
pub const MAX_PLAN_SEGMENTS: usize = 1 << 16;

/// One chunk of a segmented rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSegment {
    /// Rotation performed over the whole segment window.
    pub quaternion: Quat,
    /// Normalized time at which the segment window opens.
    pub start_fraction: f32,
    /// Normalized length of the segment window.
    pub duration_fraction: f32,
    /// Signed angle covered by the segment.
    pub rotation_degrees: f32,
}

impl RotationSegment {
    /// Normalized time at which the segment window closes.
    #[inline]
    #[must_use]
    pub fn end_fraction(&self) -> f32 {
        self.start_fraction + self.duration_fraction
    }
}

/// Ordered, contiguous segments tiling the normalized time axis.
///
/// Built once by [`RotationSegmenter::build`] and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationPlan {
    segments: Vec<RotationSegment>,
    axis: Vec3,
    total_degrees: f32,
}

impl RotationPlan {
    /// A plan that never rotates: one identity segment spanning `[0, 1]`.
    #[must_use]
    pub fn identity() -> Self {
        RotationSegmenter::default().build(Vec3::Y, 0.0)
    }

    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[RotationSegment] {
        &self.segments
    }

    /// The normalized rotation axis, or zero if the requested axis was degenerate.
    #[inline]
    #[must_use]
    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    /// The signed angle the whole plan covers.
    #[inline]
    #[must_use]
    pub fn total_degrees(&self) -> f32 {
        self.total_degrees
    }

    /// Rotation to apply for the time slice `[elapsed, elapsed + increment]`.
    ///
    /// See [`IncrementalRotationEvaluator`](crate::evaluator::IncrementalRotationEvaluator).
    #[inline]
    #[must_use]
    pub fn incremental_rotation(&self, elapsed_fraction: f32, increment_fraction: f32) -> Quat {
        crate::evaluator::IncrementalRotationEvaluator::evaluate(
            self,
            elapsed_fraction,
            increment_fraction,
        )
    }
}

/// Splits axis/angle rotations into winding-safe [`RotationPlan`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSegmenter {
    max_segment_degrees: f32,
}

impl Default for RotationSegmenter {
    fn default() -> Self {
        Self {
            max_segment_degrees: DEFAULT_MAX_SEGMENT_DEGREES,
        }
    }
}

impl RotationSegmenter {
    /// Creates a segmenter with a custom segment limit.
    ///
    /// Limits outside `(0, 180)` fall back to
    /// [`DEFAULT_MAX_SEGMENT_DEGREES`].
    #[must_use]
    pub fn new(max_segment_degrees: f32) -> Self {
        if max_segment_degrees > 0.0 && max_segment_degrees < 180.0 {
            Self { max_segment_degrees }
        } else {
            log::warn!(
                "Segment limit {max_segment_degrees}° is not winding-safe, using {DEFAULT_MAX_SEGMENT_DEGREES}°"
            );
            Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn max_segment_degrees(&self) -> f32 {
        self.max_segment_degrees
    }

    /// Builds the plan for a rotation of `signed_degrees` about `axis`.
    ///
    /// `axis` need not be normalized. A zero-length axis produces identity
    /// segments with the same timing, so the action still runs its course
    /// without turning.
    ///
    /// Every finite angle is accepted. A non-finite angle becomes an identity
    /// plan, and an angle needing more than [`MAX_PLAN_SEGMENTS`] segments is
    /// reduced to its net rotation modulo 360°. Both cases log a warning.
    #[must_use]
    pub fn build(&self, axis: Vec3, signed_degrees: f32) -> RotationPlan {
        let limit = self.max_segment_degrees;
        let axis = axis.try_normalize().unwrap_or_else(|| {
            log::warn!("Rotation axis {axis} cannot be normalized, rotation becomes identity");
            Vec3::ZERO
        });
        let quat = |degrees: f32| {
            if axis == Vec3::ZERO {
                Quat::IDENTITY
            } else {
                Quat::from_axis_angle(axis, degrees.to_radians())
            }
        };

        let signed_degrees = self.bounded_degrees(signed_degrees);
        let total_abs = signed_degrees.abs();
        let direction = if signed_degrees < 0.0 { -1.0 } else { 1.0 };

        // 1. Count full-limit chunks; division rounding can land one off at
        //    exact multiples of the limit.
        let mut full_segments = ((total_abs / limit).ceil() as usize).saturating_sub(1);
        let mut remaining = total_abs - full_segments as f32 * limit;
        if remaining <= 0.0 && full_segments > 0 {
            full_segments -= 1;
            remaining += limit;
        } else if remaining > limit {
            full_segments += 1;
            remaining -= limit;
        }

        let mut segments = Vec::with_capacity(full_segments + 1);

        // 2. Allocate time proportionally to angular travel
        if full_segments > 0 && total_abs > 0.0 {
            let full_fraction = (full_segments as f32 * limit) / total_abs;
            let per_segment = full_fraction / full_segments as f32;
            let full_quat = quat(limit * direction);

            for i in 0..full_segments {
                segments.push(RotationSegment {
                    quaternion: full_quat,
                    start_fraction: i as f32 * per_segment,
                    duration_fraction: per_segment,
                    rotation_degrees: limit * direction,
                });
            }

            // 3. The remainder takes whatever is left of the window
            segments.push(RotationSegment {
                quaternion: quat(remaining * direction),
                start_fraction: full_fraction,
                duration_fraction: 1.0 - full_fraction,
                rotation_degrees: remaining * direction,
            });
        } else {
            segments.push(RotationSegment {
                quaternion: quat(remaining * direction),
                start_fraction: 0.0,
                duration_fraction: 1.0,
                rotation_degrees: signed_degrees,
            });
        }

        log::trace!(
            "Segmented {signed_degrees}° about {axis} into {} segment(s)",
            segments.len()
        );

        RotationPlan {
            segments,
            axis,
            total_degrees: signed_degrees,
        }
    }

    /// Maps `signed_degrees` into the range a plan can represent.
    fn bounded_degrees(&self, signed_degrees: f32) -> f32 {
        if !signed_degrees.is_finite() {
            log::warn!("Rotation of {signed_degrees}° is not finite, rotation becomes identity");
            return 0.0;
        }

        let max_degrees = self.max_segment_degrees * MAX_PLAN_SEGMENTS as f32;
        if signed_degrees.abs() > max_degrees {
            let net = signed_degrees % 360.0;
            log::warn!("Rotation of {signed_degrees}° exceeds {max_degrees}°, reduced to its net {net}°");
            return net;
        }

        signed_degrees
    }
}
