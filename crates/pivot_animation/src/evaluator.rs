//! Incremental rotation evaluation.

use glam::Quat;

use crate::segmenter::RotationPlan;

/// Turns a time slice of a [`RotationPlan`] into a single rotation delta.
pub struct IncrementalRotationEvaluator;

impl IncrementalRotationEvaluator {
    /// Composes the rotation covered by `[elapsed, elapsed + increment]`.
    ///
    /// Every segment whose window overlaps the slice contributes
    /// `slerp(IDENTITY, q, overlap / duration)`. Contributions are
    /// right-multiplied in segment order, so earlier segments are applied
    /// first. Segments with an empty window contribute nothing.
    #[must_use]
    pub fn evaluate(plan: &RotationPlan, elapsed_fraction: f32, increment_fraction: f32) -> Quat {
        let mut result = Quat::IDENTITY;
        if increment_fraction <= 0.0 {
            return result;
        }

        let slice_end = elapsed_fraction + increment_fraction;
        let mut unconsumed = increment_fraction;

        for segment in plan.segments() {
            if unconsumed <= 0.0 {
                break;
            }
            if segment.duration_fraction <= 0.0 {
                log::trace!("Skipping empty rotation segment at {}", segment.start_fraction);
                continue;
            }

            let segment_end = segment.end_fraction();
            if segment_end <= elapsed_fraction {
                continue;
            }
            if segment.start_fraction >= slice_end {
                break;
            }

            let overlap = slice_end.min(segment_end) - elapsed_fraction.max(segment.start_fraction);
            if overlap <= 0.0 {
                continue;
            }

            let fraction_of_segment = (overlap / segment.duration_fraction).min(1.0);
            result *= Quat::IDENTITY.slerp(segment.quaternion, fraction_of_segment);
            unconsumed -= overlap;
        }

        result.normalize()
    }
}
