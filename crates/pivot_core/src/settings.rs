//! Engine Settings
//!
//! Runtime configuration for the transform engine. Every field has a
//! sensible default, so partial JSON documents are accepted:
//!
//! ```rust,ignore
//! use pivot_core::EngineSettings;
//!
//! let settings = EngineSettings::from_json_str(r#"{
//!     "rotation": { "max_segment_degrees": 90.0 },
//!     "observation": { "anchor_space": "ObservedRelative" }
//! }"#)?;
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{PivotError, Result};

/// Largest single-quaternion rotation a segment may carry, in degrees.
///
/// Must stay strictly below 180°: at 180° and beyond a quaternion no longer
/// encodes the direction of travel and slerp picks the shortest arc.
pub const DEFAULT_MAX_SEGMENT_DEGREES: f32 = 179.0;

// ---------------------------------------------------------------------------
// AnchorSpace
// ---------------------------------------------------------------------------

/// How a rotation anchor is interpreted when a delta is forwarded to an
/// observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnchorSpace {
    /// The anchor is forwarded verbatim and read relative to the observer's
    /// own position. An observer rotating "in sync" spins about its own
    /// offset pivot.
    #[default]
    ObserverLocal,
    /// The anchor is re-expressed so that the observer pivots about the same
    /// world-space point as the observed node.
    ObservedRelative,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Rotation segmentation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    /// Maximum angle of one plan segment. Valid range is `(0, 180)`.
    pub max_segment_degrees: f32,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            max_segment_degrees: DEFAULT_MAX_SEGMENT_DEGREES,
        }
    }
}

/// Defaults applied to new observation links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationSettings {
    pub anchor_space: AnchorSpace,
    /// When a camera receives a forwarded delta, also move its target by the
    /// forwarded translation so it keeps framing the observed node.
    pub carry_target: bool,
}

/// Defaults used by camera builders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDefaults {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub up: Vec3,
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            up: Vec3::Y,
        }
    }
}

// ---------------------------------------------------------------------------
// EngineSettings
// ---------------------------------------------------------------------------

/// Top-level engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub rotation: RotationSettings,
    pub observation: ObservationSettings,
    pub camera: CameraDefaults,
}

impl EngineSettings {
    /// Parses settings from JSON and validates them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes the settings to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every field against its valid range.
    pub fn validate(&self) -> Result<()> {
        let max = self.rotation.max_segment_degrees;
        if !(max > 0.0 && max < 180.0) {
            return Err(PivotError::InvalidSettings(format!(
                "rotation.max_segment_degrees must lie in (0, 180), got {max}"
            )));
        }

        let camera = &self.camera;
        if !(camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0) {
            return Err(PivotError::InvalidSettings(format!(
                "camera.fov_y_degrees must lie in (0, 180), got {}",
                camera.fov_y_degrees
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(PivotError::InvalidSettings(format!(
                "camera clip range must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if camera.up.length_squared() < f32::EPSILON {
            return Err(PivotError::InvalidSettings(
                "camera.up must not be the zero vector".to_string(),
            ));
        }

        Ok(())
    }
}
