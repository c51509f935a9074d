//! Pivot Core
//!
//! Foundational types shared by every Pivot crate:
//!
//! - [`NodeHandle`] / [`ActionHandle`]: generational keys into the scene and
//!   scheduler arenas
//! - [`errors`]: the [`PivotError`] taxonomy and [`Result`] alias
//! - [`settings`]: serde-backed [`EngineSettings`]

pub mod errors;
pub mod settings;

pub use errors::{ObservationFault, PivotError, Result};
pub use settings::{AnchorSpace, CameraDefaults, EngineSettings, ObservationSettings, RotationSettings};

use slotmap::new_key_type;

new_key_type! {
    /// Handle of a transform node inside a scene.
    pub struct NodeHandle;
    /// Handle of a scheduled transform action.
    pub struct ActionHandle;
}
