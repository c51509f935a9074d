//! Engine Core Module
//!
//! [`Engine`] ties a [`Scene`] to an [`ActionScheduler`] and is advanced by
//! the host's game loop once per frame:
//!
//! ```rust,ignore
//! use pivot::{Engine, EngineSettings};
//!
//! let mut engine = Engine::new(EngineSettings::default());
//! let cube = engine.scene.create_node("Cube");
//! let spin = engine.action().rotate(Vec3::Y, 1080.0).build();
//! engine.play("spin", cube, spin, 3.0)?;
//!
//! loop {
//!     engine.update(dt);
//!     for event in engine.scheduler.drain_events() { /* chain actions */ }
//!     // ... hand view/projection matrices to the renderer ...
//! }
//! ```
//!
//! All updates happen synchronously inside [`Engine::update`]: each running
//! action applies its increment, and observers are notified transitively,
//! before the next action is ticked.

use std::borrow::Cow;

use pivot_animation::{ActionScheduler, RotationSegmenter, TransformAction, TransformActionBuilder};
use pivot_core::{ActionHandle, EngineSettings, NodeHandle, Result};
use pivot_scene::{CameraBuilder, Scene, TransformNode};

/// The per-frame driver of the transform engine.
pub struct Engine {
    pub scene: Scene,
    pub scheduler: ActionScheduler,

    settings: EngineSettings,
    time: f32,
    frame_count: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl Engine {
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        log::debug!(
            "Creating engine (segment limit {}°, anchor space {:?})",
            settings.rotation.max_segment_degrees,
            settings.observation.anchor_space
        );
        Self {
            scene: Scene::with_settings(settings.observation),
            scheduler: ActionScheduler::new(),
            settings,
            time: 0.0,
            frame_count: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Total simulated time in seconds.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Starts an action builder using the configured segment limit.
    #[must_use]
    pub fn action(&self) -> TransformActionBuilder {
        TransformActionBuilder::with_segmenter(RotationSegmenter::new(
            self.settings.rotation.max_segment_degrees,
        ))
    }

    /// Starts a camera builder using the configured camera defaults.
    #[must_use]
    pub fn camera(&self, name: impl Into<Cow<'static, str>>) -> CameraBuilder {
        CameraBuilder::with_defaults(name, &self.settings.camera)
    }

    /// Registers `action` and runs it immediately.
    pub fn play(
        &mut self,
        name: impl Into<String>,
        target: NodeHandle,
        action: TransformAction,
        duration_seconds: f32,
    ) -> Result<ActionHandle> {
        let handle = self.scheduler.add(name, target, action, duration_seconds)?;
        if let Err(err) = self.scheduler.run(handle) {
            self.scheduler.remove(handle);
            return Err(err);
        }
        Ok(handle)
    }

    /// Removes a node together with every action targeting it.
    pub fn remove_node(&mut self, handle: NodeHandle) -> Option<TransformNode> {
        self.scheduler.remove_target(handle);
        self.scene.remove_node(handle)
    }

    /// Advances the whole system by `dt` seconds. Returns the number of
    /// action updates applied.
    ///
    /// A negative or non-finite `dt` is ignored: time, frame count and
    /// actions are left untouched.
    pub fn update(&mut self, dt: f32) -> usize {
        if !(dt.is_finite() && dt >= 0.0) {
            log::warn!("Ignoring engine update with dt = {dt}");
            return 0;
        }
        self.time += dt;
        self.frame_count += 1;
        self.scheduler.tick(dt, &mut self.scene)
    }
}
