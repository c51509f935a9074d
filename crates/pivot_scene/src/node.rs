use std::borrow::Cow;

use glam::{Mat4, Quat, Vec3};
use pivot_animation::TransformDelta;
use pivot_core::NodeHandle;
use smallvec::SmallVec;

use crate::camera::{CameraState, look_at_view};
use crate::observer::ObservationLink;

/// What a node does with the deltas it receives.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Composes deltas into a TRS world matrix.
    Generic,
    /// Turns deltas into a look-at view matrix around a tracked target.
    Camera(Box<CameraState>),
}

/// Outcome of applying one delta to one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AppliedDelta {
    /// World-space point the rotation was applied about.
    pub pivot: Vec3,
    /// Set when a camera recomputed its view matrix.
    pub view_changed: bool,
    /// Cleared when the node skipped the delta and kept its previous state.
    pub applied: bool,
}

/// A scene-graph node with a world transform driven by incremental deltas.
///
/// # Transform
///
/// The node keeps its decomposed state (position, rotation, scale) and
/// derives `world_matrix` from it after every delta. Applying
/// `(t, s, r, a)` is equivalent to
///
/// ```text
/// world = T(p + t) · T(a) · r · T(-a) · R · S'      with S' = S + s
/// ```
///
/// i.e. the rotation delta turns the node about a pivot offset by `a` from
/// its translated position, and is composed ahead of its previous rotation.
///
/// # Observation
///
/// A node observes at most one other node and may be observed by many.
/// Links are managed by [`Scene::observe`](crate::scene::Scene::observe).
#[derive(Debug, Clone)]
pub struct TransformNode {
    pub name: Cow<'static, str>,

    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    world_matrix: Mat4,

    /// Delta being applied; identity outside of `apply_delta`.
    pending: TransformDelta,

    pub(crate) observers: SmallVec<[NodeHandle; 4]>,
    pub(crate) observed: Option<ObservationLink>,

    kind: NodeKind,

    revision: u64,
    last_delta: Option<TransformDelta>,
}

impl TransformNode {
    /// Creates a node at the origin with identity transform.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self::at(name, Vec3::ZERO)
    }

    /// Creates a node at `position`.
    #[must_use]
    pub fn at(name: impl Into<Cow<'static, str>>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            world_matrix: Mat4::from_translation(position),
            pending: TransformDelta::IDENTITY,
            observers: SmallVec::new(),
            observed: None,
            kind: NodeKind::Generic,
            revision: 0,
            last_delta: None,
        }
    }

    /// Creates a camera node looking from `eye` towards the camera's target.
    pub(crate) fn camera(name: impl Into<Cow<'static, str>>, eye: Vec3, camera: CameraState) -> Self {
        let world_matrix = camera.view_matrix.inverse();
        let (_, rotation, _) = world_matrix.to_scale_rotation_translation();
        Self {
            rotation,
            world_matrix,
            kind: NodeKind::Camera(Box::new(camera)),
            ..Self::at(name, eye)
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_camera(&self) -> bool {
        matches!(self.kind, NodeKind::Camera(_))
    }

    #[inline]
    #[must_use]
    pub fn camera_state(&self) -> Option<&CameraState> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(&**camera),
            NodeKind::Generic => None,
        }
    }

    #[inline]
    pub(crate) fn camera_state_mut(&mut self) -> Option<&mut CameraState> {
        match &mut self.kind {
            NodeKind::Camera(camera) => Some(&mut **camera),
            NodeKind::Generic => None,
        }
    }

    /// Nodes that replicate this node's deltas.
    #[inline]
    #[must_use]
    pub fn observers(&self) -> &[NodeHandle] {
        &self.observers
    }

    /// The node this one replicates, if any.
    #[inline]
    #[must_use]
    pub fn observed(&self) -> Option<NodeHandle> {
        self.observed.map(|link| link.target)
    }

    #[inline]
    #[must_use]
    pub fn observation(&self) -> Option<&ObservationLink> {
        self.observed.as_ref()
    }

    /// Number of deltas applied since creation. Degenerate camera updates
    /// that were skipped do not count.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    #[must_use]
    pub fn last_delta(&self) -> Option<&TransformDelta> {
        self.last_delta.as_ref()
    }

    // ========================================================================
    // Delta application
    // ========================================================================

    /// Applies one delta to this node only. Fan-out to observers is the
    /// scene's job.
    pub(crate) fn apply_delta(&mut self, delta: &TransformDelta) -> AppliedDelta {
        self.pending = *delta;

        let applied = if self.is_camera() {
            self.apply_pending_camera()
        } else {
            self.apply_pending_generic()
        };

        self.pending = TransformDelta::IDENTITY;
        if applied.applied {
            self.revision += 1;
            self.last_delta = Some(*delta);
        }
        applied
    }

    fn apply_pending_generic(&mut self) -> AppliedDelta {
        let pending = self.pending;

        // Scale is additive and commutes with everything else.
        self.scale += pending.scale;

        let pivot = self.position + pending.translation + pending.anchor;
        let rotation = pending.rotation.normalize();

        self.position = pivot - rotation * pending.anchor;
        self.rotation = (rotation * self.rotation).normalize();
        self.world_matrix = Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position);

        AppliedDelta {
            pivot,
            view_changed: false,
            applied: true,
        }
    }

    fn apply_pending_camera(&mut self) -> AppliedDelta {
        let pending = self.pending;
        let position = self.position;
        let NodeKind::Camera(camera) = &mut self.kind else {
            return AppliedDelta {
                pivot: position,
                view_changed: false,
                applied: false,
            };
        };

        let rotation = pending.rotation.normalize();
        let target = camera.target + pending.target_translation;
        let eye = rotation * (position + pending.translation - target) + target;
        let up = (rotation * camera.up).try_normalize().unwrap_or(camera.up);

        let Some(view) = look_at_view(eye, target, up) else {
            log::warn!(
                "Camera '{}' skipped a degenerate update (eye {eye}, target {target}, up {up})",
                self.name
            );
            return AppliedDelta {
                pivot: camera.target,
                view_changed: false,
                applied: false,
            };
        };

        camera.target = target;
        camera.up = up;
        camera.view_matrix = view;

        self.world_matrix = view.inverse();
        let (_, world_rotation, _) = self.world_matrix.to_scale_rotation_translation();
        self.rotation = world_rotation;
        self.position = eye;

        AppliedDelta {
            pivot: target,
            view_changed: true,
            applied: true,
        }
    }
}
