use std::borrow::Cow;

use glam::{Mat4, Vec3};
use pivot_animation::{ActionTarget, TransformAction, TransformDelta};
use pivot_core::{NodeHandle, ObservationSettings, PivotError, Result};
use slotmap::SlotMap;

use crate::builder::CameraBuilder;
use crate::camera::{CameraEvent, CameraState, Projection};
use crate::node::TransformNode;
use crate::observer::{self, ObservationLink};

/// Arena of transform nodes plus the observation links between them.
///
/// The scene is the only writer of node state: transforms change through
/// [`apply_transform_delta`](Self::apply_transform_delta) (directly or via
/// the action scheduler), projections through
/// [`set_projection`](Self::set_projection).
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, TransformNode>,
    observation: ObservationSettings,
    camera_events: Vec<CameraEvent>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scene whose new observation links use `observation`.
    #[must_use]
    pub fn with_settings(observation: ObservationSettings) -> Self {
        Self {
            observation,
            ..Self::default()
        }
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    pub fn add_node(&mut self, node: TransformNode) -> NodeHandle {
        self.nodes.insert(node)
    }

    pub fn create_node(&mut self, name: impl Into<Cow<'static, str>>) -> NodeHandle {
        self.add_node(TransformNode::new(name))
    }

    pub fn create_node_at(&mut self, name: impl Into<Cow<'static, str>>, position: Vec3) -> NodeHandle {
        self.add_node(TransformNode::at(name, position))
    }

    pub fn add_camera(&mut self, builder: CameraBuilder) -> Result<NodeHandle> {
        let node = builder.build()?;
        Ok(self.add_node(node))
    }

    /// Removes a node after detaching it from the observer graph: its own
    /// upstream link is dropped and every node observing it is released.
    pub fn remove_node(&mut self, handle: NodeHandle) -> Option<TransformNode> {
        if !self.nodes.contains_key(handle) {
            return None;
        }

        observer::unlink(&mut self.nodes, handle);
        let dependents = self.nodes[handle].observers.clone();
        for dependent in dependents {
            observer::unlink(&mut self.nodes, dependent);
        }

        let node = self.nodes.remove(handle);
        log::debug!("Removed node {handle:?}");
        node
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&TransformNode> {
        self.nodes.get(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &TransformNode)> {
        self.nodes.iter()
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Makes `observer` replicate the deltas of `target`, replacing any
    /// previous upstream link. `None` clears the observation.
    ///
    /// Self-observation, re-registering the current target and links that
    /// would close a cycle are rejected without changing anything.
    pub fn observe(&mut self, observer: NodeHandle, target: Option<NodeHandle>) -> Result<()> {
        match target {
            Some(target) => {
                let link = ObservationLink::with_settings(target, &self.observation);
                self.observe_with(observer, link)
            }
            None => {
                if !self.nodes.contains_key(observer) {
                    return Err(PivotError::NodeNotFound(observer));
                }
                observer::unlink(&mut self.nodes, observer);
                Ok(())
            }
        }
    }

    /// Like [`observe`](Self::observe) with explicit link options.
    pub fn observe_with(&mut self, observer: NodeHandle, link: ObservationLink) -> Result<()> {
        observer::validate_link(&self.nodes, observer, link.target)?;
        observer::unlink(&mut self.nodes, observer);
        observer::link(&mut self.nodes, observer, link);
        Ok(())
    }

    #[must_use]
    pub fn observers_of(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.nodes.get(handle).map(TransformNode::observers).unwrap_or_default()
    }

    #[must_use]
    pub fn observed_by(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(handle).and_then(TransformNode::observed)
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Applies `delta` to `handle` and, transitively, to every node observing
    /// it. Returns the number of nodes updated.
    pub fn apply_transform_delta(&mut self, handle: NodeHandle, delta: TransformDelta) -> Result<usize> {
        observer::propagate(&mut self.nodes, &mut self.camera_events, handle, delta)
    }

    // ========================================================================
    // Cameras
    // ========================================================================

    #[must_use]
    pub fn camera(&self, handle: NodeHandle) -> Option<&CameraState> {
        self.nodes.get(handle).and_then(TransformNode::camera_state)
    }

    #[must_use]
    pub fn view_matrix(&self, handle: NodeHandle) -> Option<Mat4> {
        self.camera(handle).map(CameraState::view_matrix)
    }

    #[must_use]
    pub fn projection_matrix(&self, handle: NodeHandle) -> Option<Mat4> {
        self.camera(handle).map(CameraState::projection_matrix)
    }

    /// Replaces a camera's projection. The view matrix is untouched.
    pub fn set_projection(&mut self, handle: NodeHandle, projection: Projection) -> Result<()> {
        let camera = self
            .nodes
            .get_mut(handle)
            .ok_or(PivotError::NodeNotFound(handle))?
            .camera_state_mut()
            .ok_or_else(|| PivotError::InvalidProjection(format!("node {handle:?} is not a camera")))?;

        if camera.projection == projection {
            return Ok(());
        }
        camera.set_projection(projection)?;
        self.camera_events.push(CameraEvent::ProjectionMatrixChanged {
            camera: handle,
            projection: camera.projection_matrix,
        });
        Ok(())
    }

    pub fn set_aspect(&mut self, handle: NodeHandle, aspect: f32) -> Result<()> {
        let projection = self
            .camera(handle)
            .ok_or_else(|| PivotError::InvalidProjection(format!("node {handle:?} is not a camera")))?
            .projection
            .with_aspect(aspect);
        self.set_projection(handle, projection)
    }

    /// Takes every camera notification queued since the last call.
    pub fn drain_camera_events(&mut self) -> Vec<CameraEvent> {
        std::mem::take(&mut self.camera_events)
    }
}

impl ActionTarget for Scene {
    fn update_action(
        &mut self,
        node: NodeHandle,
        action: &TransformAction,
        elapsed_fraction: f32,
        increment_fraction: f32,
    ) {
        let delta = action.delta_at(elapsed_fraction, increment_fraction);
        if let Err(err) = self.apply_transform_delta(node, delta) {
            log::warn!("Dropped action update: {err}");
        }
    }
}
