//! Observer graph.
//!
//! Every node may observe at most one upstream node, so the graph is a
//! forest of fan-out trees. Deltas flow down those trees: whatever a node
//! applies to itself is replicated onto each of its observers, recursively.
//!
//! Like the transform system this works directly on the node arena instead
//! of the whole [`Scene`](crate::scene::Scene), keeping borrows narrow.

use glam::Vec3;
use pivot_animation::TransformDelta;
use pivot_core::{AnchorSpace, NodeHandle, ObservationFault, ObservationSettings, PivotError, Result};
use slotmap::SlotMap;

use crate::camera::CameraEvent;
use crate::node::TransformNode;

/// A single upstream subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationLink {
    pub target: NodeHandle,
    /// How forwarded rotation anchors are interpreted by the observer.
    pub anchor_space: AnchorSpace,
    /// Camera observers also move their target by forwarded translations.
    pub carry_target: bool,
}

impl ObservationLink {
    #[must_use]
    pub fn new(target: NodeHandle) -> Self {
        Self::with_settings(target, &ObservationSettings::default())
    }

    #[must_use]
    pub fn with_settings(target: NodeHandle, settings: &ObservationSettings) -> Self {
        Self {
            target,
            anchor_space: settings.anchor_space,
            carry_target: settings.carry_target,
        }
    }

    #[must_use]
    pub fn anchor_space(mut self, anchor_space: AnchorSpace) -> Self {
        self.anchor_space = anchor_space;
        self
    }

    #[must_use]
    pub fn carry_target(mut self, carry_target: bool) -> Self {
        self.carry_target = carry_target;
        self
    }

    /// Re-expresses `delta` for `observer`.
    ///
    /// `pivot` is the world-space point the observed node rotated about.
    fn forward(&self, delta: &TransformDelta, pivot: Vec3, observer: &TransformNode) -> TransformDelta {
        let mut forwarded = *delta;
        if self.anchor_space == AnchorSpace::ObservedRelative {
            forwarded.anchor = pivot - (observer.position() + delta.translation);
        }
        if self.carry_target && observer.is_camera() {
            forwarded.target_translation += delta.translation;
        }
        forwarded
    }
}

/// Checks that `observer` may start observing `target`.
///
/// Walks the upstream chain starting at `target`; reaching `observer` means
/// the new link would close a cycle, however long.
pub(crate) fn validate_link(
    nodes: &SlotMap<NodeHandle, TransformNode>,
    observer: NodeHandle,
    target: NodeHandle,
) -> Result<()> {
    let observer_node = nodes.get(observer).ok_or(PivotError::NodeNotFound(observer))?;
    if !nodes.contains_key(target) {
        return Err(PivotError::NodeNotFound(target));
    }

    let reject = |fault| PivotError::InvalidObservation {
        observer,
        target,
        fault,
    };

    if observer == target {
        return Err(reject(ObservationFault::SelfObservation));
    }
    if observer_node.observed() == Some(target) {
        return Err(reject(ObservationFault::Duplicate));
    }

    let mut upstream = Some(target);
    while let Some(current) = upstream {
        if current == observer {
            return Err(reject(ObservationFault::Cycle));
        }
        upstream = nodes.get(current).and_then(TransformNode::observed);
    }

    Ok(())
}

/// Subscribes `observer` through `link`. The caller validates first and
/// removes any previous link.
pub(crate) fn link(nodes: &mut SlotMap<NodeHandle, TransformNode>, observer: NodeHandle, link: ObservationLink) {
    if let Some(target) = nodes.get_mut(link.target) {
        target.observers.push(observer);
    }
    if let Some(node) = nodes.get_mut(observer) {
        node.observed = Some(link);
    }
    log::debug!("{observer:?} now observes {:?}", link.target);
}

/// Drops the upstream link of `observer`, returning the former target.
pub(crate) fn unlink(nodes: &mut SlotMap<NodeHandle, TransformNode>, observer: NodeHandle) -> Option<NodeHandle> {
    let previous = nodes.get_mut(observer)?.observed.take()?.target;
    if let Some(target) = nodes.get_mut(previous) {
        target.observers.retain(|&mut handle| handle != observer);
    }
    log::debug!("{observer:?} stopped observing {previous:?}");
    Some(previous)
}

/// Applies `delta` to `origin` and replicates it down the observer tree.
///
/// Uses an explicit stack rather than recursion. Returns the number of nodes
/// updated, `origin` included; cameras that skipped a degenerate update are
/// not counted but still forward the delta to their own observers.
pub(crate) fn propagate(
    nodes: &mut SlotMap<NodeHandle, TransformNode>,
    camera_events: &mut Vec<CameraEvent>,
    origin: NodeHandle,
    delta: TransformDelta,
) -> Result<usize> {
    if !nodes.contains_key(origin) {
        return Err(PivotError::NodeNotFound(origin));
    }

    let mut stack: Vec<(NodeHandle, TransformDelta)> = Vec::with_capacity(16);
    stack.push((origin, delta));
    let mut updated = 0;

    while let Some((handle, delta)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            log::warn!("Observer {handle:?} vanished during propagation");
            continue;
        };

        let applied = node.apply_delta(&delta);
        updated += usize::from(applied.applied);

        if applied.view_changed
            && let Some(camera) = node.camera_state()
        {
            camera_events.push(CameraEvent::ViewMatrixChanged {
                camera: handle,
                view: camera.view_matrix(),
            });
        }

        // Reverse so observers are visited in registration order.
        let observers = node.observers.clone();
        for &observer in observers.iter().rev() {
            let Some(observer_node) = nodes.get(observer) else {
                continue;
            };
            let Some(link) = observer_node.observation() else {
                continue;
            };
            let forwarded = link.forward(&delta, applied.pivot, observer_node);
            stack.push((observer, forwarded));
        }
    }

    log::trace!("Propagated delta from {origin:?} to {updated} node(s)");
    Ok(updated)
}
