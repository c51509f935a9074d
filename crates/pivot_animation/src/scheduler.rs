//! Action Scheduler
//!
//! Drives [`TransformAction`]s from wall-clock time. Each scheduled action
//! is an [`ActionRunner`] with its own small state machine:
//!
//! ```text
//!            run                 pause
//!  Stopped ───────▶ Running ─────────────▶ Paused
//!     ▲    ◀─────── │  ▲  ◀───────────────   │
//!     │     stop    │  │       resume        │
//!     │             │  └── run (restart) ◀───┘
//!     │             ▼
//!     └──── stop ── Completed  (elapsed reached duration)
//! ```
//!
//! Every transition is reported as an [`ActionEvent`] which callers drain
//! with [`ActionScheduler::drain_events`]; chained actions are started in
//! response to [`ActionEvent::Completed`].

use pivot_core::{ActionHandle, NodeHandle, PivotError, Result};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::action::TransformAction;

/// Relative tolerance under which the remaining time counts as finished.
const COMPLETION_EPSILON: f32 = 1e-6;

/// Receiver of per-tick action updates, usually the scene.
pub trait ActionTarget {
    /// Applies the slice `[elapsed, elapsed + increment]` of `action` to `node`.
    /// Both fractions are normalized by the action's duration.
    fn update_action(
        &mut self,
        node: NodeHandle,
        action: &TransformAction,
        elapsed_fraction: f32,
        increment_fraction: f32,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Stopped,
    Running,
    Paused,
    /// Terminal until the action is run again or stopped.
    Completed,
}

/// Timing state of one runner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionRunState {
    duration_seconds: f32,
    elapsed_seconds: f32,
    status: RunStatus,
}

impl ActionRunState {
    fn new(duration_seconds: f32) -> Self {
        Self {
            duration_seconds,
            elapsed_seconds: 0.0,
            status: RunStatus::Stopped,
        }
    }

    #[inline]
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.duration_seconds
    }

    #[inline]
    #[must_use]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed_seconds
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> RunStatus {
        self.status
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    #[inline]
    #[must_use]
    pub fn elapsed_fraction(&self) -> f32 {
        self.elapsed_seconds / self.duration_seconds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    Started { action: ActionHandle, target: NodeHandle },
    Paused { action: ActionHandle },
    Resumed { action: ActionHandle },
    Stopped { action: ActionHandle },
    Completed { action: ActionHandle, target: NodeHandle },
}

/// Result of advancing one runner by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Idle,
    Updated,
    /// Reached the duration. `issued` tells whether the target was updated
    /// on the way.
    Finished { issued: bool },
}

/// A named action bound to its target node.
#[derive(Debug, Clone)]
pub struct ActionRunner {
    name: String,
    target: NodeHandle,
    action: TransformAction,
    state: ActionRunState,
}

impl ActionRunner {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> NodeHandle {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn action(&self) -> &TransformAction {
        &self.action
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &ActionRunState {
        &self.state
    }

    fn restart(&mut self) {
        self.state.elapsed_seconds = 0.0;
        self.state.status = RunStatus::Running;
    }

    fn step<T: ActionTarget + ?Sized>(&mut self, dt: f32, target: &mut T) -> StepOutcome {
        if self.state.status != RunStatus::Running || dt <= 0.0 {
            return StepOutcome::Idle;
        }

        let duration = self.state.duration_seconds;
        let remaining = duration - self.state.elapsed_seconds;
        if remaining <= duration * COMPLETION_EPSILON {
            self.state.status = RunStatus::Completed;
            return StepOutcome::Finished { issued: false };
        }

        // The last slice is clamped so increments sum to exactly one run.
        let step = dt.min(remaining);
        target.update_action(
            self.target,
            &self.action,
            self.state.elapsed_seconds / duration,
            step / duration,
        );
        self.state.elapsed_seconds += step;

        if duration - self.state.elapsed_seconds <= duration * COMPLETION_EPSILON {
            self.state.elapsed_seconds = duration;
            self.state.status = RunStatus::Completed;
            StepOutcome::Finished { issued: true }
        } else {
            StepOutcome::Updated
        }
    }
}

/// Owns every scheduled action and advances the running ones each frame.
#[derive(Debug, Default)]
pub struct ActionScheduler {
    runners: SlotMap<ActionHandle, ActionRunner>,
    names: FxHashMap<String, ActionHandle>,
    events: Vec<ActionEvent>,
}

impl ActionScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers `action` under `name`, targeting `target`, in the `Stopped`
    /// state.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        target: NodeHandle,
        action: TransformAction,
        duration_seconds: f32,
    ) -> Result<ActionHandle> {
        let name = name.into();
        if !(duration_seconds.is_finite() && duration_seconds > 0.0) {
            return Err(PivotError::InvalidDuration(duration_seconds));
        }
        if self.names.contains_key(&name) {
            return Err(PivotError::DuplicateActionName(name));
        }

        let handle = self.runners.insert(ActionRunner {
            name: name.clone(),
            target,
            action,
            state: ActionRunState::new(duration_seconds),
        });
        self.names.insert(name, handle);
        Ok(handle)
    }

    /// Removes an action regardless of its state.
    pub fn remove(&mut self, handle: ActionHandle) -> Option<ActionRunner> {
        let runner = self.runners.remove(handle)?;
        self.names.remove(&runner.name);
        Some(runner)
    }

    /// Removes every action targeting `node`. Returns how many were dropped.
    pub fn remove_target(&mut self, node: NodeHandle) -> usize {
        let doomed: Vec<ActionHandle> = self
            .runners
            .iter()
            .filter(|(_, runner)| runner.target == node)
            .map(|(handle, _)| handle)
            .collect();
        for &handle in &doomed {
            self.remove(handle);
        }
        if !doomed.is_empty() {
            log::debug!("Dropped {} action(s) targeting {node:?}", doomed.len());
        }
        doomed.len()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn find(&self, name: &str) -> Option<ActionHandle> {
        self.names.get(name).copied()
    }

    #[must_use]
    pub fn get(&self, handle: ActionHandle) -> Option<&ActionRunner> {
        self.runners.get(handle)
    }

    #[must_use]
    pub fn status(&self, handle: ActionHandle) -> Option<RunStatus> {
        self.runners.get(handle).map(|runner| runner.state.status)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.runners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionHandle, &ActionRunner)> {
        self.runners.iter()
    }

    // ========================================================================
    // State machine
    // ========================================================================

    /// Starts the action from the beginning. Running, paused and completed
    /// actions are restarted.
    pub fn run(&mut self, handle: ActionHandle) -> Result<()> {
        self.ensure_target_free(handle)?;
        let runner = self.runner_mut(handle)?;
        runner.restart();
        let target = runner.target;
        log::debug!("Action '{}' running on {target:?}", runner.name);
        self.events.push(ActionEvent::Started { action: handle, target });
        Ok(())
    }

    pub fn pause(&mut self, handle: ActionHandle) -> Result<()> {
        let runner = self.runner_mut(handle)?;
        if runner.state.status != RunStatus::Running {
            return Err(PivotError::SchedulerMisuse {
                action: handle,
                reason: "only a running action can be paused",
            });
        }
        runner.state.status = RunStatus::Paused;
        log::debug!("Action '{}' paused at {:.3}s", runner.name, runner.state.elapsed_seconds);
        self.events.push(ActionEvent::Paused { action: handle });
        Ok(())
    }

    pub fn resume(&mut self, handle: ActionHandle) -> Result<()> {
        if self.runner_mut(handle)?.state.status != RunStatus::Paused {
            return Err(PivotError::SchedulerMisuse {
                action: handle,
                reason: "only a paused action can be resumed",
            });
        }
        self.ensure_target_free(handle)?;
        let runner = self.runner_mut(handle)?;
        runner.state.status = RunStatus::Running;
        log::debug!("Action '{}' resumed", runner.name);
        self.events.push(ActionEvent::Resumed { action: handle });
        Ok(())
    }

    /// Stops the action and rewinds it. Allowed from any state.
    pub fn stop(&mut self, handle: ActionHandle) -> Result<()> {
        let runner = self.runner_mut(handle)?;
        runner.state.status = RunStatus::Stopped;
        runner.state.elapsed_seconds = 0.0;
        log::debug!("Action '{}' stopped", runner.name);
        self.events.push(ActionEvent::Stopped { action: handle });
        Ok(())
    }

    // ========================================================================
    // Ticking
    // ========================================================================

    /// Advances every running action by `dt` seconds, issuing at most one
    /// update per action. Returns the number of updates issued.
    pub fn tick<T: ActionTarget + ?Sized>(&mut self, dt: f32, target: &mut T) -> usize {
        if !(dt.is_finite() && dt >= 0.0) {
            log::warn!("Ignoring scheduler tick with dt = {dt}");
            return 0;
        }

        let mut issued = 0;
        for (handle, runner) in &mut self.runners {
            match runner.step(dt, target) {
                StepOutcome::Idle => {}
                StepOutcome::Updated => issued += 1,
                StepOutcome::Finished { issued: updated } => {
                    issued += usize::from(updated);
                    log::debug!("Action '{}' completed", runner.name);
                    self.events.push(ActionEvent::Completed {
                        action: handle,
                        target: runner.target,
                    });
                }
            }
        }
        issued
    }

    /// Advances a single action. Returns whether an update was issued.
    ///
    /// Advancing a stopped action is a caller error; paused and completed
    /// actions are left untouched.
    pub fn advance<T: ActionTarget + ?Sized>(
        &mut self,
        handle: ActionHandle,
        dt: f32,
        target: &mut T,
    ) -> Result<bool> {
        let runner = self.runner_mut(handle)?;
        if runner.state.status == RunStatus::Stopped {
            return Err(PivotError::SchedulerMisuse {
                action: handle,
                reason: "cannot advance a stopped action",
            });
        }
        if !(dt.is_finite() && dt >= 0.0) {
            log::warn!("Ignoring advance of '{}' with dt = {dt}", runner.name);
            return Ok(false);
        }

        Ok(match runner.step(dt, target) {
            StepOutcome::Idle => false,
            StepOutcome::Updated => true,
            StepOutcome::Finished { issued } => {
                let node = runner.target;
                log::debug!("Action '{}' completed", runner.name);
                self.events.push(ActionEvent::Completed { action: handle, target: node });
                issued
            }
        })
    }

    /// Takes every event queued since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<ActionEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn runner_mut(&mut self, handle: ActionHandle) -> Result<&mut ActionRunner> {
        self.runners
            .get_mut(handle)
            .ok_or(PivotError::ActionNotFound(handle))
    }

    /// Rejects a start if another action is already running on the same node.
    fn ensure_target_free(&self, handle: ActionHandle) -> Result<()> {
        let runner = self
            .runners
            .get(handle)
            .ok_or(PivotError::ActionNotFound(handle))?;
        let busy = self.runners.iter().any(|(other, candidate)| {
            other != handle && candidate.target == runner.target && candidate.state.is_running()
        });
        if busy {
            return Err(PivotError::SchedulerMisuse {
                action: handle,
                reason: "another action is already running on the same target",
            });
        }
        Ok(())
    }
}
