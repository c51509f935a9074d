//! Action scheduler tests
//!
//! Tests for:
//! - Duration boundary and clamped final increments
//! - Run / pause / resume / stop transitions
//! - Completion events and chaining
//! - Misuse errors (stopped advance, conflicting runs, bad durations)

use pivot::animation::ActionTarget;
use pivot::{
    ActionEvent, ActionScheduler, NodeHandle, PivotError, RunStatus, Scene, TransformAction,
    TransformActionBuilder,
};

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-5;

#[derive(Default)]
struct Recorder {
    calls: Vec<(NodeHandle, f32, f32)>,
}

impl ActionTarget for Recorder {
    fn update_action(
        &mut self,
        node: NodeHandle,
        _action: &TransformAction,
        elapsed_fraction: f32,
        increment_fraction: f32,
    ) {
        self.calls.push((node, elapsed_fraction, increment_fraction));
    }
}

fn two_nodes() -> (NodeHandle, NodeHandle) {
    let mut scene = Scene::new();
    (scene.create_node("a"), scene.create_node("b"))
}

fn slide() -> TransformAction {
    TransformActionBuilder::new().move_right(1.0).build()
}

// ============================================================================
// Timing
// ============================================================================

#[test]
fn duration_boundary_issues_exactly_two_updates() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let handle = scheduler.add("slide", node, slide(), 1.0).unwrap();
    scheduler.run(handle).unwrap();

    assert_eq!(scheduler.tick(0.5, &mut recorder), 1);
    assert_eq!(scheduler.tick(0.5, &mut recorder), 1);
    assert_eq!(scheduler.tick(0.5, &mut recorder), 0);

    let elapsed: Vec<f32> = recorder.calls.iter().map(|c| c.1).collect();
    assert_eq!(elapsed, vec![0.0, 0.5]);
    assert!(recorder.calls.iter().all(|c| c.0 == node));
    assert_eq!(scheduler.status(handle), Some(RunStatus::Completed));
}

#[test]
fn increments_sum_to_one_with_uneven_ticks() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let handle = scheduler.add("slide", node, slide(), 1.0).unwrap();
    scheduler.run(handle).unwrap();
    for _ in 0..10 {
        scheduler.tick(0.3, &mut recorder);
    }

    assert_eq!(recorder.calls.len(), 4);
    let total: f32 = recorder.calls.iter().map(|c| c.2).sum();
    assert!((total - 1.0).abs() < EPSILON, "increments sum to {total}");

    // Each slice starts where the previous one ended.
    for pair in recorder.calls.windows(2) {
        assert!((pair[1].1 - (pair[0].1 + pair[0].2)).abs() < EPSILON);
    }
}

#[test]
fn oversized_tick_is_clamped_to_remaining_time() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let handle = scheduler.add("slide", node, slide(), 2.0).unwrap();
    scheduler.run(handle).unwrap();
    scheduler.tick(5.0, &mut recorder);

    assert_eq!(recorder.calls, vec![(node, 0.0, 1.0)]);
    let state = scheduler.get(handle).unwrap().state();
    assert_eq!(state.status(), RunStatus::Completed);
    assert_eq!(state.elapsed_seconds(), 2.0);
}

#[test]
fn zero_and_negative_ticks_issue_nothing() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let handle = scheduler.add("slide", node, slide(), 1.0).unwrap();
    scheduler.run(handle).unwrap();

    assert_eq!(scheduler.tick(0.0, &mut recorder), 0);
    assert_eq!(scheduler.tick(-1.0, &mut recorder), 0);
    assert_eq!(scheduler.tick(f32::NAN, &mut recorder), 0);
    assert!(recorder.calls.is_empty());
    assert_eq!(scheduler.get(handle).unwrap().state().elapsed_seconds(), 0.0);
}

// ============================================================================
// State machine
// ============================================================================

#[test]
fn added_actions_start_stopped() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let handle = scheduler.add("slide", node, slide(), 1.0).unwrap();
    assert_eq!(scheduler.status(handle), Some(RunStatus::Stopped));
    assert_eq!(scheduler.tick(0.5, &mut recorder), 0);
}

#[test]
fn pause_freezes_and_resume_continues() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let handle = scheduler.add("slide", node, slide(), 1.0).unwrap();
    scheduler.run(handle).unwrap();
    scheduler.tick(0.25, &mut recorder);

    scheduler.pause(handle).unwrap();
    assert_eq!(scheduler.tick(0.25, &mut recorder), 0);
    assert_eq!(scheduler.status(handle), Some(RunStatus::Paused));

    scheduler.resume(handle).unwrap();
    scheduler.tick(0.25, &mut recorder);

    assert_eq!(recorder.calls.len(), 2);
    assert!((recorder.calls[1].1 - 0.25).abs() < EPSILON);
}

#[test]
fn run_restarts_from_the_beginning() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let handle = scheduler.add("slide", node, slide(), 1.0).unwrap();
    scheduler.run(handle).unwrap();
    scheduler.tick(0.6, &mut recorder);

    // From Running
    scheduler.run(handle).unwrap();
    scheduler.tick(0.1, &mut recorder);
    assert_eq!(recorder.calls[1].1, 0.0);

    // From Paused
    scheduler.pause(handle).unwrap();
    scheduler.run(handle).unwrap();
    assert_eq!(scheduler.get(handle).unwrap().state().elapsed_seconds(), 0.0);

    // From Completed
    scheduler.tick(1.0, &mut recorder);
    assert_eq!(scheduler.status(handle), Some(RunStatus::Completed));
    scheduler.run(handle).unwrap();
    assert_eq!(scheduler.status(handle), Some(RunStatus::Running));
}

#[test]
fn stop_rewinds_and_halts() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let handle = scheduler.add("slide", node, slide(), 1.0).unwrap();
    scheduler.run(handle).unwrap();
    scheduler.tick(0.4, &mut recorder);
    scheduler.stop(handle).unwrap();

    let state = scheduler.get(handle).unwrap().state();
    assert_eq!(state.status(), RunStatus::Stopped);
    assert_eq!(state.elapsed_seconds(), 0.0);
    assert_eq!(scheduler.tick(0.4, &mut recorder), 0);
}

#[test]
fn advance_drives_a_single_action() {
    let (a, b) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let first = scheduler.add("first", a, slide(), 1.0).unwrap();
    let second = scheduler.add("second", b, slide(), 1.0).unwrap();
    scheduler.run(first).unwrap();
    scheduler.run(second).unwrap();

    assert!(scheduler.advance(first, 0.5, &mut recorder).unwrap());
    assert_eq!(recorder.calls.len(), 1);
    assert_eq!(recorder.calls[0].0, a);
    assert_eq!(scheduler.get(second).unwrap().state().elapsed_seconds(), 0.0);

    scheduler.pause(first).unwrap();
    assert!(!scheduler.advance(first, 0.5, &mut recorder).unwrap());
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn lifecycle_is_reported_as_events() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let handle = scheduler.add("slide", node, slide(), 1.0).unwrap();
    scheduler.run(handle).unwrap();
    scheduler.pause(handle).unwrap();
    scheduler.resume(handle).unwrap();
    scheduler.tick(2.0, &mut recorder);
    scheduler.tick(2.0, &mut recorder);

    assert_eq!(
        scheduler.drain_events(),
        vec![
            ActionEvent::Started { action: handle, target: node },
            ActionEvent::Paused { action: handle },
            ActionEvent::Resumed { action: handle },
            ActionEvent::Completed { action: handle, target: node },
        ]
    );
    assert!(scheduler.drain_events().is_empty());
}

#[test]
fn completion_event_chains_the_next_action() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let first = scheduler.add("first", node, slide(), 0.5).unwrap();
    let second = scheduler.add("second", node, slide(), 0.5).unwrap();
    scheduler.run(first).unwrap();

    for _ in 0..4 {
        scheduler.tick(0.25, &mut recorder);
        for event in scheduler.drain_events() {
            if event == (ActionEvent::Completed { action: first, target: node }) {
                scheduler.run(second).unwrap();
            }
        }
    }

    assert_eq!(scheduler.status(first), Some(RunStatus::Completed));
    assert_eq!(scheduler.status(second), Some(RunStatus::Completed));
    assert_eq!(recorder.calls.len(), 4);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn advancing_a_stopped_action_is_misuse() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let handle = scheduler.add("slide", node, slide(), 1.0).unwrap();
    let result = scheduler.advance(handle, 0.1, &mut recorder);
    assert!(matches!(result, Err(PivotError::SchedulerMisuse { action, .. }) if action == handle));
    assert!(recorder.calls.is_empty());
}

#[test]
fn invalid_transitions_are_misuse() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();

    let handle = scheduler.add("slide", node, slide(), 1.0).unwrap();
    assert!(matches!(scheduler.pause(handle), Err(PivotError::SchedulerMisuse { .. })));
    assert!(matches!(scheduler.resume(handle), Err(PivotError::SchedulerMisuse { .. })));

    scheduler.run(handle).unwrap();
    assert!(matches!(scheduler.resume(handle), Err(PivotError::SchedulerMisuse { .. })));
}

#[test]
fn only_one_running_action_per_target() {
    let (node, other) = two_nodes();
    let mut scheduler = ActionScheduler::new();
    let mut recorder = Recorder::default();

    let first = scheduler.add("first", node, slide(), 1.0).unwrap();
    let second = scheduler.add("second", node, slide(), 1.0).unwrap();
    let elsewhere = scheduler.add("elsewhere", other, slide(), 1.0).unwrap();

    scheduler.run(first).unwrap();
    assert!(matches!(scheduler.run(second), Err(PivotError::SchedulerMisuse { .. })));
    assert_eq!(scheduler.status(second), Some(RunStatus::Stopped));
    scheduler.run(elsewhere).unwrap();

    // Paused actions do not hold the target, but block resuming once taken.
    scheduler.pause(first).unwrap();
    scheduler.run(second).unwrap();
    assert!(matches!(scheduler.resume(first), Err(PivotError::SchedulerMisuse { .. })));

    scheduler.tick(1.0, &mut recorder);
    scheduler.resume(first).unwrap();
}

#[test]
fn rejects_invalid_durations() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();

    for duration in [0.0, -1.0, f32::INFINITY, f32::NAN] {
        let result = scheduler.add("slide", node, slide(), duration);
        assert!(matches!(result, Err(PivotError::InvalidDuration(_))));
    }
    assert!(scheduler.is_empty());
}

#[test]
fn names_are_unique_and_searchable() {
    let (node, _) = two_nodes();
    let mut scheduler = ActionScheduler::new();

    let handle = scheduler.add("slide", node, slide(), 1.0).unwrap();
    assert!(matches!(
        scheduler.add("slide", node, slide(), 1.0),
        Err(PivotError::DuplicateActionName(name)) if name == "slide"
    ));
    assert_eq!(scheduler.find("slide"), Some(handle));
    assert_eq!(scheduler.get(handle).unwrap().name(), "slide");

    scheduler.remove(handle);
    assert_eq!(scheduler.find("slide"), None);
    assert!(matches!(scheduler.run(handle), Err(PivotError::ActionNotFound(_))));
    scheduler.add("slide", node, slide(), 1.0).unwrap();
}

#[test]
fn remove_target_drops_every_action_on_a_node() {
    let (node, other) = two_nodes();
    let mut scheduler = ActionScheduler::new();

    scheduler.add("a", node, slide(), 1.0).unwrap();
    scheduler.add("b", node, slide(), 1.0).unwrap();
    scheduler.add("c", other, slide(), 1.0).unwrap();

    assert_eq!(scheduler.remove_target(node), 2);
    assert_eq!(scheduler.len(), 1);
    assert!(scheduler.iter().all(|(_, runner)| runner.target() == other));
}
