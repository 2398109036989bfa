//! Action gate evaluation.
//!
//! `evaluate` is the decision function behind every hook and CLI gate
//! check: a pure read over the state document, the step registry, and the
//! constraint table. Checks run in a fixed order and the first failing one
//! decides the denial reason. Mutation only ever happens through the
//! engine's explicit setters.

use std::path::PathBuf;

use super::state::WorkflowState;
use super::steps::{constraint, first_code_edit_step, get_step, ActionKind, Precondition};

/// Outcome of a gate check: a verdict plus an actionable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    pub allowed: bool,
    pub reason: String,
}

impl GateDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: "OK".to_string(),
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }
}

/// Live artifact-existence signal consulted alongside the stored flags.
pub trait ArtifactProbe {
    fn context_pack_exists(&self) -> bool;
}

/// Production probe backed by the real filesystem.
#[derive(Debug, Clone)]
pub struct FsArtifactProbe {
    context_pack: PathBuf,
}

impl FsArtifactProbe {
    pub fn new(context_pack: PathBuf) -> Self {
        Self { context_pack }
    }
}

impl ArtifactProbe for FsArtifactProbe {
    fn context_pack_exists(&self) -> bool {
        self.context_pack.exists()
    }
}

/// Evaluate whether `action` is permitted right now.
///
/// Order: capability check (edit/implement only), temporal check against
/// the constraint table, then the entry's preconditions in declaration
/// order. The first failing check wins.
pub fn evaluate(
    action: ActionKind,
    state: &WorkflowState,
    probe: &dyn ArtifactProbe,
) -> GateDecision {
    let step = state.current_step;
    let info = get_step(step);

    if matches!(action, ActionKind::EditCode | ActionKind::Implement) && !info.allows_code_edit {
        let first = first_code_edit_step();
        return GateDecision::deny(format!(
            "Step {step} ({}) does not allow code editing. Must be Step {}+ ({}).",
            info.name, first.number, first.name
        ));
    }

    let rule = constraint(action);
    if step < rule.min_step {
        return GateDecision::deny(format!(
            "{} requires Step {}+. Current: Step {step}",
            action.label(),
            rule.min_step
        ));
    }

    for precondition in rule.requires {
        match precondition {
            Precondition::ContextPackExists => {
                // The stored flag and the live file signal must both hold.
                if !state.context.context_pack_exists || !probe.context_pack_exists() {
                    return GateDecision::deny(
                        "context-pack.md must exist before code editing (Step 7)",
                    );
                }
            }
            Precondition::TaskSelected => {
                if !state.context.task_selected {
                    return GateDecision::deny(
                        "A bead/task must be selected before implementation (Step 6)",
                    );
                }
            }
            Precondition::TestsPassed => {
                if !state.verification.tests_passed {
                    return GateDecision::deny("Tests must pass before commit (Step 9)");
                }
            }
            Precondition::HumanApproved => {
                if !state.approvals.human_review {
                    return GateDecision::deny(
                        "Human review approval required before commit (Step 12)",
                    );
                }
            }
        }
    }

    GateDecision::allow()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::steps::STEPS;

    /// Probe stub with a fixed answer, so tests control the live signal.
    struct StubProbe(bool);

    impl ArtifactProbe for StubProbe {
        fn context_pack_exists(&self) -> bool {
            self.0
        }
    }

    fn ready_state(step: u8) -> WorkflowState {
        let mut state = WorkflowState::default();
        state.current_step = step;
        state.context.context_pack_exists = true;
        state.context.task_selected = true;
        state.verification.tests_passed = true;
        state.approvals.human_review = true;
        state
    }

    #[test]
    fn edit_denied_on_every_non_edit_step_citing_step_name() {
        for step in STEPS.iter().filter(|s| !s.allows_code_edit) {
            let state = ready_state(step.number);
            let decision = evaluate(ActionKind::EditCode, &state, &StubProbe(true));
            assert!(!decision.allowed, "step {} should deny edits", step.number);
            assert!(
                decision.reason.contains(step.name),
                "reason {:?} should cite step name {:?}",
                decision.reason,
                step.name
            );
        }
    }

    #[test]
    fn edit_allowed_during_implementation_phase() {
        for step in 8..=11 {
            let state = ready_state(step);
            let decision = evaluate(ActionKind::EditCode, &state, &StubProbe(true));
            assert!(decision.allowed, "step {step} should allow edits");
            assert_eq!(decision.reason, "OK");
        }
    }

    #[test]
    fn edit_requires_both_flag_and_live_artifact() {
        let mut state = ready_state(8);
        state.context.context_pack_exists = false;
        let decision = evaluate(ActionKind::EditCode, &state, &StubProbe(true));
        assert!(!decision.allowed);
        assert!(decision.reason.contains("context-pack.md"));

        let state = ready_state(8);
        let decision = evaluate(ActionKind::EditCode, &state, &StubProbe(false));
        assert!(!decision.allowed);
        assert!(decision.reason.contains("context-pack.md"));
    }

    #[test]
    fn commit_denied_before_step_14_regardless_of_flags() {
        for step in 0..14 {
            let state = ready_state(step);
            let decision = evaluate(ActionKind::Commit, &state, &StubProbe(true));
            assert!(!decision.allowed, "step {step} should deny commit");
        }
    }

    #[test]
    fn commit_precondition_failures_have_distinct_reasons() {
        let mut state = ready_state(14);
        state.verification.tests_passed = false;
        let decision = evaluate(ActionKind::Commit, &state, &StubProbe(true));
        assert!(!decision.allowed);
        assert!(decision.reason.contains("Tests must pass"));

        let mut state = ready_state(14);
        state.approvals.human_review = false;
        let decision = evaluate(ActionKind::Commit, &state, &StubProbe(true));
        assert!(!decision.allowed);
        assert!(decision.reason.contains("Human review approval"));
    }

    #[test]
    fn commit_allowed_when_all_conditions_hold() {
        let state = ready_state(14);
        let decision = evaluate(ActionKind::Commit, &state, &StubProbe(true));
        assert!(decision.allowed);
        assert_eq!(decision.reason, "OK");
    }

    #[test]
    fn push_gated_only_by_final_step() {
        let state = ready_state(14);
        let decision = evaluate(ActionKind::Push, &state, &StubProbe(true));
        assert!(!decision.allowed);
        assert!(decision.reason.contains("Push requires Step 15"));

        let mut state = WorkflowState::default();
        state.current_step = 15;
        assert!(evaluate(ActionKind::Push, &state, &StubProbe(false)).allowed);
    }

    #[test]
    fn implement_additionally_requires_task_selection() {
        let mut state = ready_state(8);
        state.context.task_selected = false;
        assert!(evaluate(ActionKind::EditCode, &state, &StubProbe(true)).allowed);

        let decision = evaluate(ActionKind::Implement, &state, &StubProbe(true));
        assert!(!decision.allowed);
        assert!(decision.reason.contains("selected"));
    }

    #[test]
    fn evaluation_does_not_mutate_state() {
        let state = ready_state(3);
        let before = state.clone();
        let _ = evaluate(ActionKind::EditCode, &state, &StubProbe(true));
        let _ = evaluate(ActionKind::Commit, &state, &StubProbe(false));
        assert_eq!(state, before);
    }
}
