//! State machine engine: the sole writer of workflow state.
//!
//! Every mutating entry point loads fresh state in its own process
//! invocation, applies one logical change, and persists before returning.
//! Transitions are unconditional; whether it is safe to act at a given
//! step is the gate evaluator's question, not the transition setter's.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info};

use super::gate::{self, ArtifactProbe, GateDecision};
use super::state::WorkflowState;
use super::steps::{get_step, ActionKind, Step, MAX_STEP};
use super::store::{StateStore, StoreError};

pub struct WorkflowEngine {
    store: StateStore,
    state: WorkflowState,
}

impl WorkflowEngine {
    /// Load the durable document fresh and wrap it with its store.
    pub fn load(store: StateStore) -> Self {
        let state = store.load();
        Self { store, state }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn current_step(&self) -> u8 {
        self.state.current_step
    }

    /// Catalog entry for the current step.
    pub fn step_info(&self) -> &'static Step {
        get_step(self.state.current_step)
    }

    /// Move to a new step, recording the transition in history.
    ///
    /// An out-of-range target is silently ignored: no state change, no
    /// history entry, no error.
    pub fn set_current_step(&mut self, step: u8) -> Result<(), StoreError> {
        if step > MAX_STEP {
            debug!(step, "ignoring out-of-range step transition");
            return Ok(());
        }
        let old = self.state.current_step;
        self.state.current_step = step;
        self.store
            .append_history(&mut self.state, &format!("Step changed: {old} -> {step}"))?;
        info!(old_step = old, new_step = step, "workflow step changed");
        self.store.save(&mut self.state)
    }

    /// Update test verification, stamping the check time. Not
    /// history-logged: only approvals and step transitions are
    /// audit-worthy.
    pub fn set_tests_passed(&mut self, passed: bool) -> Result<(), StoreError> {
        self.state.verification.tests_passed = passed;
        self.state.verification.last_check = Some(Utc::now());
        self.store.save(&mut self.state)
    }

    /// Grant or revoke human review approval. History-logged.
    pub fn set_human_approval(&mut self, approved: bool) -> Result<(), StoreError> {
        self.state.approvals.human_review = approved;
        let message = if approved {
            "Human approval: granted"
        } else {
            "Human approval: revoked"
        };
        self.store.append_history(&mut self.state, message)?;
        info!(approved, "human approval changed");
        self.store.save(&mut self.state)
    }

    pub fn set_context_pack_exists(&mut self, exists: bool) -> Result<(), StoreError> {
        self.state.context.context_pack_exists = exists;
        self.store.save(&mut self.state)
    }

    /// Mark a task as selected, optionally recording its bead id.
    pub fn set_task_selected(
        &mut self,
        selected: bool,
        bead_id: Option<&str>,
    ) -> Result<(), StoreError> {
        self.state.context.task_selected = selected;
        if let Some(bead_id) = bead_id {
            self.state.current_bead_id = Some(bead_id.to_string());
        }
        self.store.save(&mut self.state)
    }

    /// Record that a code edit happened. Any standing test verification is
    /// invalidated since the code changed; returns whether it was.
    pub fn record_edit(&mut self, file_path: &str) -> Result<bool, StoreError> {
        let invalidated = self.state.verification.tests_passed;
        if invalidated {
            self.state.verification.tests_passed = false;
            self.state.verification.last_check = Some(Utc::now());
        }
        self.store
            .append_history(&mut self.state, &format!("Code edited: {file_path}"))?;
        self.store.save(&mut self.state)?;
        Ok(invalidated)
    }

    pub fn mark_session_started(&mut self) -> Result<(), StoreError> {
        self.state.session.started_at = Some(Utc::now());
        self.store.save(&mut self.state)
    }

    /// Back up and stamp the session end time.
    pub fn mark_session_ended(&mut self) -> Result<Option<PathBuf>, StoreError> {
        let backup = self.store.backup("session_end")?;
        self.state.session.ended_at = Some(Utc::now());
        self.store.save(&mut self.state)?;
        Ok(backup)
    }

    /// Back up before the host compacts its context window.
    pub fn mark_compacted(&mut self) -> Result<Option<PathBuf>, StoreError> {
        let backup = self.store.backup("pre_compact")?;
        self.state.session.last_compact = Some(Utc::now());
        self.store.save(&mut self.state)?;
        Ok(backup)
    }

    pub fn backup(&self, reason: &str) -> Result<Option<PathBuf>, StoreError> {
        self.store.backup(reason)
    }

    /// Back up the current document, then restore full defaults.
    pub fn reset(&mut self) -> Result<Option<PathBuf>, StoreError> {
        let backup = self.store.backup("pre_reset")?;
        self.state = WorkflowState::default();
        self.store.save(&mut self.state)?;
        info!("workflow state reset to defaults");
        Ok(backup)
    }

    /// Pure gate check against the current state. No side effects.
    pub fn evaluate(&self, action: ActionKind, probe: &dyn ArtifactProbe) -> GateDecision {
        gate::evaluate(action, &self.state, probe)
    }

    /// Human-readable state summary banner.
    pub fn summary(&self) -> String {
        let info = self.step_info();
        let yes_no = |flag: bool| if flag { "YES" } else { "NO" };
        let bead = self.state.current_bead_id.as_deref().unwrap_or("None");
        let problem = if self.state.problem_statement.is_empty() {
            "Not defined".to_string()
        } else {
            self.state.problem_statement.chars().take(50).collect()
        };

        format!(
            "\n\
             ================================================================\n\
             \x20                 VIBEGATE WORKFLOW STATE\n\
             ================================================================\n\
             Current Step: {step} - {name}\n\
             Bead ID: {bead}\n\
             ----------------------------------------------------------------\n\
             GATES:\n\
             \x20 - Context Pack:      {ctx}\n\
             \x20 - Tests Passed:      {tests}\n\
             \x20 - Human Approval:    {approval}\n\
             \x20 - Code Edit Allowed: {edit}\n\
             ----------------------------------------------------------------\n\
             Problem: {problem}\n\
             ================================================================\n",
            step = self.state.current_step,
            name = info.name,
            ctx = yes_no(self.state.context.context_pack_exists),
            tests = yes_no(self.state.verification.tests_passed),
            approval = yes_no(self.state.approvals.human_review),
            edit = yes_no(info.allows_code_edit),
        )
    }
}
