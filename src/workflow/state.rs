//! The persisted workflow state document.
//!
//! This is the single mutable aggregate the engine owns. It is stored as
//! pretty-printed JSON so it stays human-inspectable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Durable record of where the workflow stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub current_step: u8,
    pub current_bead_id: Option<String>,
    pub problem_statement: String,
    pub status: String,
    pub verification: Verification,
    pub approvals: Approvals,
    pub context: ContextFlags,
    pub session: Session,
    pub history: Vec<HistoryEntry>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            current_step: 0,
            current_bead_id: None,
            problem_statement: String::new(),
            status: "initialized".to_string(),
            verification: Verification::default(),
            approvals: Approvals::default(),
            context: ContextFlags::default(),
            session: Session::default(),
            history: Vec::new(),
        }
    }
}

/// Test/lint verification flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub tests_passed: bool,
    pub lint_passed: bool,
    pub last_check: Option<DateTime<Utc>>,
}

/// Approval flags for the workflow's review gates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Approvals {
    pub spec_md: bool,
    pub plan_md: bool,
    pub human_review: bool,
}

/// Context preparation flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextFlags {
    pub context_pack_exists: bool,
    pub task_selected: bool,
}

/// Session lifecycle timestamps, stamped by the hook surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub started_at: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub last_compact: Option<DateTime<Utc>>,
    pub context_percentage: f64,
}

/// One audit-trail record. Entries are immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Two-level merge of a stored document against defaults.
///
/// Top-level keys absent from the stored document are filled in from the
/// default document; a present top-level key is trusted verbatim. Legacy
/// sub-objects are deliberately NOT deep-merged field by field, so a
/// present-but-partial sub-object fails decoding and the caller falls back
/// to full defaults.
pub fn merge_with_defaults(loaded: Value) -> Option<WorkflowState> {
    let Value::Object(mut doc) = loaded else {
        return None;
    };
    let defaults = serde_json::to_value(WorkflowState::default()).ok()?;
    if let Value::Object(default_doc) = defaults {
        for (key, value) in default_doc {
            doc.entry(key).or_insert(value);
        }
    }
    serde_json::from_value(Value::Object(doc)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_start_at_step_zero() {
        let state = WorkflowState::default();
        assert_eq!(state.current_step, 0);
        assert_eq!(state.current_bead_id, None);
        assert_eq!(state.status, "initialized");
        assert!(!state.verification.tests_passed);
        assert!(!state.approvals.human_review);
        assert!(!state.context.context_pack_exists);
        assert!(state.history.is_empty());
    }

    #[test]
    fn merge_fills_missing_top_level_keys() {
        let doc = json!({
            "current_step": 9,
            "current_bead_id": "BEAD-7",
        });
        let state = merge_with_defaults(doc).unwrap();
        assert_eq!(state.current_step, 9);
        assert_eq!(state.current_bead_id.as_deref(), Some("BEAD-7"));
        // Absent keys came from defaults.
        assert!(!state.verification.tests_passed);
        assert_eq!(state.status, "initialized");
    }

    #[test]
    fn merge_trusts_present_keys_verbatim() {
        let doc = json!({
            "approvals": {
                "spec_md": true,
                "plan_md": false,
                "human_review": true,
            },
        });
        let state = merge_with_defaults(doc).unwrap();
        assert!(state.approvals.spec_md);
        assert!(state.approvals.human_review);
    }

    #[test]
    fn merge_rejects_partial_sub_objects() {
        // A present top-level key is used as-is; a partial sub-object is
        // undecodable and the document counts as malformed.
        let doc = json!({
            "verification": { "tests_passed": true },
        });
        assert!(merge_with_defaults(doc).is_none());
    }

    #[test]
    fn merge_rejects_non_object_documents() {
        assert!(merge_with_defaults(json!([1, 2, 3])).is_none());
        assert!(merge_with_defaults(json!("nope")).is_none());
    }
}
