//! Step registry and temporal constraint table.
//!
//! Pure lookup data: the ordered catalog of workflow steps and the
//! per-action constraints the gate evaluator checks against. Nothing in
//! here mutates state.

use std::fmt;

/// Highest step number in the governed workflow (steps run 0..=15).
pub const MAX_STEP: u8 = 15;

/// Named gate category attached to a step's exit criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepGate {
    None,
    UserApproval,
    SubagentCritique,
    TaskSelected,
    ContextExists,
    ContextPackVerified,
    TestsPass,
    AllGreen,
    HumanApproval,
    HumanApprovalVerified,
}

impl fmt::Display for StepGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepGate::None => "none",
            StepGate::UserApproval => "user_approval",
            StepGate::SubagentCritique => "subagent_critique",
            StepGate::TaskSelected => "task_selected",
            StepGate::ContextExists => "context_exists",
            StepGate::ContextPackVerified => "context_pack_verified",
            StepGate::TestsPass => "tests_pass",
            StepGate::AllGreen => "all_green",
            StepGate::HumanApproval => "human_approval",
            StepGate::HumanApprovalVerified => "human_approval_verified",
        };
        write!(f, "{name}")
    }
}

/// Immutable catalog entry for one workflow step.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub number: u8,
    pub name: &'static str,
    pub required_artifacts: &'static [&'static str],
    pub gate: StepGate,
    pub allows_code_edit: bool,
}

/// The ordered step catalog. Only the implementation phase (steps 8-11)
/// permits code edits.
pub const STEPS: [Step; 16] = [
    Step {
        number: 0,
        name: "Problem Statement",
        required_artifacts: &[],
        gate: StepGate::None,
        allows_code_edit: false,
    },
    Step {
        number: 1,
        name: "Discovery Q&A",
        required_artifacts: &[],
        gate: StepGate::None,
        allows_code_edit: false,
    },
    Step {
        number: 2,
        name: "Write spec.md",
        required_artifacts: &["spec.md"],
        gate: StepGate::UserApproval,
        allows_code_edit: false,
    },
    Step {
        number: 3,
        name: "Generate plan.md",
        required_artifacts: &["plan.md"],
        gate: StepGate::SubagentCritique,
        allows_code_edit: false,
    },
    Step {
        number: 4,
        name: "Plan Critique",
        required_artifacts: &[],
        gate: StepGate::None,
        allows_code_edit: false,
    },
    Step {
        number: 5,
        name: "Rules & Guardrails",
        required_artifacts: &["rules.md"],
        gate: StepGate::None,
        allows_code_edit: false,
    },
    Step {
        number: 6,
        name: "Select Bead/Task",
        required_artifacts: &[],
        gate: StepGate::TaskSelected,
        allows_code_edit: false,
    },
    Step {
        number: 7,
        name: "Context Packing",
        required_artifacts: &["context-pack.md"],
        gate: StepGate::ContextExists,
        allows_code_edit: false,
    },
    Step {
        number: 8,
        name: "Implementation",
        required_artifacts: &[],
        gate: StepGate::ContextPackVerified,
        allows_code_edit: true,
    },
    Step {
        number: 9,
        name: "Run Tests/Checks",
        required_artifacts: &[],
        gate: StepGate::TestsPass,
        allows_code_edit: true,
    },
    Step {
        number: 10,
        name: "GREEN Check",
        required_artifacts: &[],
        gate: StepGate::AllGreen,
        allows_code_edit: true,
    },
    Step {
        number: 11,
        name: "Debug Loop",
        required_artifacts: &[],
        gate: StepGate::None,
        allows_code_edit: true,
    },
    Step {
        number: 12,
        name: "Human Review",
        required_artifacts: &[],
        gate: StepGate::HumanApproval,
        allows_code_edit: false,
    },
    Step {
        number: 13,
        name: "Second Model Review",
        required_artifacts: &[],
        gate: StepGate::None,
        allows_code_edit: false,
    },
    Step {
        number: 14,
        name: "Commit",
        required_artifacts: &[],
        gate: StepGate::HumanApprovalVerified,
        allows_code_edit: false,
    },
    Step {
        number: 15,
        name: "Loop or Merge",
        required_artifacts: &[],
        gate: StepGate::None,
        allows_code_edit: false,
    },
];

/// Look up a step by number. Out-of-range numbers silently degrade to
/// Step 0's metadata rather than failing.
pub fn get_step(number: u8) -> &'static Step {
    STEPS.get(number as usize).unwrap_or(&STEPS[0])
}

/// First step in the catalog that permits code edits (Step 8).
pub fn first_code_edit_step() -> &'static Step {
    STEPS.iter().find(|s| s.allows_code_edit).unwrap_or(&STEPS[0])
}

/// Action kinds governed by the gate evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    EditCode,
    Commit,
    Push,
    Implement,
}

impl ActionKind {
    /// Human-readable label used in denial reasons.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::EditCode => "Code editing",
            ActionKind::Commit => "Commit",
            ActionKind::Push => "Push",
            ActionKind::Implement => "Implementation",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::EditCode => "edit",
            ActionKind::Commit => "commit",
            ActionKind::Push => "push",
            ActionKind::Implement => "implement",
        };
        write!(f, "{name}")
    }
}

/// Named boolean condition checked by the gate evaluator independent of
/// step number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    ContextPackExists,
    TaskSelected,
    TestsPassed,
    HumanApproved,
}

/// Temporal constraint for one action kind: the minimum step plus named
/// preconditions, checked in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct Constraint {
    pub min_step: u8,
    pub requires: &'static [Precondition],
}

const EDIT_CODE: Constraint = Constraint {
    min_step: 8,
    requires: &[Precondition::ContextPackExists],
};

const COMMIT: Constraint = Constraint {
    min_step: 14,
    requires: &[Precondition::TestsPassed, Precondition::HumanApproved],
};

const PUSH: Constraint = Constraint {
    min_step: 15,
    requires: &[],
};

const IMPLEMENT: Constraint = Constraint {
    min_step: 8,
    requires: &[Precondition::ContextPackExists, Precondition::TaskSelected],
};

/// Look up the constraint table entry for an action.
pub fn constraint(action: ActionKind) -> &'static Constraint {
    match action {
        ActionKind::EditCode => &EDIT_CODE,
        ActionKind::Commit => &COMMIT,
        ActionKind::Push => &PUSH,
        ActionKind::Implement => &IMPLEMENT,
    }
}
