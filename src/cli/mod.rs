use clap::{Parser, Subcommand, ValueEnum};

use crate::workflow::steps::ActionKind;

pub mod commands;

#[derive(Parser)]
#[command(name = "vibegate")]
#[command(about = "Gated workflow enforcement for AI coding agents")]
#[command(long_about = "Vibegate enforces a linear, gated development workflow: code edits, \
                       commits and pushes are blocked until the prior workflow steps and their \
                       approvals are satisfied. Run 'vibegate status' to see where you are.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display current workflow state and recent history
    Status,
    /// Set the current workflow step
    SetStep {
        /// Step number (0-15)
        step: i64,
    },
    /// Grant human review approval
    Approve,
    /// Revoke human review approval
    Revoke,
    /// Mark tests as passed
    TestsPass,
    /// Mark tests as failed
    TestsFail,
    /// Mark the context pack as complete
    ContextPack,
    /// Select a task/bead to work on
    SelectTask {
        /// Task/bead identifier
        task_id: String,
    },
    /// Reset workflow state to defaults (creates a backup first)
    Reset,
    /// Create a manual backup of the durable state
    Backup,
    /// Check whether an action is allowed right now (exit 0 allowed, 1 denied)
    Check {
        /// The action being validated
        #[arg(value_enum)]
        action: CheckAction,
    },
    /// Host tool-lifecycle hooks
    Hook {
        #[command(subcommand)]
        hook: HookCommand,
    },
}

/// Actions accepted by the gate-check entry point.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CheckAction {
    Edit,
    Commit,
    Push,
    Implement,
}

impl From<CheckAction> for ActionKind {
    fn from(action: CheckAction) -> Self {
        match action {
            CheckAction::Edit => ActionKind::EditCode,
            CheckAction::Commit => ActionKind::Commit,
            CheckAction::Push => ActionKind::Push,
            CheckAction::Implement => ActionKind::Implement,
        }
    }
}

#[derive(Subcommand)]
pub enum HookCommand {
    /// SessionStart: reload state, sync the context-pack flag, print summary
    SessionStart,
    /// Stop: back up state and stamp the session end
    SessionEnd,
    /// PreCompact: back up state before the host compacts its context
    PreCompact,
    /// PostToolUse (edits): record the edit and invalidate verification
    PostEdit,
    /// PostToolUse (task updates): sync task status into workflow state
    TaskSync,
    /// UserPromptSubmit: print a one-line current-step reminder
    PromptContext,
}
