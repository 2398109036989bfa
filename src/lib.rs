// vibegate - gated workflow enforcement for AI coding agents
// This exposes the workflow core for testing and integration

pub mod cli;
pub mod config;
pub mod workflow;

// Re-export key types for easy access
pub use config::{VibeGateConfig, WorkspacePaths};
pub use workflow::engine::WorkflowEngine;
pub use workflow::gate::{evaluate, ArtifactProbe, FsArtifactProbe, GateDecision};
pub use workflow::infer::infer_step;
pub use workflow::state::{HistoryEntry, WorkflowState};
pub use workflow::steps::{
    constraint, get_step, ActionKind, Constraint, Precondition, Step, StepGate, MAX_STEP, STEPS,
};
pub use workflow::store::{StateStore, StoreError};
