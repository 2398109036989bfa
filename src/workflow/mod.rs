//! Workflow state machine core.
//!
//! Step catalog and constraint table, the persisted state document and its
//! store, the transition engine, gate evaluation, and task-to-step
//! inference.

pub mod engine;
pub mod gate;
pub mod infer;
pub mod state;
pub mod steps;
pub mod store;
