//! Command dispatch: thin plumbing over the workflow engine.

use anyhow::Result;

use crate::config::VibeGateConfig;
use crate::workflow::engine::WorkflowEngine;
use crate::workflow::store::StateStore;

use super::{Cli, Commands};

mod backup;
mod check;
mod flags;
mod hooks;
mod reset;
mod set_step;
mod status;

/// Construct the engine for one invocation: open the store and load the
/// durable document fresh. No hidden singletons.
pub(crate) fn open_engine(config: &VibeGateConfig) -> Result<WorkflowEngine> {
    let store = StateStore::open(&config.paths())?;
    Ok(WorkflowEngine::load(store))
}

pub fn run(cli: Cli, config: &VibeGateConfig) -> Result<()> {
    match cli.command {
        Commands::Status => status::run(config),
        Commands::SetStep { step } => set_step::run(config, step),
        Commands::Approve => flags::approve(config, true),
        Commands::Revoke => flags::approve(config, false),
        Commands::TestsPass => flags::tests(config, true),
        Commands::TestsFail => flags::tests(config, false),
        Commands::ContextPack => flags::context_pack(config),
        Commands::SelectTask { task_id } => flags::select_task(config, &task_id),
        Commands::Reset => reset::run(config),
        Commands::Backup => backup::run(config),
        Commands::Check { action } => check::run(config, action),
        Commands::Hook { hook } => hooks::run(config, hook),
    }
}
