//! Gate-check entry point.
//!
//! Callers (PreToolUse hooks, scripts) treat the exit code as the
//! authoritative permission signal: 0 allowed, 1 denied.

use anyhow::Result;

use crate::cli::CheckAction;
use crate::config::VibeGateConfig;
use crate::workflow::gate::FsArtifactProbe;
use crate::workflow::steps::ActionKind;

use super::open_engine;

pub fn run(config: &VibeGateConfig, action: CheckAction) -> Result<()> {
    let engine = open_engine(config)?;
    let probe = FsArtifactProbe::new(config.paths().context_pack_file());
    let kind: ActionKind = action.into();
    let decision = engine.evaluate(kind, &probe);

    if decision.allowed {
        println!(
            "✅ vibegate: {kind} allowed at Step {}",
            engine.current_step()
        );
        return Ok(());
    }

    let info = engine.step_info();
    println!(
        "\n\
         ================================================================\n\
         \x20          🚫 BLOCKED BY VIBEGATE WORKFLOW GATE\n\
         ================================================================\n\
         Action: {kind}\n\
         Current Step: {step} - {name}\n\
         ----------------------------------------------------------------\n\
         REASON: {reason}\n\
         ----------------------------------------------------------------\n\
         To proceed, complete the required workflow steps first.\n\
         Use 'vibegate status' to check current progress.\n\
         ================================================================\n",
        step = engine.current_step(),
        name = info.name,
        reason = decision.reason,
    );
    std::process::exit(1);
}
