//! Host tool-lifecycle hooks.
//!
//! Each hook is one short-lived invocation wired to the host's hook
//! surface (session start/stop, pre-compact, post-edit, task updates,
//! prompt injection). The stdin-fed hooks tolerate unparseable input by
//! exiting cleanly: a broken hook payload must never break the host tool.

use std::io::Read;

use anyhow::Result;
use serde::Deserialize;

use crate::cli::HookCommand;
use crate::config::VibeGateConfig;
use crate::workflow::infer::infer_step;

use super::open_engine;

pub fn run(config: &VibeGateConfig, hook: HookCommand) -> Result<()> {
    match hook {
        HookCommand::SessionStart => session_start(config),
        HookCommand::SessionEnd => session_end(config),
        HookCommand::PreCompact => pre_compact(config),
        HookCommand::PostEdit => post_edit(config),
        HookCommand::TaskSync => task_sync(config),
        HookCommand::PromptContext => prompt_context(config),
    }
}

fn session_start(config: &VibeGateConfig) -> Result<()> {
    let mut engine = open_engine(config)?;
    engine.mark_session_started()?;

    // Sync the stored flag with the artifact actually on disk.
    if config.paths().context_pack_file().exists() {
        engine.set_context_pack_exists(true)?;
    }

    print!("{}", engine.summary());

    let info = engine.step_info();
    println!(
        "\n[CURRENT TASK] Step {} - {}\n\
         \x20  Gate: {}\n\
         \x20  Code editing: {}\n",
        engine.current_step(),
        info.name,
        info.gate,
        if info.allows_code_edit {
            "ALLOWED"
        } else {
            "NOT ALLOWED"
        },
    );
    Ok(())
}

fn session_end(config: &VibeGateConfig) -> Result<()> {
    let mut engine = open_engine(config)?;
    let backup = engine.mark_session_ended()?;

    println!(
        "\n\
         ================================================================\n\
         \x20           VIBEGATE SESSION STATE SAVED\n\
         ================================================================\n\
         Final Step: {}\n\
         Bead: {}\n\
         Backup: {}\n\
         State will be restored on next session start.\n\
         ================================================================\n",
        engine.current_step(),
        engine.state().current_bead_id.as_deref().unwrap_or("None"),
        backup
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "None".to_string()),
    );
    Ok(())
}

fn pre_compact(config: &VibeGateConfig) -> Result<()> {
    let mut engine = open_engine(config)?;
    let backup = engine.mark_compacted()?;

    println!(
        "\n\
         ================================================================\n\
         \x20           VIBEGATE STATE SAVED (PRE-COMPACT)\n\
         ================================================================\n\
         Backup: {}\n\
         Step: {}\n\
         Bead: {}\n\
         State will be reloaded at next session start.\n\
         ================================================================\n",
        backup
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "None".to_string()),
        engine.current_step(),
        engine.state().current_bead_id.as_deref().unwrap_or("None"),
    );
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
struct EditEvent {
    #[serde(default)]
    file_path: String,
}

fn post_edit(config: &VibeGateConfig) -> Result<()> {
    let event: EditEvent = read_stdin_json().unwrap_or_default();
    let file_path = if event.file_path.is_empty() {
        "unknown".to_string()
    } else {
        event.file_path
    };

    let mut engine = open_engine(config)?;
    let invalidated = engine.record_edit(&file_path)?;
    if invalidated {
        println!("⚠️ Tests invalidated by code edit. Must re-run verification (Step 9).");
    }

    if (8..=11).contains(&engine.current_step()) {
        println!(
            "\n[EDIT RECORDED] Remember:\n\
             \x20  - Step 9: Run tests/checks to verify changes\n\
             \x20  - Step 10: All tests must pass before human review\n\
             \x20  - Step 12: Human must understand and approve code\n"
        );
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
struct TaskEvent {
    #[serde(default, rename = "taskId")]
    task_id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    subject: String,
}

fn task_sync(config: &VibeGateConfig) -> Result<()> {
    let event: TaskEvent = match read_stdin_json() {
        Some(event) => event,
        None => return Ok(()),
    };

    let mut engine = open_engine(config)?;

    match event.status.as_str() {
        "completed" => {
            if let Some(step) = infer_step(&event.subject) {
                if step > engine.current_step() {
                    engine.set_current_step(step)?;
                    println!("✅ vibegate: advanced to Step {step} based on task completion");
                }
                // Completing certain steps flips their gate flag too.
                match step {
                    7 => {
                        engine.set_context_pack_exists(true)?;
                        println!("✅ Context pack marked as complete");
                    }
                    9 => {
                        engine.set_tests_passed(true)?;
                        println!("✅ Tests marked as passed");
                    }
                    12 => {
                        engine.set_human_approval(true)?;
                        println!("✅ Human review marked as approved");
                    }
                    _ => {}
                }
            }
        }
        "in_progress" => {
            let bead_id = (!event.task_id.is_empty()).then_some(event.task_id.as_str());
            engine.set_task_selected(true, bead_id)?;
            if let Some(step) = infer_step(&event.subject) {
                engine.set_current_step(step)?;
                println!("✅ vibegate: now on Step {step}");
            }
        }
        _ => {}
    }

    Ok(())
}

fn prompt_context(config: &VibeGateConfig) -> Result<()> {
    let engine = open_engine(config)?;
    let info = engine.step_info();
    println!(
        "[vibegate Step {}: {}] Code edit: {}",
        engine.current_step(),
        info.name,
        if info.allows_code_edit { "YES" } else { "NO" },
    );
    Ok(())
}

fn read_stdin_json<T: for<'de> Deserialize<'de>>() -> Option<T> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw).ok()?;
    serde_json::from_str(&raw).ok()
}
