//! Single-flag setters: approvals, verification, context, task selection.

use anyhow::Result;

use crate::config::VibeGateConfig;

use super::open_engine;

pub fn approve(config: &VibeGateConfig, approved: bool) -> Result<()> {
    let mut engine = open_engine(config)?;
    engine.set_human_approval(approved)?;
    if approved {
        println!("✅ Human approval granted");
    } else {
        println!("✅ Human approval revoked");
    }
    Ok(())
}

pub fn tests(config: &VibeGateConfig, passed: bool) -> Result<()> {
    let mut engine = open_engine(config)?;
    engine.set_tests_passed(passed)?;
    if passed {
        println!("✅ Tests marked as passed");
    } else {
        println!("✅ Tests marked as failed");
    }
    Ok(())
}

pub fn context_pack(config: &VibeGateConfig) -> Result<()> {
    let mut engine = open_engine(config)?;
    engine.set_context_pack_exists(true)?;
    println!("✅ Context pack marked as complete");
    Ok(())
}

pub fn select_task(config: &VibeGateConfig, task_id: &str) -> Result<()> {
    let mut engine = open_engine(config)?;
    engine.set_task_selected(true, Some(task_id))?;
    println!("✅ Task {task_id} selected");
    Ok(())
}
