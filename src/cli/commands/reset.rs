use anyhow::Result;

use crate::config::VibeGateConfig;

use super::open_engine;

pub fn run(config: &VibeGateConfig) -> Result<()> {
    let mut engine = open_engine(config)?;

    match engine.reset()? {
        Some(backup) => println!("[BACKUP] Created: {}", backup.display()),
        None => println!("[BACKUP] No state file yet, nothing to back up"),
    }
    println!("✅ Workflow state reset to initial");
    Ok(())
}
