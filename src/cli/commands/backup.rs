use anyhow::Result;

use crate::config::VibeGateConfig;

use super::open_engine;

pub fn run(config: &VibeGateConfig) -> Result<()> {
    let engine = open_engine(config)?;

    match engine.backup("manual")? {
        Some(backup) => println!("✅ Backup created: {}", backup.display()),
        None => println!("✅ No state file yet, nothing to back up"),
    }
    Ok(())
}
