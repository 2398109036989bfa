use anyhow::Result;

use crate::config::VibeGateConfig;

use super::open_engine;

pub fn run(config: &VibeGateConfig) -> Result<()> {
    let engine = open_engine(config)?;
    print!("{}", engine.summary());

    let history = engine.state().history.as_slice();
    let recent = &history[history.len().saturating_sub(5)..];
    if !recent.is_empty() {
        println!("\n[Recent History]");
        for entry in recent {
            println!(
                "   {} | {}",
                entry.timestamp.format("%Y-%m-%dT%H:%M:%S"),
                entry.message
            );
        }
    }

    Ok(())
}
