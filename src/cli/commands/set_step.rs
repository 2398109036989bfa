use anyhow::{bail, Result};

use crate::config::VibeGateConfig;
use crate::workflow::steps::MAX_STEP;

use super::open_engine;

pub fn run(config: &VibeGateConfig, step: i64) -> Result<()> {
    if !(0..=MAX_STEP as i64).contains(&step) {
        bail!("step must be between 0 and {MAX_STEP}");
    }

    let mut engine = open_engine(config)?;
    engine.set_current_step(step as u8)?;
    println!("✅ Step set to {step}");
    print!("{}", engine.summary());
    Ok(())
}
