use std::env;

use anyhow::{Context, Result};
use log::info;
use wand_shell::{Trace, replay};

fn main() -> Result<()> {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .context("Usage: wand <trace.toml>")?;
    let trace = Trace::load(&path)?;
    info!("Replaying {} events from `{path}`", trace.events.len());

    let report = replay(&trace)?;
    for gesture in &report.gestures {
        println!("{:>8.3}s  {}", gesture.time, gesture.label);
    }
    for object in report.scene.objects() {
        if !object.visible {
            println!("still hidden: {}", object.name);
        }
    }
    Ok(())
}
