//! Level command - describe a confidence score.

use clap::Args;

use cardex_core::confidence_level;

/// Arguments for the level command.
#[derive(Args)]
pub struct LevelArgs {
    /// Confidence between 0 and 1
    confidence: f64,
}

pub fn run(args: LevelArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.confidence) {
        anyhow::bail!("Confidence must be between 0 and 1, got {}", args.confidence);
    }
    println!("{}", confidence_level(args.confidence));
    Ok(())
}
