use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::bleed::alpha_bleed;
use crate::cli::Cli;
use crate::config::Config;
use crate::mask::apply_rounded_mask;
use crate::photo;
use crate::radius::RadiusPercent;

pub fn run(cli: &Cli, input: &Path, output: &Path, percent: Option<RadiusPercent>) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let percent = percent.unwrap_or(config.render.default_percent);

    let source = photo::open(input)?;
    let radius = percent.pixels(source.width(), source.height());
    let mut masked = apply_rounded_mask(&source, radius)?;
    if config.render.bleed {
        alpha_bleed(&mut masked);
    }

    let bytes = photo::encode_png(&masked)
        .with_context(|| format!("Failed to encode {}", input.display()))?;
    std::fs::write(output, bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} {} -> {} ({}x{}, {} = {:.1}px)",
        "✓".green(),
        input.display(),
        output.display(),
        masked.width(),
        masked.height(),
        percent,
        radius
    );
    Ok(())
}
