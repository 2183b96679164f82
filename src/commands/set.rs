use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::cli::Cli;
use crate::config::Config;
use crate::radius::RadiusPercent;
use crate::store::WidgetId;
use crate::widget::{DirectoryHost, Preview, Widgets};

pub fn run(cli: &Cli, id: WidgetId, image: &Path, percent: Option<RadiusPercent>) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let mut widgets = Widgets::open(&config)?;
    let mut host = DirectoryHost::new(&config.render.dir)?;

    let percent = percent.unwrap_or_else(|| widgets.percent(id));
    let preview = Preview::open(image, percent)?;
    let (width, height) = preview.image().dimensions();

    preview.confirm(&mut widgets, &mut host, id)?;

    println!(
        "{} Widget {} shows {} at {} ({}x{}, {:.1}px)",
        "✓".green(),
        id,
        image.display(),
        percent,
        width,
        height,
        percent.pixels(width, height)
    );
    Ok(())
}
