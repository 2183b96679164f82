use anyhow::{bail, Result};
use colored::Colorize;

use crate::cli::Cli;
use crate::config::Config;
use crate::radius::RadiusPercent;
use crate::store::WidgetId;
use crate::widget::{DirectoryHost, Widgets};

pub fn run(cli: &Cli, id: WidgetId, percent: RadiusPercent) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let mut widgets = Widgets::open(&config)?;

    if !widgets.store().ids()?.contains(&id) {
        bail!("widget {id} not found. Set a photo first with `photoframe set {id} <image>`.");
    }

    let mut host = DirectoryHost::new(&config.render.dir)?;
    let previous = widgets.percent(id);
    widgets.set_percent(&mut host, id, percent)?;

    println!(
        "{} Widget {}: corner radius {} -> {}",
        "✓".green(),
        id,
        previous,
        percent
    );
    Ok(())
}
