use anyhow::Result;
use colored::Colorize;

use crate::cli::Cli;
use crate::config::Config;
use crate::store::WidgetId;
use crate::widget::{DirectoryHost, WidgetHost, Widgets};

pub fn run(cli: &Cli, ids: &[WidgetId]) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let mut widgets = Widgets::open(&config)?;
    let mut host = DirectoryHost::new(&config.render.dir)?;

    for &id in ids {
        let existed = widgets.remove(id)?;
        host.bind(id, None)?;
        if existed {
            println!("{} Removed widget {}", "✓".green(), id);
        } else {
            println!("{} Widget {} had nothing stored", "!".yellow(), id);
        }
    }
    Ok(())
}
