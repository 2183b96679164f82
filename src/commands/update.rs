use anyhow::{bail, Result};
use colored::Colorize;

use crate::cli::Cli;
use crate::config::Config;
use crate::store::WidgetId;
use crate::widget::{DirectoryHost, Rendered, Widgets};

pub fn run(cli: &Cli, ids: &[WidgetId]) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let widgets = Widgets::open(&config)?;
    let mut host = DirectoryHost::new(&config.render.dir)?;

    let ids = if ids.is_empty() {
        widgets.store().ids()?
    } else {
        ids.to_vec()
    };

    if ids.is_empty() {
        println!("{} No widgets to update.", "!".yellow());
        return Ok(());
    }

    let mut failed = 0;
    for (id, outcome) in widgets.update(&mut host, &ids) {
        match outcome {
            Rendered::Photo {
                width,
                height,
                percent,
            } => println!(
                "{} Widget {}: {}x{} at {}",
                "✓".green(),
                id,
                width,
                height,
                percent
            ),
            Rendered::Placeholder => {
                println!("{} Widget {}: no photo, showing placeholder", "!".yellow(), id)
            }
            Rendered::Failed(e) => {
                failed += 1;
                eprintln!("{} Widget {}: {:#}", "✗".red(), id, e);
            }
        }
    }

    if failed > 0 {
        bail!("{failed} widget(s) failed to update");
    }
    Ok(())
}
