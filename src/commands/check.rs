use anyhow::{bail, Result};
use colored::Colorize;

use crate::cli::Cli;
use crate::config::Config;
use crate::store::WidgetStore;

pub fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    if cli.config.exists() {
        println!("{} Config is valid ({})", "✓".green(), cli.config.display());
    } else {
        println!(
            "{} No config at {}, using defaults. Run `photoframe init` to create one.",
            "!".yellow(),
            cli.config.display()
        );
    }

    if !config.store.dir.exists() {
        println!(
            "{} No widget store yet ({}).",
            "!".yellow(),
            config.store.dir.display()
        );
        return Ok(());
    }

    let store = WidgetStore::open(&config.store.dir)?;
    let issues = store.verify()?;

    if issues.is_empty() {
        println!(
            "{} {} widget(s) stored, all images intact.",
            "✓".green(),
            store.ids()?.len()
        );
        return Ok(());
    }

    for issue in &issues {
        println!("{} {}", "✗".red(), issue);
    }
    bail!("{} problem(s) found in {}", issues.len(), store.dir().display());
}
