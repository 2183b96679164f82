use anyhow::Result;
use colored::Colorize;

use crate::cli::Cli;
use crate::config::Config;
use crate::widget::Widgets;

pub fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let widgets = Widgets::open(&config)?;
    let store = widgets.store();
    let ids = store.ids()?;

    println!("{}", "Widgets".bold());
    println!("{:<12} {:<10} {:<14} Radius", "ID", "Percent", "Size");
    println!("{}", "-".repeat(50));
    for &id in &ids {
        let percent = match store.radius_percent(id) {
            Some(p) => p.to_string(),
            None => format!("{} (default)", widgets.percent(id)),
        };
        let (size, radius) = match image::image_dimensions(store.image_path(id)) {
            Ok((w, h)) => (
                format!("{w}x{h}"),
                format!("{:.1}px", widgets.percent(id).pixels(w, h)),
            ),
            Err(_) => ("-".to_string(), "-".to_string()),
        };
        println!("{:<12} {:<10} {:<14} {}", id, percent, size, radius);
    }
    println!("\nTotal: {}", ids.len());
    Ok(())
}
