use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::CONFIG_NAME;
use crate::radius::RadiusPercent;
use crate::store::WidgetId;

#[derive(Parser)]
#[command(
    name = "photoframe",
    about = "Rounded-corner photo widgets: mask, persist and render photos per widget"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true, default_value = CONFIG_NAME)]
    pub config: PathBuf,

    /// Log pipeline details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default photoframe.toml
    Init,

    /// Round the corners of a single image without touching any widget
    Apply {
        /// Source image
        input: PathBuf,

        /// Where to write the PNG result
        #[arg(short, long)]
        output: PathBuf,

        /// Corner radius as a percentage of half the shortest side (0-100)
        #[arg(long, value_parser = parse_percent)]
        percent: Option<RadiusPercent>,
    },

    /// Set the photo shown by a widget
    Set {
        /// Widget ID
        id: WidgetId,

        /// Picked image
        image: PathBuf,

        /// Corner radius percent (default: the widget's current value)
        #[arg(long, value_parser = parse_percent)]
        percent: Option<RadiusPercent>,
    },

    /// Change a widget's corner radius and redraw it
    Percent {
        /// Widget ID
        id: WidgetId,

        /// Corner radius percent (0-100)
        #[arg(value_parser = parse_percent)]
        percent: RadiusPercent,
    },

    /// Redraw widgets from storage (all known widgets when none are given)
    Update {
        ids: Vec<WidgetId>,
    },

    /// Delete widgets along with their stored photo and preferences
    Remove {
        #[arg(required = true)]
        ids: Vec<WidgetId>,
    },

    /// List stored widgets
    List,

    /// Check config validity and stored images
    Check,
}

pub fn parse_percent(s: &str) -> Result<RadiusPercent, String> {
    let value: i64 = s
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    RadiusPercent::try_from(value).map_err(|e| e.to_string())
}
