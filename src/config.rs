use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::radius::RadiusPercent;

pub const CONFIG_NAME: &str = "photoframe.toml";

#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory holding per-widget images and preferences (default: "widgets")
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Directory the widget host renders into (default: "rendered")
    #[serde(default = "default_render_dir")]
    pub dir: PathBuf,

    /// Radius used when a widget has no stored preference (default: 50)
    #[serde(default)]
    pub default_percent: RadiusPercent,

    /// Bleed colour into transparent corners before persisting (default: false)
    #[serde(default)]
    pub bleed: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dir: default_render_dir(),
            default_percent: RadiusPercent::default(),
            bleed: false,
        }
    }
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("widgets")
}

fn default_render_dir() -> PathBuf {
    PathBuf::from("rendered")
}

impl Config {
    /// Loads the config, falling back to defaults when the file does not exist.
    /// Relative directories are resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Config::default()
        };

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.store.dir = config_dir.join(&config.store.dir);
        config.render.dir = config_dir.join(&config.render.dir);

        Ok(config)
    }

    pub fn default_template() -> String {
        r#"# photoframe configuration

[store]
dir = "widgets"        # Per-widget images (pic_<id>.png) and widgets.toml

[render]
dir = "rendered"       # Where widgets are drawn (widget_<id>.png)
default_percent = 50   # Corner radius for widgets without a stored value (0-100)
bleed = false          # Fill transparent corners with edge colour (helps scaled hosts)
"#
        .to_string()
    }
}
