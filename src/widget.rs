use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::bleed::alpha_bleed;
use crate::config::Config;
use crate::mask::round_by_percent;
use crate::photo;
use crate::radius::RadiusPercent;
use crate::store::{WidgetId, WidgetStore};

/// The surface widgets are drawn on.
pub trait WidgetHost {
    /// Shows `image` on the widget, or the placeholder when `None`.
    fn bind(&mut self, id: WidgetId, image: Option<&RgbaImage>) -> Result<()>;
}

/// Renders every widget into `<dir>/widget_<id>.png`. A placeholder bind
/// removes the file.
#[derive(Debug)]
pub struct DirectoryHost {
    dir: PathBuf,
}

impl DirectoryHost {
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn surface_path(&self, id: WidgetId) -> PathBuf {
        self.dir.join(format!("widget_{id}.png"))
    }
}

impl WidgetHost for DirectoryHost {
    fn bind(&mut self, id: WidgetId, image: Option<&RgbaImage>) -> Result<()> {
        let path = self.surface_path(id);
        match image {
            Some(img) => img
                .save(&path)
                .with_context(|| format!("Failed to render widget {id} to {}", path.display())),
            None => match std::fs::remove_file(&path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e)
                    .with_context(|| format!("Failed to clear {}", path.display())),
                _ => Ok(()),
            },
        }
    }
}

/// What happened to one widget during [`Widgets::update`].
#[derive(Debug)]
pub enum Rendered {
    Photo { width: u32, height: u32, percent: RadiusPercent },
    Placeholder,
    Failed(anyhow::Error),
}

/// Widget lifecycle on top of the store: select, update, delete.
#[derive(Debug)]
pub struct Widgets {
    store: WidgetStore,
    default_percent: RadiusPercent,
    bleed: bool,
}

impl Widgets {
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self::new(
            WidgetStore::open(&config.store.dir)?,
            config.render.default_percent,
            config.render.bleed,
        ))
    }

    pub fn new(store: WidgetStore, default_percent: RadiusPercent, bleed: bool) -> Self {
        Self {
            store,
            default_percent,
            bleed,
        }
    }

    pub fn store(&self) -> &WidgetStore {
        &self.store
    }

    /// The widget's stored percent, or the configured default.
    pub fn percent(&self, id: WidgetId) -> RadiusPercent {
        self.store.radius_percent(id).unwrap_or(self.default_percent)
    }

    /// Masks `source`, persists it and the percent for `id`, then redraws the
    /// widget.
    pub fn select_image(
        &mut self,
        host: &mut dyn WidgetHost,
        id: WidgetId,
        source: &RgbaImage,
        percent: RadiusPercent,
    ) -> Result<()> {
        let masked = self.mask(source, percent)?;
        self.store.commit(id, &masked, Some(percent))?;
        info!("Widget {id}: stored {}x{} photo at {percent}", masked.width(), masked.height());
        drop(masked);

        if let Rendered::Failed(e) = self.render(host, id) {
            return Err(e);
        }
        Ok(())
    }

    /// Changes the stored percent and redraws. The stored photo is re-masked
    /// from itself, so corners can only get rounder until a new photo is set.
    pub fn set_percent(
        &mut self,
        host: &mut dyn WidgetHost,
        id: WidgetId,
        percent: RadiusPercent,
    ) -> Result<()> {
        self.store.set_radius_percent(id, percent)?;
        if let Rendered::Failed(e) = self.render(host, id) {
            return Err(e);
        }
        Ok(())
    }

    /// Redraws each widget from storage. One widget failing does not stop
    /// the others.
    pub fn update(
        &self,
        host: &mut dyn WidgetHost,
        ids: &[WidgetId],
    ) -> Vec<(WidgetId, Rendered)> {
        ids.iter()
            .map(|&id| {
                let outcome = self.render(host, id);
                if let Rendered::Failed(e) = &outcome {
                    warn!("Widget {id}: {e:#}");
                }
                (id, outcome)
            })
            .collect()
    }

    /// Forgets the widgets: their photos and preferences are deleted.
    pub fn delete(&mut self, ids: &[WidgetId]) -> Result<Vec<(WidgetId, bool)>> {
        let mut removed = Vec::with_capacity(ids.len());
        for &id in ids {
            removed.push((id, self.remove(id)?));
        }
        Ok(removed)
    }

    /// Deletes one widget's photo and preferences. Returns whether anything
    /// was stored.
    pub fn remove(&mut self, id: WidgetId) -> Result<bool> {
        let existed = self.store.remove(id)?;
        debug!("Widget {id}: removed (existed: {existed})");
        Ok(existed)
    }

    fn render(&self, host: &mut dyn WidgetHost, id: WidgetId) -> Rendered {
        match self.render_inner(host, id) {
            Ok(r) => r,
            Err(e) => Rendered::Failed(e),
        }
    }

    fn render_inner(&self, host: &mut dyn WidgetHost, id: WidgetId) -> Result<Rendered> {
        let percent = self.percent(id);
        let Some(stored) = self.store.load_image(id)? else {
            host.bind(id, None)?;
            return Ok(Rendered::Placeholder);
        };

        // Radius follows the stored image's own dimensions.
        let rounded = self.mask(&stored, percent)?;
        host.bind(id, Some(&rounded))?;

        Ok(Rendered::Photo {
            width: rounded.width(),
            height: rounded.height(),
            percent,
        })
    }

    fn mask(&self, source: &RgbaImage, percent: RadiusPercent) -> Result<RgbaImage> {
        debug_assert!(
            source.width() > 0 && source.height() > 0,
            "empty image handed to the compositor"
        );
        let mut masked = round_by_percent(source, percent)?;
        if self.bleed {
            alpha_bleed(&mut masked);
        }
        Ok(masked)
    }
}

/// Live preview while the user drags the radius slider. Nothing is persisted
/// until [`Preview::confirm`].
#[derive(Debug)]
pub struct Preview {
    original: RgbaImage,
    percent: RadiusPercent,
    masked: RgbaImage,
}

impl Preview {
    pub fn new(original: RgbaImage, percent: RadiusPercent) -> Result<Self> {
        let masked = round_by_percent(&original, percent)?;
        Ok(Self {
            original,
            percent,
            masked,
        })
    }

    pub fn open(path: &Path, percent: RadiusPercent) -> Result<Self> {
        Self::new(photo::open(path)?, percent)
    }

    pub fn percent(&self) -> RadiusPercent {
        self.percent
    }

    pub fn image(&self) -> &RgbaImage {
        &self.masked
    }

    /// Re-masks the original. The superseded preview is dropped.
    pub fn set_percent(&mut self, percent: RadiusPercent) -> Result<&RgbaImage> {
        if percent != self.percent {
            self.masked = round_by_percent(&self.original, percent)?;
            self.percent = percent;
        }
        Ok(&self.masked)
    }

    /// Hands the original photo and the chosen percent to the widget.
    pub fn confirm(
        self,
        widgets: &mut Widgets,
        host: &mut dyn WidgetHost,
        id: WidgetId,
    ) -> Result<()> {
        widgets.select_image(host, id, &self.original, self.percent)
    }
}
