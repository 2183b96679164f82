use std::collections::BTreeMap;

use anyhow::Result;
use image::{Rgba, RgbaImage};
use photoframe::radius::RadiusPercent;
use photoframe::store::{WidgetId, WidgetStore};
use photoframe::widget::{DirectoryHost, Preview, Rendered, WidgetHost, Widgets};

/// Remembers what each widget was last bound to.
#[derive(Default)]
struct RecordingHost {
    bound: BTreeMap<WidgetId, Option<RgbaImage>>,
    binds: usize,
}

impl WidgetHost for RecordingHost {
    fn bind(&mut self, id: WidgetId, image: Option<&RgbaImage>) -> Result<()> {
        self.bound.insert(id, image.cloned());
        self.binds += 1;
        Ok(())
    }
}

const BLUE: Rgba<u8> = Rgba([20, 40, 200, 255]);

fn widgets(dir: &std::path::Path, bleed: bool) -> Widgets {
    Widgets::new(WidgetStore::open(dir).unwrap(), RadiusPercent::DEFAULT, bleed)
}

#[test]
fn failed_select_leaves_previous_widget_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut widgets = widgets(dir.path(), false);
    let mut host = RecordingHost::default();
    widgets
        .select_image(&mut host, WidgetId(1), &RgbaImage::from_pixel(20, 20, BLUE), RadiusPercent::new(20))
        .unwrap();

    let prefs = dir.path().join("widgets.toml");
    std::fs::remove_file(&prefs).unwrap();
    std::fs::create_dir(&prefs).unwrap();
    std::fs::write(prefs.join("keep"), b"x").unwrap();

    let result = widgets.select_image(
        &mut host,
        WidgetId(1),
        &RgbaImage::from_pixel(64, 32, BLUE),
        RadiusPercent::new(90),
    );

    assert!(result.is_err());
    let stored = widgets.store().load_image(WidgetId(1)).unwrap().unwrap();
    assert_eq!(stored.dimensions(), (20, 20));
    assert_eq!(widgets.percent(WidgetId(1)), RadiusPercent::new(20));
    assert_eq!(host.binds, 1);
}

#[test]
fn preview_opens_a_picked_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("picked.png");
    RgbaImage::from_pixel(50, 30, BLUE).save(&path).unwrap();

    let preview = Preview::open(&path, RadiusPercent::MAX).unwrap();
    assert_eq!(preview.image().dimensions(), (50, 30));
    assert_eq!(preview.image().get_pixel(0, 0)[3], 0);
    assert_eq!(*preview.image().get_pixel(25, 15), BLUE);

    let missing = Preview::open(&dir.path().join("gone.png"), RadiusPercent::MAX);
    assert!(missing.is_err());
}

#[test]
fn select_image_persists_and_renders() {
    let dir = tempfile::tempdir().unwrap();
    let mut widgets = widgets(dir.path(), false);
    let mut host = RecordingHost::default();
    let src = RgbaImage::from_pixel(200, 100, BLUE);

    widgets
        .select_image(&mut host, WidgetId(1), &src, RadiusPercent::new(50))
        .unwrap();

    assert_eq!(widgets.store().radius_percent(WidgetId(1)), Some(RadiusPercent::new(50)));
    let stored = widgets.store().load_image(WidgetId(1)).unwrap().unwrap();
    assert_eq!(stored.dimensions(), (200, 100));
    assert_eq!(stored.get_pixel(0, 0)[3], 0);
    assert_eq!(*stored.get_pixel(100, 50), BLUE);

    let shown = host.bound[&WidgetId(1)].as_ref().unwrap();
    assert_eq!(shown.dimensions(), (200, 100));
    assert_eq!(shown.get_pixel(0, 0)[3], 0);
    assert_eq!(*shown.get_pixel(100, 50), BLUE);
}

#[test]
fn update_without_photo_binds_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let widgets = widgets(dir.path(), false);
    let mut host = RecordingHost::default();

    let results = widgets.update(&mut host, &[WidgetId(4)]);

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0].1, Rendered::Placeholder));
    assert_eq!(host.bound[&WidgetId(4)], None);
}

#[test]
fn update_uses_stored_percent() {
    let dir = tempfile::tempdir().unwrap();
    let mut widgets = widgets(dir.path(), false);
    let mut host = RecordingHost::default();
    let src = RgbaImage::from_pixel(40, 40, BLUE);

    widgets
        .select_image(&mut host, WidgetId(2), &src, RadiusPercent::new(20))
        .unwrap();

    let results = widgets.update(&mut host, &[WidgetId(2)]);
    match &results[0].1 {
        Rendered::Photo {
            width,
            height,
            percent,
        } => {
            assert_eq!((*width, *height), (40, 40));
            assert_eq!(*percent, RadiusPercent::new(20));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn update_continues_past_a_broken_widget() {
    let dir = tempfile::tempdir().unwrap();
    let mut widgets = widgets(dir.path(), false);
    let mut host = RecordingHost::default();
    widgets
        .select_image(&mut host, WidgetId(2), &RgbaImage::from_pixel(10, 10, BLUE), RadiusPercent::MAX)
        .unwrap();
    std::fs::write(dir.path().join("pic_1.png"), b"broken").unwrap();

    let results = widgets.update(&mut host, &[WidgetId(1), WidgetId(2)]);

    assert!(matches!(results[0].1, Rendered::Failed(_)));
    assert!(matches!(results[1].1, Rendered::Photo { .. }));
}

#[test]
fn deleted_widget_loads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut widgets = widgets(dir.path(), false);
    let mut host = RecordingHost::default();
    widgets
        .select_image(&mut host, WidgetId(9), &RgbaImage::from_pixel(16, 16, BLUE), RadiusPercent::new(75))
        .unwrap();

    let removed = widgets.delete(&[WidgetId(9), WidgetId(10)]).unwrap();
    assert_eq!(removed, vec![(WidgetId(9), true), (WidgetId(10), false)]);

    assert!(widgets.store().load_image(WidgetId(9)).unwrap().is_none());
    assert_eq!(widgets.percent(WidgetId(9)), RadiusPercent::DEFAULT);

    let results = widgets.update(&mut host, &[WidgetId(9)]);
    assert!(matches!(results[0].1, Rendered::Placeholder));
}

#[test]
fn percent_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let widgets = Widgets::new(
        WidgetStore::open(dir.path()).unwrap(),
        RadiusPercent::new(30),
        false,
    );
    assert_eq!(widgets.percent(WidgetId(1)), RadiusPercent::new(30));
}

#[test]
fn bleed_colours_transparent_corners() {
    let dir = tempfile::tempdir().unwrap();
    let mut widgets = widgets(dir.path(), true);
    let mut host = RecordingHost::default();

    widgets
        .select_image(&mut host, WidgetId(1), &RgbaImage::from_pixel(30, 30, BLUE), RadiusPercent::MAX)
        .unwrap();

    let stored = widgets.store().load_image(WidgetId(1)).unwrap().unwrap();
    assert_eq!(stored.get_pixel(0, 0)[3], 0);
    assert_eq!(stored.get_pixel(0, 0)[2], BLUE[2]);
}

#[test]
fn preview_does_not_touch_storage() {
    let dir = tempfile::tempdir().unwrap();
    let store_dir = dir.path().join("store");
    let mut widgets = widgets(&store_dir, false);
    let mut host = RecordingHost::default();

    let mut preview = Preview::new(RgbaImage::from_pixel(60, 60, BLUE), RadiusPercent::MIN).unwrap();
    assert_eq!(preview.image().get_pixel(0, 0)[3], 255);

    for p in [10, 40, 100] {
        let img = preview.set_percent(RadiusPercent::new(p)).unwrap();
        assert_eq!(img.dimensions(), (60, 60));
    }
    assert_eq!(preview.image().get_pixel(0, 0)[3], 0);
    assert_eq!(preview.percent(), RadiusPercent::MAX);
    assert!(widgets.store().ids().unwrap().is_empty());
    assert_eq!(host.binds, 0);

    preview.confirm(&mut widgets, &mut host, WidgetId(6)).unwrap();
    assert_eq!(widgets.store().radius_percent(WidgetId(6)), Some(RadiusPercent::MAX));
    assert_eq!(host.binds, 1);
}

#[test]
fn directory_host_writes_and_clears_surfaces() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = DirectoryHost::new(&dir.path().join("rendered")).unwrap();
    let img = RgbaImage::from_pixel(5, 5, BLUE);

    host.bind(WidgetId(3), Some(&img)).unwrap();
    let path = host.surface_path(WidgetId(3));
    assert_eq!(image::open(&path).unwrap().into_rgba8(), img);

    host.bind(WidgetId(3), None).unwrap();
    assert!(!path.exists());
    host.bind(WidgetId(3), None).unwrap();
}
