use photoframe::config::Config;
use photoframe::radius::RadiusPercent;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("photoframe.toml")).unwrap();

    assert_eq!(config.store.dir, dir.path().join("widgets"));
    assert_eq!(config.render.dir, dir.path().join("rendered"));
    assert_eq!(config.render.default_percent, RadiusPercent::new(50));
    assert!(!config.render.bleed);
}

#[test]
fn parse_full_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photoframe.toml");
    std::fs::write(
        &path,
        r#"
[store]
dir = "state/widgets"

[render]
dir = "/tmp/surfaces"
default_percent = 25
bleed = true
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.store.dir, dir.path().join("state/widgets"));
    assert_eq!(config.render.dir, std::path::PathBuf::from("/tmp/surfaces"));
    assert_eq!(config.render.default_percent, RadiusPercent::new(25));
    assert!(config.render.bleed);
}

#[test]
fn partial_sections_use_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photoframe.toml");
    std::fs::write(&path, "[render]\nbleed = true\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert!(config.render.bleed);
    assert_eq!(config.render.default_percent, RadiusPercent::DEFAULT);
    assert_eq!(config.store.dir, dir.path().join("widgets"));
}

#[test]
fn rejects_out_of_range_default_percent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photoframe.toml");
    std::fs::write(&path, "[render]\ndefault_percent = 120\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("between 0 and 100"));
}

#[test]
fn rejects_malformed_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photoframe.toml");
    std::fs::write(&path, "[render\nbleed = ").unwrap();

    assert!(Config::load(&path).is_err());
}

#[test]
fn default_template_parses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photoframe.toml");
    std::fs::write(&path, Config::default_template()).unwrap();

    let config = Config::load(&path).unwrap();
    let defaults = Config::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, defaults);
}
