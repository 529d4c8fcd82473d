//! # Pipeline Tests
//!
//! End-to-end coverage of the public surface: configure a card, realize it,
//! capture a PNG, and round-trip configurations through the file-backed
//! store. Everything here runs offline against a fixed calendar date so the
//! output is reproducible.

use chrono::NaiveDate;
use quotesnap::card::layout::{self, realize_on};
use quotesnap::card::{AspectRatio, CardConfig, DateFormat, Theme};
use quotesnap::export::{CaptureOptions, ExportCoordinator};
use quotesnap::i18n::{Catalog, Locale};
use quotesnap::store::prefs::{self, Preferences};
use quotesnap::store::{ConfigStore, FileBackend};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 28).unwrap()
}

#[test]
fn config_to_png_end_to_end() {
    let mut config = CardConfig::default();
    config.text = "The best way out is always through.".to_string();
    config.author = "Robert Frost".to_string();
    config.set_theme(Theme::GradientOcean);
    config.show_date = true;
    config.ratio = AspectRatio::Portrait;

    let spec = realize_on(&config, &Catalog::new(Locale::En), day()).unwrap();
    assert_eq!((spec.width, spec.height), (600, 800));

    let exporter = ExportCoordinator::with_default_rasterizer();
    let artifact = exporter.capture(&spec, &CaptureOptions::default()).unwrap();

    // Decode what we encoded: export resolution is 2x the logical surface.
    let decoded = image::load_from_memory(&artifact.png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1200, 1600));
    assert!(artifact.filename.starts_with("quotesnap-"));
    assert!(artifact.filename.ends_with(".png"));
}

#[test]
fn every_theme_captures_without_error() {
    let exporter = ExportCoordinator::with_default_rasterizer();
    let options = CaptureOptions {
        quality: 1.0,
        pixel_ratio: 1,
    };

    for theme in [
        Theme::MinimalDark,
        Theme::MinimalLight,
        Theme::GradientSunset,
        Theme::GradientOcean,
        Theme::Neon,
        Theme::Paper,
        Theme::CustomImage, // no image assigned: transparent background
    ] {
        let mut config = CardConfig::default();
        config.set_theme(theme);
        let spec = realize_on(&config, &Catalog::new(Locale::En), day()).unwrap();
        exporter
            .capture(&spec, &options)
            .unwrap_or_else(|e| panic!("capture failed for {theme:?}: {e}"));
    }
}

#[test]
fn zh_card_renders_localized_placeholder_and_date() {
    let mut config = CardConfig::default();
    config.text.clear();
    config.show_date = true;
    config.date_format = DateFormat::CnWeekday;

    let spec = realize_on(&config, &Catalog::new(Locale::Zh), day()).unwrap();
    assert_eq!(spec.body.content, "写点有灵感的话……");
    let footer = spec.footer.as_ref().expect("footer");
    assert_eq!(footer.date_line.as_deref(), Some("星期五，2025年11月28日"));

    // CJK text rasterizes (with fallback glyphs) rather than erroring.
    let exporter = ExportCoordinator::with_default_rasterizer();
    exporter
        .capture(&spec, &CaptureOptions { quality: 1.0, pixel_ratio: 1 })
        .unwrap();
}

#[test]
fn store_and_preferences_share_a_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotesnap.json");

    let mut store = ConfigStore::open(FileBackend::new(&path));
    let mut config = CardConfig::default();
    config.set_theme(Theme::Paper);
    store.save("paper-card", &config).unwrap();
    prefs::store_date_format(store.backend_mut(), DateFormat::Cn).unwrap();
    drop(store);

    // Reopen: both the named config and the preference survive.
    let store = ConfigStore::open(FileBackend::new(&path));
    assert_eq!(store.load("paper-card").unwrap(), config);
    assert_eq!(
        prefs::load(store.backend()),
        Preferences {
            date_format: DateFormat::Cn
        }
    );
}

#[test]
fn saved_config_rerealizes_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotesnap.json");

    let mut config = CardConfig::default();
    config.set_theme(Theme::Neon);
    config.font_size = 7.5;
    config.show_date = true;

    let mut store = ConfigStore::open(FileBackend::new(&path));
    store.save("neon", &config).unwrap();
    drop(store);

    let store = ConfigStore::open(FileBackend::new(&path));
    let reloaded = store.load("neon").unwrap();

    let catalog = Catalog::new(Locale::En);
    assert_eq!(
        layout::realize_on(&config, &catalog, day()).unwrap(),
        layout::realize_on(&reloaded, &catalog, day()).unwrap()
    );
}
