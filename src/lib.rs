//! # QuoteSnap - Quote Card Rendering Library
//!
//! QuoteSnap turns short quotes into share-ready PNG cards. It provides:
//!
//! - **Card model**: a complete value-type description of one card
//!   (content, theme, typography, date display)
//! - **Layout realization**: pure config-to-pixels resolution with themed
//!   backgrounds, overlays, and localized dates
//! - **Export**: software rasterization and PNG encoding at a chosen
//!   device-pixel ratio
//! - **Storage**: named configuration snapshots and sticky preferences
//!   persisted as JSON
//!
//! ## Quick Start
//!
//! ```no_run
//! use quotesnap::card::{CardConfig, Theme, layout};
//! use quotesnap::export::{CaptureOptions, ExportCoordinator};
//! use quotesnap::i18n::{Catalog, Locale};
//!
//! let mut config = CardConfig::default();
//! config.text = "Stay hungry, stay foolish.".to_string();
//! config.author = "Steve Jobs".to_string();
//! config.set_theme(Theme::GradientSunset);
//!
//! let spec = layout::realize(&config, &Catalog::new(Locale::En))?;
//!
//! let exporter = ExportCoordinator::with_default_rasterizer();
//! let artifact = exporter.capture(&spec, &CaptureOptions::default())?;
//! std::fs::write(&artifact.filename, &artifact.png)?;
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`card`] | Configuration model, themes, dates, layout realization |
//! | [`export`] | Rasterization and PNG export |
//! | [`store`] | Named configurations and preferences |
//! | [`server`] | HTTP API |
//! | [`i18n`] | Locales and the UI string catalog |
//! | [`error`] | Error types |

pub mod card;
pub mod error;
pub mod export;
pub mod i18n;
pub mod server;
pub mod store;

// Re-exports for convenience
pub use card::CardConfig;
pub use error::QuoteSnapError;
