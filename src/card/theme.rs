//! # Theme Resolution
//!
//! Maps a [`Theme`] to its concrete visual treatment: a background spec, an
//! overlay spec, and the per-theme defaults for text color and overlay
//! opacity that a theme switch applies.
//!
//! Every match here is exhaustive on purpose. Adding a theme variant must
//! fail to compile until each resolver has an answer for it; a silent
//! catch-all would mask the new variant falling through to some unrelated
//! look.

use serde::{Deserialize, Serialize};

use super::Theme;

/// Per-theme defaults applied when the user switches themes.
///
/// | Theme | text color | overlay opacity |
/// |-------|-----------|-----------------|
/// | MinimalDark | `#ffffff` | 0 |
/// | MinimalLight | `#18181b` | 0 |
/// | Paper | `#18181b` | 0 |
/// | Neon | `#22d3ee` | 0.5 |
/// | GradientSunset | `#ffffff` | 0.1 |
/// | GradientOcean | `#ffffff` | 0.1 |
/// | CustomImage | `#ffffff` | 0 on switch; 0.3 when a background is assigned |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeDefaults {
    pub text_color: &'static str,
    pub overlay_opacity: f32,
}

/// Readability overlay applied when a custom background image is assigned
/// (upload or preset), as opposed to merely switching to the CustomImage
/// theme.
pub const CUSTOM_IMAGE_ASSIGNED_OPACITY: f32 = 0.3;

/// Parse a `#rgb` or `#rrggbb` hex color into RGB bytes.
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, ch) in hex.chars().enumerate() {
                let v = ch.to_digit(16)? as u8;
                rgb[i] = v * 16 + v;
            }
            Some(rgb)
        }
        6 => {
            let mut rgb = [0u8; 3];
            for i in 0..3 {
                rgb[i] = u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok()?;
            }
            Some(rgb)
        }
        _ => None,
    }
}

/// Defaults for a theme switch alone.
///
/// The CustomImage readability overlay (0.3) is applied by
/// [`CardConfig::set_background_image`](super::CardConfig::set_background_image)
/// when an image is actually assigned, not here.
pub fn defaults_for(theme: Theme) -> ThemeDefaults {
    match theme {
        Theme::MinimalDark => ThemeDefaults {
            text_color: "#ffffff",
            overlay_opacity: 0.0,
        },
        Theme::MinimalLight | Theme::Paper => ThemeDefaults {
            text_color: "#18181b",
            overlay_opacity: 0.0,
        },
        Theme::Neon => ThemeDefaults {
            text_color: "#22d3ee",
            overlay_opacity: 0.5,
        },
        Theme::GradientSunset | Theme::GradientOcean => ThemeDefaults {
            text_color: "#ffffff",
            overlay_opacity: 0.1,
        },
        Theme::CustomImage => ThemeDefaults {
            text_color: "#ffffff",
            overlay_opacity: 0.0,
        },
    }
}

/// Direction of a linear gradient, corner to corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientDirection {
    /// Top-left → bottom-right.
    ToBottomRight,
    /// Bottom-left → top-right.
    ToTopRight,
}

/// How an image background is fitted to the card surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFit {
    /// Scale to cover the surface, centered, cropping the overflow.
    CoverCenter,
}

/// Background treatment for a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackgroundSpec {
    /// Flat fill.
    Solid { color: String },
    /// Linear gradient through the given hex stops.
    Gradient {
        stops: Vec<String>,
        direction: GradientDirection,
    },
    /// Image fill. `source` is a URL or a local path.
    Image { source: String, fit: ImageFit },
    /// Nothing to paint yet (CustomImage theme with no image assigned).
    Transparent,
}

/// Overlay treatment composited between background and text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlaySpec {
    /// No overlay layer (minimal themes).
    None,
    /// Solid dark scrim for readability over busy backgrounds.
    SolidDark,
    /// Subtle paper-grain texture.
    Texture,
}

/// A theme's resolved base style, before user overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStyle {
    pub background: BackgroundSpec,
    pub overlay: OverlaySpec,
}

/// Resolve a theme (plus an optional custom background source) to its base
/// style.
pub fn base_style(theme: Theme, custom_background: Option<&str>) -> BaseStyle {
    match theme {
        Theme::MinimalDark => BaseStyle {
            background: BackgroundSpec::Solid {
                color: "#18181b".into(),
            },
            overlay: OverlaySpec::None,
        },
        Theme::MinimalLight => BaseStyle {
            background: BackgroundSpec::Solid {
                color: "#ffffff".into(),
            },
            overlay: OverlaySpec::None,
        },
        Theme::GradientSunset => BaseStyle {
            background: BackgroundSpec::Gradient {
                stops: vec!["#fb923c".into(), "#ec4899".into(), "#9333ea".into()],
                direction: GradientDirection::ToBottomRight,
            },
            overlay: OverlaySpec::SolidDark,
        },
        Theme::GradientOcean => BaseStyle {
            background: BackgroundSpec::Gradient {
                stops: vec!["#2563eb".into(), "#2dd4bf".into(), "#34d399".into()],
                direction: GradientDirection::ToTopRight,
            },
            overlay: OverlaySpec::SolidDark,
        },
        Theme::Neon => BaseStyle {
            background: BackgroundSpec::Solid {
                color: "#000000".into(),
            },
            overlay: OverlaySpec::SolidDark,
        },
        Theme::Paper => BaseStyle {
            background: BackgroundSpec::Solid {
                color: "#f5f0e6".into(),
            },
            overlay: OverlaySpec::Texture,
        },
        Theme::CustomImage => BaseStyle {
            background: match custom_background {
                Some(source) => BackgroundSpec::Image {
                    source: source.to_string(),
                    fit: ImageFit::CoverCenter,
                },
                None => BackgroundSpec::Transparent,
            },
            overlay: OverlaySpec::SolidDark,
        },
    }
}
