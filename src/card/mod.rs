//! # Card Configuration Model
//!
//! [`CardConfig`] is the complete description of one quote card: content,
//! typography, theme, overlay, and date display. It is a plain value type —
//! created with documented defaults, mutated field by field in response to
//! user actions, and serialized as-is into the named configuration store.
//!
//! The theme-transition contract lives here: switching themes always
//! re-applies that theme's default text color and overlay opacity (never
//! leaving stale values from the previous theme), and a custom background
//! image exists if and only if the theme is [`Theme::CustomImage`].
//!
//! All enums are closed sum types serialized as snake_case strings, so a
//! persisted record is a flat JSON object:
//!
//! ```json
//! {
//!   "text": "Creativity is intelligence having fun.",
//!   "author": "Albert Einstein",
//!   "font": "sans",
//!   "ratio": "square",
//!   "theme": "minimal_dark",
//!   "fontSize": 5.0,
//!   "alignment": "center",
//!   "showDate": false,
//!   "textColor": "#ffffff",
//!   "overlayOpacity": 0.0,
//!   "dateFormat": "iso"
//! }
//! ```

pub mod date;
pub mod layout;
pub mod theme;

use serde::{Deserialize, Serialize};

use crate::error::QuoteSnapError;

/// Typeface family for the quote body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Display,
    Mono,
    Handwriting,
    Condensed,
    Marker,
}

impl FontFamily {
    /// Serif and Display carry the detached decorative quote glyph.
    pub fn has_quote_glyph(self) -> bool {
        matches!(self, FontFamily::Serif | FontFamily::Display)
    }
}

/// Card aspect ratio. Width is fixed; the ratio determines height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    /// 1:1
    #[default]
    Square,
    /// 3:4
    Portrait,
    /// 9:16
    Story,
    /// 16:9
    Landscape,
}

impl AspectRatio {
    /// (width, height) proportions.
    pub fn proportions(self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1, 1),
            AspectRatio::Portrait => (3, 4),
            AspectRatio::Story => (9, 16),
            AspectRatio::Landscape => (16, 9),
        }
    }
}

/// Visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    MinimalDark,
    MinimalLight,
    GradientSunset,
    GradientOcean,
    Neon,
    Paper,
    CustomImage,
}

/// Block alignment for body text and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Footer date style.
///
/// Serialized as snake_case; deserialization is lenient — an unrecognized
/// stored value falls back to `Iso` so an old or foreign preference record
/// never breaks a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    #[default]
    Iso,
    /// `MM/DD/YYYY`
    MmDdYyyy,
    /// `DD/MM/YYYY`
    DdMmYyyy,
    /// `YYYY年MM月DD日`, regardless of locale
    Cn,
    /// Weekday-prefixed; Chinese in zh, English weekday + ISO elsewhere
    CnWeekday,
}

impl DateFormat {
    /// Parse a stored tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "iso" => DateFormat::Iso,
            "mm_dd_yyyy" => DateFormat::MmDdYyyy,
            "dd_mm_yyyy" => DateFormat::DdMmYyyy,
            "cn" => DateFormat::Cn,
            "cn_weekday" => DateFormat::CnWeekday,
            _ => return None,
        })
    }
}

impl<'de> Deserialize<'de> for DateFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(DateFormat::from_tag(&tag).unwrap_or_default())
    }
}

/// The complete description of one quote card's content and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfig {
    /// Quote body. May be empty; the layout substitutes a localized
    /// placeholder.
    #[serde(default)]
    pub text: String,
    /// Attribution line. May be empty.
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub font: FontFamily,
    #[serde(default)]
    pub ratio: AspectRatio,
    #[serde(default)]
    pub theme: Theme,
    /// Background image source (URL or local path). Present iff
    /// `theme == Theme::CustomImage`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_background_image: Option<String>,
    /// UI scale 1–10 in steps of 0.5, not absolute units.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub show_date: bool,
    /// Hex color for all card text.
    #[serde(default = "default_text_color")]
    pub text_color: String,
    /// Overlay layer opacity in [0, 0.9].
    #[serde(default)]
    pub overlay_opacity: f32,
    #[serde(default)]
    pub date_format: DateFormat,
}

fn default_font_size() -> f32 {
    5.0
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            text: "Creativity is intelligence having fun.".to_string(),
            author: "Albert Einstein".to_string(),
            font: FontFamily::Sans,
            ratio: AspectRatio::Square,
            theme: Theme::MinimalDark,
            custom_background_image: None,
            font_size: 5.0,
            alignment: Alignment::Center,
            show_date: false,
            text_color: "#ffffff".to_string(),
            overlay_opacity: 0.0,
            date_format: DateFormat::Iso,
        }
    }
}

impl CardConfig {
    /// Switch themes, applying the new theme's default text color and
    /// overlay opacity and clearing any custom background when leaving
    /// [`Theme::CustomImage`].
    pub fn set_theme(&mut self, theme: Theme) {
        let defaults = theme::defaults_for(theme);
        self.theme = theme;
        self.text_color = defaults.text_color.to_string();
        self.overlay_opacity = defaults.overlay_opacity;
        if theme != Theme::CustomImage {
            self.custom_background_image = None;
        }
    }

    /// Assign a custom background image (upload or preset path), switching
    /// to [`Theme::CustomImage`] and applying the readability defaults:
    /// white text and a 0.3 overlay.
    pub fn set_background_image(&mut self, source: impl Into<String>) {
        self.theme = Theme::CustomImage;
        self.custom_background_image = Some(source.into());
        self.text_color = theme::defaults_for(Theme::CustomImage).text_color.to_string();
        self.overlay_opacity = theme::CUSTOM_IMAGE_ASSIGNED_OPACITY;
    }

    /// Check ranges and cross-field invariants.
    ///
    /// The UI controls clamp these before they ever reach us; out-of-range
    /// values can only arrive programmatically or from a tampered stored
    /// record, and are reported rather than silently clamped.
    pub fn validate(&self) -> Result<(), QuoteSnapError> {
        if !(1.0..=10.0).contains(&self.font_size) {
            return Err(QuoteSnapError::Validation(format!(
                "fontSize {} outside [1, 10]",
                self.font_size
            )));
        }
        if !(0.0..=0.9).contains(&self.overlay_opacity) {
            return Err(QuoteSnapError::Validation(format!(
                "overlayOpacity {} outside [0, 0.9]",
                self.overlay_opacity
            )));
        }
        if theme::parse_hex_color(&self.text_color).is_none() {
            return Err(QuoteSnapError::Validation(format!(
                "textColor {:?} is not a hex color",
                self.text_color
            )));
        }
        if self.custom_background_image.is_some() && self.theme != Theme::CustomImage {
            return Err(QuoteSnapError::Validation(
                "customBackgroundImage set without the custom_image theme".to_string(),
            ));
        }
        Ok(())
    }
}
