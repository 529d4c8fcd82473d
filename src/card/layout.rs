//! # Layout Realization
//!
//! Turns a [`CardConfig`] into a [`RenderSpec`]: the fully resolved,
//! side-effect-free description of the card's visual output. After
//! `realize`, no further decision-making is needed — an exporter or preview
//! surface just paints what the spec says.
//!
//! ## Guarantees
//!
//! - Pure and deterministic: the same config, locale, and date always
//!   produce an identical spec (required for reproducible export and for
//!   regression testing).
//! - Total over valid configs: out-of-range inputs are rejected up front as
//!   validation errors, never clamped or crashed on.
//!
//! The only clock access lives in [`realize`], which resolves "today" once
//! and delegates to the pure [`realize_on`].

use serde::Serialize;

use super::date::format_date;
use super::theme::{self, BackgroundSpec, OverlaySpec};
use super::{Alignment, CardConfig, FontFamily};
use crate::error::QuoteSnapError;
use crate::i18n::Catalog;

/// Fixed logical width of the render surface in pixels. Height follows
/// from the aspect ratio.
pub const SURFACE_WIDTH: u32 = 600;

/// Inner padding of the card surface in logical pixels.
pub const SURFACE_PADDING: u32 = 48;

/// Resolved block alignment for body and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockAlign {
    Start,
    Center,
    End,
}

impl From<Alignment> for BlockAlign {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::Left => BlockAlign::Start,
            Alignment::Center => BlockAlign::Center,
            Alignment::Right => BlockAlign::End,
        }
    }
}

/// The quote body, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyBlock {
    /// Body text, or the localized placeholder when the quote is empty.
    pub content: String,
    /// True when `content` is the placeholder rather than user text.
    pub is_placeholder: bool,
    pub font: FontFamily,
    /// Relative em size: `1.5 + font_size * 0.25`, so 1.75–4.0 over the
    /// 1–10 scale.
    pub base_size_em: f32,
    /// Detached decorative quote mark above-left of the body
    /// (serif/display faces only).
    pub quote_glyph: bool,
}

/// The attribution footer. Present only when there is something to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterBlock {
    /// Author line, separated from the body by a rule above it.
    pub author: Option<String>,
    /// Formatted date line, rendered at reduced size and opacity.
    pub date_line: Option<String>,
}

/// The fully resolved, side-effect-free description of a card's pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSpec {
    pub width: u32,
    pub height: u32,
    pub background: BackgroundSpec,
    pub overlay: OverlaySpec,
    /// Opacity of the overlay layer, composited beneath text and above the
    /// background.
    pub overlay_opacity: f32,
    /// Hex color applied to all card text.
    pub text_color: String,
    /// One alignment drives both body and footer.
    pub alignment: BlockAlign,
    pub body: BodyBlock,
    pub footer: Option<FooterBlock>,
    /// Small branding mark in the bottom-right corner.
    pub watermark: String,
}

/// Realize a config against today's date in the local calendar.
pub fn realize(config: &CardConfig, catalog: &Catalog) -> Result<RenderSpec, QuoteSnapError> {
    realize_on(config, catalog, chrono::Local::now().date_naive())
}

/// Realize a config against an explicit calendar date.
///
/// The date always reflects render time, not config-save time: a stored
/// card shows the current date whenever it is re-rendered.
pub fn realize_on(
    config: &CardConfig,
    catalog: &Catalog,
    date: chrono::NaiveDate,
) -> Result<RenderSpec, QuoteSnapError> {
    config.validate()?;

    let (rw, rh) = config.ratio.proportions();
    let height = (SURFACE_WIDTH * rh + rw / 2) / rw;

    let style = theme::base_style(config.theme, config.custom_background_image.as_deref());

    let is_placeholder = config.text.is_empty();
    let content = if is_placeholder {
        catalog.lookup("preview.empty").to_string()
    } else {
        config.text.clone()
    };

    let footer = if !config.author.is_empty() || config.show_date {
        Some(FooterBlock {
            author: (!config.author.is_empty()).then(|| config.author.clone()),
            date_line: config
                .show_date
                .then(|| format_date(date, config.date_format, catalog.locale())),
        })
    } else {
        None
    };

    Ok(RenderSpec {
        width: SURFACE_WIDTH,
        height,
        background: style.background,
        overlay: style.overlay,
        overlay_opacity: config.overlay_opacity,
        text_color: config.text_color.clone(),
        alignment: config.alignment.into(),
        body: BodyBlock {
            content,
            is_placeholder,
            font: config.font,
            base_size_em: 1.5 + config.font_size * 0.25,
            quote_glyph: config.font.has_quote_glyph(),
        },
        footer,
        watermark: catalog.lookup("brand.watermark").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{AspectRatio, DateFormat, Theme};
    use crate::i18n::Locale;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn en() -> Catalog {
        Catalog::new(Locale::En)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 28).unwrap()
    }

    #[test]
    fn test_realize_is_deterministic() {
        let mut config = CardConfig::default();
        config.show_date = true;
        config.set_theme(Theme::GradientSunset);

        let a = realize_on(&config, &en(), day()).unwrap();
        let b = realize_on(&config, &en(), day()).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_surface_heights() {
        let mut config = CardConfig::default();
        for (ratio, expected) in [
            (AspectRatio::Square, 600),
            (AspectRatio::Portrait, 800),
            (AspectRatio::Story, 1067),
            (AspectRatio::Landscape, 338),
        ] {
            config.ratio = ratio;
            let spec = realize_on(&config, &en(), day()).unwrap();
            assert_eq!(spec.width, 600);
            assert_eq!(spec.height, expected, "ratio {ratio:?}");
        }
    }

    #[test]
    fn test_font_size_boundaries() {
        let mut config = CardConfig::default();
        config.font_size = 1.0;
        assert_eq!(realize_on(&config, &en(), day()).unwrap().body.base_size_em, 1.75);
        config.font_size = 10.0;
        assert_eq!(realize_on(&config, &en(), day()).unwrap().body.base_size_em, 4.0);
    }

    #[test]
    fn test_out_of_range_opacity_is_validation_error() {
        let mut config = CardConfig::default();
        config.overlay_opacity = 1.2;
        match realize_on(&config, &en(), day()) {
            Err(QuoteSnapError::Validation(_)) => {}
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_quote_glyph_only_for_serif_and_display() {
        let mut config = CardConfig::default();
        for (font, expected) in [
            (FontFamily::Sans, false),
            (FontFamily::Serif, true),
            (FontFamily::Display, true),
            (FontFamily::Mono, false),
            (FontFamily::Handwriting, false),
            (FontFamily::Condensed, false),
            (FontFamily::Marker, false),
        ] {
            config.font = font;
            let spec = realize_on(&config, &en(), day()).unwrap();
            assert_eq!(spec.body.quote_glyph, expected, "font {font:?}");
        }
    }

    #[test]
    fn test_empty_card_shows_placeholder_without_footer() {
        let mut config = CardConfig::default();
        config.text.clear();
        config.author.clear();
        config.show_date = false;

        let spec = realize_on(&config, &en(), day()).unwrap();
        assert!(spec.body.is_placeholder);
        assert_eq!(spec.body.content, "Type something inspiring...");
        assert_eq!(spec.footer, None);
    }

    #[test]
    fn test_footer_composition() {
        let mut config = CardConfig::default();
        config.show_date = true;
        config.date_format = DateFormat::CnWeekday;

        let spec = realize_on(&config, &Catalog::new(Locale::Zh), day()).unwrap();
        let footer = spec.footer.expect("footer");
        assert_eq!(footer.author.as_deref(), Some("Albert Einstein"));
        assert_eq!(footer.date_line.as_deref(), Some("星期五，2025年11月28日"));

        // Date alone still produces a footer.
        config.author.clear();
        let spec = realize_on(&config, &en(), day()).unwrap();
        let footer = spec.footer.expect("footer");
        assert_eq!(footer.author, None);
        assert_eq!(footer.date_line.as_deref(), Some("Friday, 2025-11-28"));
    }

    #[test]
    fn test_alignment_drives_body_and_footer_together() {
        let mut config = CardConfig::default();
        config.alignment = Alignment::Right;
        let spec = realize_on(&config, &en(), day()).unwrap();
        assert_eq!(spec.alignment, BlockAlign::End);
    }

    #[test]
    fn test_custom_image_without_source_renders_transparent() {
        let mut config = CardConfig::default();
        config.set_theme(Theme::CustomImage);
        let spec = realize_on(&config, &en(), day()).unwrap();
        assert_eq!(spec.background, BackgroundSpec::Transparent);
        assert_eq!(spec.overlay, OverlaySpec::SolidDark);
    }
}
