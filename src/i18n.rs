//! # Locale Tags and Message Catalog
//!
//! The render layer never hardcodes a user-visible string per locale;
//! everything goes through a message-key lookup against a catalog for the
//! current locale. Two locales ship built in (`zh` is the default, matching
//! the product's primary audience; `en` is the fallback for everything
//! else). Unknown keys resolve to the empty string.

use serde::{Deserialize, Serialize};

/// Current UI locale, parsed from a BCP 47-ish tag.
///
/// Anything that is not Chinese is treated as English for message lookup;
/// date formatting has its own, stricter fallback rules (see
/// [`crate::card::date`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Zh,
}

impl Locale {
    /// Parse a locale tag. `"zh"`, `"zh-CN"` etc. map to [`Locale::Zh`];
    /// everything else maps to [`Locale::En`].
    pub fn parse(tag: &str) -> Self {
        let lower = tag.to_ascii_lowercase();
        if lower == "zh" || lower.starts_with("zh-") || lower.starts_with("zh_") {
            Locale::Zh
        } else {
            Locale::En
        }
    }

    /// True when the tag resolves to Chinese.
    pub fn is_zh(self) -> bool {
        matches!(self, Locale::Zh)
    }
}

/// Message lookup for a fixed locale.
///
/// Deliberately a value type: a `Catalog` is cheap to copy into a render
/// call and carries no loading state, so layout realization stays pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    locale: Locale,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up a message key for this catalog's locale.
    ///
    /// Falls back to English, then to the empty string.
    pub fn lookup(&self, key: &str) -> &'static str {
        let msg = match self.locale {
            Locale::Zh => lookup_zh(key),
            Locale::En => None,
        };
        msg.or_else(|| lookup_en(key)).unwrap_or("")
    }
}

fn lookup_en(key: &str) -> Option<&'static str> {
    Some(match key {
        "preview.empty" => "Type something inspiring...",
        "brand.watermark" => "QuoteSnap",
        "errors.save" => "Failed to save configuration",
        "errors.load" => "Failed to load configuration",
        "errors.delete" => "Failed to delete configuration",
        "errors.download" => "Failed to export image",
        _ => return None,
    })
}

fn lookup_zh(key: &str) -> Option<&'static str> {
    Some(match key {
        "preview.empty" => "写点有灵感的话……",
        "brand.watermark" => "QuoteSnap",
        "errors.save" => "保存配置失败",
        "errors.load" => "加载配置失败",
        "errors.delete" => "删除配置失败",
        "errors.download" => "导出图片失败",
        _ => return None,
    })
}
