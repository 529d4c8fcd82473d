//! # Software Card Rasterizer
//!
//! Paints a [`RenderSpec`] onto an RGBA pixel buffer: background fill
//! (solid, linear gradient, or cover-fitted image), overlay scrim, then
//! text composited on top with the Spleen bitmap font family scaled to the
//! spec's em size.
//!
//! Remote background images are never fetched here — rasterization stays
//! synchronous and deterministic. URL sources must be preloaded into the
//! cache (see [`resolve_background`](super::resolve_background)); a cache
//! miss for a URL is an export failure, the moral equivalent of a tainted
//! capture surface.

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use spleen_font::{FONT_8X16, FONT_12X24, PSF2Font};
use std::collections::HashMap;

use super::{CaptureOptions, Rasterizer};
use crate::card::FontFamily;
use crate::card::layout::{BlockAlign, RenderSpec, SURFACE_PADDING};
use crate::card::theme::{
    BackgroundSpec, GradientDirection, ImageFit, OverlaySpec, parse_hex_color,
};
use crate::error::QuoteSnapError;

/// Software rasterizer for card render specs.
#[derive(Default)]
pub struct CardRasterizer {
    image_cache: HashMap<String, DynamicImage>,
}

impl CardRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a decoded background image into the cache under its source
    /// string (URL or path).
    pub fn preload(&mut self, source: &str, image: DynamicImage) {
        self.image_cache.insert(source.to_string(), image);
    }

    /// True when `source` is already available for a synchronous capture.
    pub fn is_loaded(&self, source: &str) -> bool {
        self.image_cache.contains_key(source)
    }

    fn background_image(&self, source: &str) -> Result<DynamicImage, QuoteSnapError> {
        if let Some(cached) = self.image_cache.get(source) {
            return Ok(cached.clone());
        }
        if source.starts_with("http://") || source.starts_with("https://") {
            return Err(QuoteSnapError::Export(format!(
                "Remote background {source} has not been resolved"
            )));
        }
        image::open(source)
            .map_err(|e| QuoteSnapError::Export(format!("Failed to load background {source}: {e}")))
    }
}

impl Rasterizer for CardRasterizer {
    fn rasterize(
        &self,
        spec: &RenderSpec,
        options: &CaptureOptions,
    ) -> Result<RgbaImage, QuoteSnapError> {
        let scale = options.pixel_ratio.max(1);
        let width = spec.width * scale;
        let height = spec.height * scale;
        let mut surface = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

        self.paint_background(&mut surface, &spec.background)?;
        paint_overlay(&mut surface, spec.overlay, spec.overlay_opacity);
        paint_text(&mut surface, spec, scale)?;

        Ok(surface)
    }
}

impl CardRasterizer {
    fn paint_background(
        &self,
        surface: &mut RgbaImage,
        background: &BackgroundSpec,
    ) -> Result<(), QuoteSnapError> {
        match background {
            BackgroundSpec::Solid { color } => {
                let rgb = parse_color(color)?;
                fill(surface, rgb);
            }
            BackgroundSpec::Gradient { stops, direction } => {
                let rgb_stops: Vec<[u8; 3]> =
                    stops.iter().map(|s| parse_color(s)).collect::<Result<_, _>>()?;
                paint_gradient(surface, &rgb_stops, *direction)?;
            }
            BackgroundSpec::Image { source, fit } => {
                let image = self.background_image(source)?;
                let ImageFit::CoverCenter = fit;
                let fitted = image
                    .resize_to_fill(surface.width(), surface.height(), FilterType::Lanczos3)
                    .to_rgba8();
                image::imageops::overlay(surface, &fitted, 0, 0);
            }
            BackgroundSpec::Transparent => {}
        }
        Ok(())
    }
}

fn parse_color(hex: &str) -> Result<[u8; 3], QuoteSnapError> {
    parse_hex_color(hex)
        .ok_or_else(|| QuoteSnapError::Export(format!("Unpaintable color {hex:?}")))
}

fn fill(surface: &mut RgbaImage, rgb: [u8; 3]) {
    for pixel in surface.pixels_mut() {
        *pixel = Rgba([rgb[0], rgb[1], rgb[2], 255]);
    }
}

/// Linear multi-stop gradient along a corner-to-corner axis.
fn paint_gradient(
    surface: &mut RgbaImage,
    stops: &[[u8; 3]],
    direction: GradientDirection,
) -> Result<(), QuoteSnapError> {
    if stops.is_empty() {
        return Err(QuoteSnapError::Export("Gradient with no stops".to_string()));
    }
    let (w, h) = (surface.width() as f32, surface.height() as f32);
    let span = (w + h).max(1.0);

    for (x, y, pixel) in surface.enumerate_pixels_mut() {
        let t = match direction {
            GradientDirection::ToBottomRight => (x as f32 + y as f32) / span,
            GradientDirection::ToTopRight => (x as f32 + (h - y as f32)) / span,
        };
        let rgb = sample_stops(stops, t.clamp(0.0, 1.0));
        *pixel = Rgba([rgb[0], rgb[1], rgb[2], 255]);
    }
    Ok(())
}

fn sample_stops(stops: &[[u8; 3]], t: f32) -> [u8; 3] {
    if stops.len() == 1 {
        return stops[0];
    }
    let segments = (stops.len() - 1) as f32;
    let position = t * segments;
    let i = (position.floor() as usize).min(stops.len() - 2);
    let local = position - i as f32;

    let mut rgb = [0u8; 3];
    for c in 0..3 {
        let a = stops[i][c] as f32;
        let b = stops[i + 1][c] as f32;
        rgb[c] = (a + (b - a) * local).round() as u8;
    }
    rgb
}

fn paint_overlay(surface: &mut RgbaImage, overlay: OverlaySpec, opacity: f32) {
    match overlay {
        OverlaySpec::None => {}
        OverlaySpec::SolidDark => {
            if opacity > 0.0 {
                for pixel in surface.pixels_mut() {
                    blend(pixel, [0, 0, 0], opacity);
                }
            }
        }
        OverlaySpec::Texture => {
            if opacity > 0.0 {
                for (x, y, pixel) in surface.enumerate_pixels_mut() {
                    // Deterministic speckle: a cheap integer hash stands in
                    // for the paper-grain texture image.
                    let speckle = (hash2(x, y) & 0xff) as f32 / 255.0;
                    blend(pixel, [92, 82, 64], opacity * speckle * 0.35);
                }
            }
        }
    }
}

/// 2D integer hash with decent avalanche for texture noise.
fn hash2(x: u32, y: u32) -> u32 {
    let mut v = x.wrapping_mul(0x9e37_79b9) ^ y.wrapping_mul(0x85eb_ca6b);
    v ^= v >> 13;
    v = v.wrapping_mul(0xc2b2_ae35);
    v ^ (v >> 16)
}

/// Alpha-blend `rgb` at `alpha` over an existing pixel.
fn blend(pixel: &mut Rgba<u8>, rgb: [u8; 3], alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    for c in 0..3 {
        let src = rgb[c] as f32;
        let dst = pixel.0[c] as f32;
        pixel.0[c] = (src * alpha + dst * (1.0 - alpha)).round() as u8;
    }
    let dst_a = pixel.0[3] as f32 / 255.0;
    pixel.0[3] = ((alpha + dst_a * (1.0 - alpha)) * 255.0).round() as u8;
}

// ============================================================================
// TEXT
// ============================================================================

/// Footer text size in logical pixels (fixed, independent of the body
/// scale, like the original footer).
const FOOTER_PX: u32 = 14;
/// Date line size in logical pixels.
const DATE_PX: u32 = 10;
/// Watermark size in logical pixels.
const WATERMARK_PX: u32 = 10;

struct TextPainter<'a> {
    surface: &'a mut RgbaImage,
    glyphs: GlyphSource,
    color: [u8; 3],
    pad: u32,
}

impl TextPainter<'_> {
    fn line_width(&mut self, text: &str, size_px: u32) -> u32 {
        text.chars().map(|ch| cell_width(ch, size_px)).sum()
    }

    fn aligned_x(&mut self, text: &str, size_px: u32, align: BlockAlign) -> u32 {
        let width = self.surface.width();
        let text_w = self.line_width(text, size_px);
        match align {
            BlockAlign::Start => self.pad,
            BlockAlign::Center => (width.saturating_sub(text_w)) / 2,
            BlockAlign::End => width.saturating_sub(self.pad + text_w),
        }
    }

    /// Draw one line of text; returns the x where drawing started.
    fn draw_line(&mut self, text: &str, x: u32, y: u32, size_px: u32, alpha: f32) {
        let mut cursor = x;
        for ch in text.chars() {
            let cell_w = cell_width(ch, size_px);
            self.draw_glyph(ch, cursor, y, cell_w, size_px, alpha);
            cursor += cell_w;
        }
    }

    fn draw_glyph(&mut self, ch: char, x: u32, y: u32, cell_w: u32, cell_h: u32, alpha: f32) {
        if ch == ' ' {
            return;
        }
        let (bitmap, base_w, base_h) = self.glyphs.bitmap(ch);
        for dy in 0..cell_h {
            for dx in 0..cell_w {
                let sx = (dx as usize * base_w) / cell_w as usize;
                let sy = (dy as usize * base_h) / cell_h as usize;
                if bitmap[sy * base_w + sx] == 0 {
                    continue;
                }
                let (px, py) = (x + dx, y + dy);
                if px < self.surface.width() && py < self.surface.height() {
                    blend(self.surface.get_pixel_mut(px, py), self.color, alpha);
                }
            }
        }
    }
}

/// Advance width of one character cell. Spleen glyphs are 2:1; characters
/// outside the font (CJK and friends) get a full-width cell.
fn cell_width(ch: char, size_px: u32) -> u32 {
    if ch.is_ascii() { size_px / 2 } else { size_px }
}

/// Spleen-backed glyph bitmaps with a per-capture cache.
struct GlyphSource {
    family: FontFamily,
    cache: HashMap<char, (Vec<u8>, usize, usize)>,
}

impl GlyphSource {
    fn new(family: FontFamily) -> Self {
        Self {
            family,
            cache: HashMap::new(),
        }
    }

    fn bitmap(&mut self, ch: char) -> (Vec<u8>, usize, usize) {
        if let Some(cached) = self.cache.get(&ch) {
            return cached.clone();
        }
        let generated = generate_glyph(self.family, ch);
        self.cache.insert(ch, generated.clone());
        generated
    }
}

/// Generate a base glyph bitmap (row-major 0/1 bytes) for a character.
///
/// Condensed maps to the narrower Spleen 8x16 face; everything else uses
/// 12x24. Characters missing from Spleen render as a box outline, the same
/// fallback the bitmap-preview tradition uses for unknown glyphs.
fn generate_glyph(family: FontFamily, ch: char) -> (Vec<u8>, usize, usize) {
    let (data, w, h): (&[u8], usize, usize) = match family {
        FontFamily::Condensed => (FONT_8X16, 8, 16),
        _ => (FONT_12X24, 12, 24),
    };
    let mut bitmap = vec![0u8; w * h];

    let mut spleen = PSF2Font::new(data).unwrap();
    let utf8 = ch.to_string();
    if let Some(glyph) = spleen.glyph_for_utf8(utf8.as_bytes()) {
        for (row_y, row) in glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                let idx = row_y * w + col_x;
                if idx < bitmap.len() {
                    bitmap[idx] = if on { 1 } else { 0 };
                }
            }
        }
    } else {
        draw_box(&mut bitmap, w, h);
    }
    (bitmap, w, h)
}

/// Draw a box outline in the glyph buffer.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}

/// Greedy word wrap against a pixel budget, breaking oversized words (and
/// unspaced CJK runs) at character level.
fn wrap_text(text: &str, size_px: u32, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        if raw_line.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        let mut current_w = 0u32;
        let space_w = cell_width(' ', size_px);

        for word in raw_line.split(' ') {
            let word_w: u32 = word.chars().map(|ch| cell_width(ch, size_px)).sum();
            let needed = if current.is_empty() {
                word_w
            } else {
                current_w + space_w + word_w
            };

            if needed <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                    current_w += space_w;
                }
                current.push_str(word);
                current_w += word_w;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_w = 0;
            }

            if word_w <= max_width {
                current.push_str(word);
                current_w = word_w;
            } else {
                // Character-level break for words wider than the card.
                for ch in word.chars() {
                    let ch_w = cell_width(ch, size_px);
                    if current_w + ch_w > max_width && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                        current_w = 0;
                    }
                    current.push(ch);
                    current_w += ch_w;
                }
            }
        }
        lines.push(current);
    }
    lines
}

fn paint_text(surface: &mut RgbaImage, spec: &RenderSpec, scale: u32) -> Result<(), QuoteSnapError> {
    let color = parse_color(&spec.text_color)?;
    let width = surface.width();
    let height = surface.height();
    let pad = SURFACE_PADDING * scale;

    let mut painter = TextPainter {
        surface,
        glyphs: GlyphSource::new(spec.body.font),
        color,
        pad,
    };

    let body_px = (spec.body.base_size_em * 16.0 * scale as f32).round() as u32;
    let body_alpha = if spec.body.is_placeholder { 0.6 } else { 1.0 };
    let body_line_h = body_px + body_px / 8;
    let max_text_w = width.saturating_sub(2 * pad);
    let lines = wrap_text(&spec.body.content, body_px, max_text_w);

    let footer_px = FOOTER_PX * scale;
    let date_px = DATE_PX * scale;
    let mut footer_h = 0u32;
    if let Some(footer) = &spec.footer {
        footer_h += 32 * scale; // gap between body and footer
        if footer.author.is_some() {
            footer_h += 2 * scale + 8 * scale + footer_px; // rule, gap, author line
        }
        if footer.date_line.is_some() {
            footer_h += 4 * scale + date_px;
        }
    }

    let body_h = lines.len() as u32 * body_line_h;
    let total_h = body_h + footer_h;
    let mut y = height.saturating_sub(total_h) / 2;

    // Detached decorative quote mark, above-left of the first body line.
    if spec.body.quote_glyph {
        let first = lines.first().map(String::as_str).unwrap_or("");
        let body_x = painter.aligned_x(first, body_px, spec.alignment);
        let glyph_px = 60 * scale;
        let gx = body_x.saturating_sub(32 * scale);
        let gy = y.saturating_sub(48 * scale);
        painter.draw_glyph('"', gx, gy, glyph_px / 2, glyph_px, 0.2);
    }

    for line in &lines {
        let x = painter.aligned_x(line, body_px, spec.alignment);
        painter.draw_line(line, x, y, body_px, body_alpha);
        y += body_line_h;
    }

    if let Some(footer) = &spec.footer {
        y += 32 * scale;
        if let Some(author) = &footer.author {
            let author = author.to_uppercase();
            let x = painter.aligned_x(&author, footer_px, spec.alignment);
            let rule_w = painter.line_width(&author, footer_px);
            // Rule above the author line.
            for dy in 0..(2 * scale) {
                for dx in 0..rule_w {
                    let (px, py) = (x + dx, y + dy);
                    if px < width && py < height {
                        blend(painter.surface.get_pixel_mut(px, py), color, 0.8);
                    }
                }
            }
            y += 2 * scale + 8 * scale;
            painter.draw_line(&author, x, y, footer_px, 0.8);
            y += footer_px;
        }
        if let Some(date_line) = &footer.date_line {
            y += 4 * scale;
            let x = painter.aligned_x(date_line, date_px, spec.alignment);
            painter.draw_line(date_line, x, y, date_px, 0.48);
        }
    }

    // Watermark, bottom-right.
    let wm_px = WATERMARK_PX * scale;
    let wm_w = painter.line_width(&spec.watermark, wm_px);
    let wm_x = width.saturating_sub(16 * scale + wm_w);
    let wm_y = height.saturating_sub(16 * scale + wm_px);
    painter.draw_line(&spec.watermark, wm_x, wm_y, wm_px, 0.3);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::layout::realize_on;
    use crate::card::{CardConfig, Theme};
    use crate::i18n::{Catalog, Locale};
    use chrono::NaiveDate;

    fn spec_for(config: &CardConfig) -> RenderSpec {
        realize_on(
            config,
            &Catalog::new(Locale::En),
            NaiveDate::from_ymd_opt(2025, 11, 28).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_rasterize_dimensions_follow_pixel_ratio() {
        let rasterizer = CardRasterizer::new();
        let spec = spec_for(&CardConfig::default());

        let one = rasterizer
            .rasterize(&spec, &CaptureOptions { quality: 1.0, pixel_ratio: 1 })
            .unwrap();
        assert_eq!((one.width(), one.height()), (600, 600));

        let two = rasterizer.rasterize(&spec, &CaptureOptions::default()).unwrap();
        assert_eq!((two.width(), two.height()), (1200, 1200));
    }

    #[test]
    fn test_solid_background_color() {
        let rasterizer = CardRasterizer::new();
        let spec = spec_for(&CardConfig::default());
        let image = rasterizer
            .rasterize(&spec, &CaptureOptions { quality: 1.0, pixel_ratio: 1 })
            .unwrap();
        // MinimalDark corner pixel is the zinc-900 fill.
        assert_eq!(image.get_pixel(0, 0).0, [24, 24, 27, 255]);
    }

    #[test]
    fn test_gradient_varies_across_surface() {
        let rasterizer = CardRasterizer::new();
        let mut config = CardConfig::default();
        config.set_theme(Theme::GradientSunset);
        config.overlay_opacity = 0.0;
        let spec = spec_for(&config);
        let image = rasterizer
            .rasterize(&spec, &CaptureOptions { quality: 1.0, pixel_ratio: 1 })
            .unwrap();
        assert_ne!(image.get_pixel(0, 0), image.get_pixel(599, 599));
    }

    #[test]
    fn test_unresolved_remote_background_is_export_error() {
        let rasterizer = CardRasterizer::new();
        let mut config = CardConfig::default();
        config.set_background_image("https://example.com/bg.jpg");
        let spec = spec_for(&config);
        match rasterizer.rasterize(&spec, &CaptureOptions::default()) {
            Err(QuoteSnapError::Export(_)) => {}
            other => panic!("expected export error, got {other:?}"),
        }
    }

    #[test]
    fn test_preloaded_remote_background_succeeds() {
        let mut rasterizer = CardRasterizer::new();
        let source = "https://example.com/bg.jpg";
        rasterizer.preload(source, DynamicImage::new_rgba8(32, 32));
        assert!(rasterizer.is_loaded(source));

        let mut config = CardConfig::default();
        config.set_background_image(source);
        let spec = spec_for(&config);
        rasterizer
            .rasterize(&spec, &CaptureOptions { quality: 1.0, pixel_ratio: 1 })
            .unwrap();
    }

    #[test]
    fn test_wrap_text_breaks_on_width() {
        // 10px chars at size 20, budget 100px → 10 ASCII chars per line.
        let lines = wrap_text("aaaa bbbb cccc", 20, 100);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_wrap_text_character_breaks_unspaced_runs() {
        let lines = wrap_text("aaaaaaaaaaaaaaaaaaaaaa", 20, 100);
        assert!(lines.len() > 2);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn test_wrap_text_preserves_explicit_newlines() {
        let lines = wrap_text("one\ntwo", 20, 1000);
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_sample_stops_endpoints() {
        let stops = [[0, 0, 0], [255, 255, 255]];
        assert_eq!(sample_stops(&stops, 0.0), [0, 0, 0]);
        assert_eq!(sample_stops(&stops, 1.0), [255, 255, 255]);
        assert_eq!(sample_stops(&stops, 0.5), [128, 128, 128]);
    }
}
