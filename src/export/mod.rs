//! # Export Pipeline
//!
//! Turns a realized [`RenderSpec`] into a downloadable PNG artifact.
//!
//! The pipeline is a thin coordinator over a [`Rasterizer`] seam:
//! rasterize at the requested pixel ratio, encode as PNG, and stamp a
//! collision-free `quotesnap-<epoch millis>.png` filename. Remote
//! background images are resolved ahead of capture by
//! [`resolve_background`], so the capture itself never blocks on the
//! network and a missing remote image fails loudly instead of producing a
//! silently-blank card.

mod raster;

pub use raster::CardRasterizer;

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::card::layout::RenderSpec;
use crate::card::theme::BackgroundSpec;
use crate::error::QuoteSnapError;

/// Capture parameters for one export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Encoder quality hint in [0, 1]. Advisory for PNG (lossless); kept
    /// so a lossy encoder can honor it.
    pub quality: f32,
    /// Device-pixel multiplier over the 600px logical surface. Export uses
    /// 2 for crisp output; previews use 1.
    pub pixel_ratio: u32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            quality: 1.0,
            pixel_ratio: 2,
        }
    }
}

/// Pixel-producing backend behind the export pipeline.
pub trait Rasterizer {
    fn rasterize(
        &self,
        spec: &RenderSpec,
        options: &CaptureOptions,
    ) -> Result<RgbaImage, QuoteSnapError>;
}

/// A finished export: encoded PNG bytes plus the download filename.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// `quotesnap-<epoch millis>.png`
    pub filename: String,
    pub png: Vec<u8>,
}

/// Coordinates rasterization and encoding for one capture at a time.
pub struct ExportCoordinator<R: Rasterizer> {
    rasterizer: R,
}

impl ExportCoordinator<CardRasterizer> {
    pub fn with_default_rasterizer() -> Self {
        Self::new(CardRasterizer::new())
    }
}

impl<R: Rasterizer> ExportCoordinator<R> {
    pub fn new(rasterizer: R) -> Self {
        Self { rasterizer }
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn rasterizer_mut(&mut self) -> &mut R {
        &mut self.rasterizer
    }

    /// Rasterize and PNG-encode a spec, naming the artifact after the
    /// capture instant.
    pub fn capture(
        &self,
        spec: &RenderSpec,
        options: &CaptureOptions,
    ) -> Result<Artifact, QuoteSnapError> {
        let image = self.rasterizer.rasterize(spec, options)?;
        let png = encode_png(&image)?;
        Ok(Artifact {
            filename: export_filename(chrono::Utc::now().timestamp_millis()),
            png,
        })
    }
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, QuoteSnapError> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| QuoteSnapError::Export(format!("PNG encoding failed: {e}")))?;
    Ok(png)
}

/// Timestamp-named download file: `quotesnap-1764315900000.png`.
pub fn export_filename(epoch_millis: i64) -> String {
    format!("quotesnap-{epoch_millis}.png")
}

/// Pre-fetch a spec's remote background image into the rasterizer cache.
///
/// No-op for local paths, non-image backgrounds, and already-cached URLs.
/// Downloads go through the shared `reqwest` client so capture itself can
/// stay synchronous.
pub async fn resolve_background(
    spec: &RenderSpec,
    rasterizer: &mut CardRasterizer,
    client: &reqwest::Client,
) -> Result<(), QuoteSnapError> {
    let BackgroundSpec::Image { source, .. } = &spec.background else {
        return Ok(());
    };
    if !(source.starts_with("http://") || source.starts_with("https://"))
        || rasterizer.is_loaded(source)
    {
        return Ok(());
    }

    let response = client
        .get(source)
        .send()
        .await
        .map_err(|e| QuoteSnapError::Export(format!("Failed to download {source}: {e}")))?;
    if !response.status().is_success() {
        return Err(QuoteSnapError::Export(format!(
            "Failed to download {}: HTTP {}",
            source,
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| QuoteSnapError::Export(format!("Failed to read image data: {e}")))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| QuoteSnapError::Export(format!("Failed to decode {source}: {e}")))?;

    rasterizer.preload(source, image);
    Ok(())
}

/// Decode uploaded image bytes and register them under a synthetic source
/// key, returning the key for use in a card config.
pub fn register_upload(
    rasterizer: &mut CardRasterizer,
    name: &str,
    bytes: &[u8],
) -> Result<String, QuoteSnapError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| QuoteSnapError::Export(format!("Failed to decode upload {name}: {e}")))?;
    let source = format!("upload:{name}");
    rasterizer.preload(&source, image);
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardConfig;
    use image::DynamicImage;
    use crate::card::layout::realize_on;
    use crate::i18n::{Catalog, Locale};
    use chrono::NaiveDate;

    #[test]
    fn test_export_filename_format() {
        assert_eq!(export_filename(1764315900000), "quotesnap-1764315900000.png");
        assert_eq!(export_filename(0), "quotesnap-0.png");
    }

    #[test]
    fn test_capture_produces_png_bytes() {
        let coordinator = ExportCoordinator::with_default_rasterizer();
        let spec = realize_on(
            &CardConfig::default(),
            &Catalog::new(Locale::En),
            NaiveDate::from_ymd_opt(2025, 11, 28).unwrap(),
        )
        .unwrap();

        let artifact = coordinator
            .capture(&spec, &CaptureOptions { quality: 1.0, pixel_ratio: 1 })
            .unwrap();
        // PNG signature.
        assert_eq!(&artifact.png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
        assert!(artifact.filename.starts_with("quotesnap-"));
        assert!(artifact.filename.ends_with(".png"));
    }

    #[test]
    fn test_register_upload_round_trip() {
        let mut rasterizer = CardRasterizer::new();
        let mut png = Vec::new();
        DynamicImage::new_rgba8(4, 4)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let source = register_upload(&mut rasterizer, "photo.png", &png).unwrap();
        assert_eq!(source, "upload:photo.png");
        assert!(rasterizer.is_loaded(&source));
    }

    #[test]
    fn test_register_upload_rejects_garbage() {
        let mut rasterizer = CardRasterizer::new();
        assert!(register_upload(&mut rasterizer, "x", b"not an image").is_err());
    }
}
