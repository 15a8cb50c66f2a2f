//! Procedural sphere textures
//!
//! Each sphere wears a texture painted from its hue and label: a vertical
//! gradient, a faint grid, a few soft orbs and bright streaks, and the label
//! lettered in the middle of the map. Decoration is randomized from the
//! caller's RNG so a fixed seed paints identical textures.

use std::collections::HashMap;

use fontdue::{Font, FontSettings};
use image::{Rgba, RgbaImage};
use rand::Rng;

use super::{RenderBackend, RenderResult, TextureHandle};
use crate::assets::{AssetError, FontData};
use crate::foundation::math::{utils, Rgb};

/// RGBA8 texture ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pixels: RgbaImage,
}

impl TextureImage {
    /// Wrap an existing image
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Underlying pixels
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TextureKey {
    label: String,
    hue_bits: u32,
}

/// Paints and caches sphere textures
pub struct SphereTexturePainter {
    size: u32,
    font: Option<Font>,
    cache: HashMap<TextureKey, TextureHandle>,
}

impl SphereTexturePainter {
    /// Create a painter producing `size` x `size` textures without label lettering
    pub fn new(size: u32) -> Self {
        Self {
            size,
            font: None,
            cache: HashMap::new(),
        }
    }

    /// Letter labels with the given font
    pub fn with_font(mut self, font: &FontData) -> Result<Self, AssetError> {
        let parsed = Font::from_bytes(font.bytes(), FontSettings::default())
            .map_err(|e| AssetError::Parse(format!("{}: {e}", font.name())))?;
        self.font = Some(parsed);
        Ok(self)
    }

    /// Whether labels will be lettered
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Number of distinct textures uploaded so far
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Texture for `(label, hue)`, painting and uploading it on first request
    pub fn texture_for<B, R>(&mut self, backend: &mut B, label: &str, hue: f32, rng: &mut R) -> RenderResult<TextureHandle>
    where
        B: RenderBackend + ?Sized,
        R: Rng + ?Sized,
    {
        let key = TextureKey {
            label: label.to_string(),
            hue_bits: hue.to_bits(),
        };
        if let Some(handle) = self.cache.get(&key) {
            return Ok(*handle);
        }

        let image = self.paint(label, hue, rng);
        let handle = backend.create_texture(&image)?;
        log::debug!("Painted {}x{} texture for sphere '{}'", image.width(), image.height(), label);
        self.cache.insert(key, handle);
        Ok(handle)
    }

    /// Paint a texture without uploading it
    pub fn paint<R: Rng + ?Sized>(&self, label: &str, hue: f32, rng: &mut R) -> TextureImage {
        let size = self.size;
        let mut pixels = RgbaImage::new(size, size);

        let top = utils::hsl_to_rgb(hue, 0.7, 0.55);
        let bottom = utils::hsl_to_rgb(hue + 0.08, 0.8, 0.22);
        for (_, y, pixel) in pixels.enumerate_pixels_mut() {
            let t = y as f32 / (size - 1).max(1) as f32;
            let color = top.lerp(&bottom, t);
            *pixel = to_rgba(color, 1.0);
        }

        paint_grid(&mut pixels, hue);
        paint_orbs(&mut pixels, hue, rng);
        paint_streaks(&mut pixels, rng);

        if let Some(font) = &self.font {
            letter_label(&mut pixels, font, label);
        }

        TextureImage::new(pixels)
    }
}

fn to_rgba(color: Rgb, alpha: f32) -> Rgba<u8> {
    let byte = |c: f32| (utils::clamp(c, 0.0, 1.0) * 255.0).round() as u8;
    Rgba([byte(color.x), byte(color.y), byte(color.z), byte(alpha)])
}

fn blend(pixels: &mut RgbaImage, x: u32, y: u32, color: Rgb, alpha: f32) {
    if x >= pixels.width() || y >= pixels.height() || alpha <= 0.0 {
        return;
    }
    let alpha = alpha.min(1.0);
    let pixel = pixels.get_pixel_mut(x, y);
    for (channel, source) in pixel.0.iter_mut().take(3).zip([color.x, color.y, color.z]) {
        let current = f32::from(*channel) / 255.0;
        let mixed = utils::lerp(current, source, alpha);
        *channel = (utils::clamp(mixed, 0.0, 1.0) * 255.0).round() as u8;
    }
}

fn paint_grid(pixels: &mut RgbaImage, hue: f32) {
    let size = pixels.width();
    let step = (size / 8).max(2);
    let line = utils::hsl_to_rgb(hue + 0.5, 0.3, 0.8);
    for y in 0..size {
        for x in 0..size {
            if x % step == 0 || y % step == 0 {
                blend(pixels, x, y, line, 0.08);
            }
        }
    }
}

fn paint_orbs<R: Rng + ?Sized>(pixels: &mut RgbaImage, hue: f32, rng: &mut R) {
    let size = pixels.width() as f32;
    let count = rng.gen_range(3..=6);
    for _ in 0..count {
        let cx = rng.gen_range(0.0..size);
        let cy = rng.gen_range(0.0..size);
        let radius = rng.gen_range(size * 0.05..size * 0.18);
        let color = utils::hsl_to_rgb(hue + rng.gen_range(-0.1_f32..0.1), 0.9, 0.75);
        let strength = rng.gen_range(0.25_f32..0.55);

        let min_x = (cx - radius).max(0.0) as u32;
        let max_x = (cx + radius).min(size - 1.0) as u32;
        let min_y = (cy - radius).max(0.0) as u32;
        let max_y = (cy + radius).min(size - 1.0) as u32;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let falloff = 1.0 - (dx * dx + dy * dy).sqrt() / radius;
                if falloff > 0.0 {
                    blend(pixels, x, y, color, falloff * falloff * strength);
                }
            }
        }
    }
}

fn paint_streaks<R: Rng + ?Sized>(pixels: &mut RgbaImage, rng: &mut R) {
    let size = pixels.width() as f32;
    let count = rng.gen_range(6..=12);
    let white = Rgb::new(1.0, 1.0, 1.0);
    for _ in 0..count {
        let x0 = rng.gen_range(0.0..size);
        let y0 = rng.gen_range(0.0..size);
        let angle = rng.gen_range(-0.6_f32..0.6);
        let length = rng.gen_range(size * 0.2..size * 0.6);
        let alpha = rng.gen_range(0.15_f32..0.35);

        let steps = length.ceil() as u32;
        let (dy, dx) = angle.sin_cos();
        for i in 0..steps {
            let t = i as f32;
            let x = x0 + dx * t;
            let y = y0 + dy * t;
            if x < 0.0 || y < 0.0 {
                break;
            }
            // Taper toward both ends.
            let taper = 1.0 - ((t / length) * 2.0 - 1.0).abs();
            blend(pixels, x as u32, y as u32, white, alpha * taper);
        }
    }
}

fn letter_label(pixels: &mut RgbaImage, font: &Font, label: &str) {
    let size = pixels.width() as f32;
    let px = size / 6.0;

    let glyphs: Vec<_> = label.chars().map(|ch| font.rasterize(ch, px)).collect();
    let total_advance: f32 = glyphs.iter().map(|(metrics, _)| metrics.advance_width).sum();
    let ascent = font
        .horizontal_line_metrics(px)
        .map_or(px * 0.8, |line| line.ascent);

    let baseline = size * 0.5 + ascent * 0.5;
    let mut pen_x = size * 0.5 - total_advance * 0.5;
    let ink = Rgb::new(1.0, 1.0, 1.0);

    for (metrics, coverage) in &glyphs {
        let left = pen_x + metrics.xmin as f32;
        let top = baseline - (metrics.ymin as f32 + metrics.height as f32);
        for row in 0..metrics.height {
            for col in 0..metrics.width {
                let alpha = f32::from(coverage[row * metrics.width + col]) / 255.0;
                let x = left + col as f32;
                let y = top + row as f32;
                if x >= 0.0 && y >= 0.0 {
                    blend(pixels, x as u32, y as u32, ink, alpha);
                }
            }
        }
        pen_x += metrics.advance_width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingBackend;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_painting_is_deterministic_per_seed() {
        let painter = SphereTexturePainter::new(32);
        let a = painter.paint("Orbit", 0.6, &mut StdRng::seed_from_u64(3));
        let b = painter.paint("Orbit", 0.6, &mut StdRng::seed_from_u64(3));
        let c = painter.paint("Orbit", 0.6, &mut StdRng::seed_from_u64(4));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.width(), 32);
        assert_eq!(a.as_bytes().len(), 32 * 32 * 4);
    }

    #[test]
    fn test_gradient_follows_hue() {
        let painter = SphereTexturePainter::new(64);
        let image = painter.paint("", 0.0, &mut StdRng::seed_from_u64(1));
        // Red hue: the red channel dominates the average colour.
        let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
        for pixel in image.pixels().pixels() {
            r += u64::from(pixel[0]);
            g += u64::from(pixel[1]);
            b += u64::from(pixel[2]);
        }
        assert!(r > g && r > b);
        assert!(image.pixels().pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_texture_cache_uploads_once() {
        let mut backend = RecordingBackend::new();
        let mut painter = SphereTexturePainter::new(16);
        let mut rng = StdRng::seed_from_u64(5);
        let first = painter.texture_for(&mut backend, "Nova", 0.2, &mut rng).unwrap();
        let again = painter.texture_for(&mut backend, "Nova", 0.2, &mut rng).unwrap();
        let other = painter.texture_for(&mut backend, "Nova", 0.3, &mut rng).unwrap();
        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(backend.texture_count(), 2);
        assert_eq!(painter.cached_count(), 2);
    }

    #[test]
    fn test_invalid_font_bytes_rejected() {
        let font = FontData::new("broken", vec![0, 1, 2, 3]);
        assert!(matches!(
            SphereTexturePainter::new(16).with_font(&font),
            Err(AssetError::Parse(_))
        ));
    }
}
