//! Texture storage for baked overlays and loaded sprites

use bytemuck::{Pod, Zeroable};
use std::sync::Arc;

use super::color::Color;
use crate::error::{OverlayError, OverlayResult};

/// Premultiplied RGBA8 texel
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Quantize premultiplied float channels
    pub fn from_premul_f32(px: [f32; 4]) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(q(px[0]), q(px[1]), q(px[2]), q(px[3]))
    }

    pub fn to_premul_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Immutable texture with shared pixel storage; clones are cheap
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Arc<Vec<Rgba8>>,
}

impl Texture {
    pub fn new(width: u32, height: u32, pixels: Vec<Rgba8>) -> OverlayResult<Self> {
        if width == 0 || height == 0 {
            return Err(OverlayError::resource(format!(
                "texture must not be empty ({width}x{height})"
            )));
        }
        if pixels.len() != width as usize * height as usize {
            return Err(OverlayError::resource(format!(
                "texture {width}x{height} expects {} texels, got {}",
                width as usize * height as usize,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: Arc::new(pixels),
        })
    }

    /// Uniformly filled texture
    pub fn solid(width: u32, height: u32, texel: Rgba8) -> OverlayResult<Self> {
        Self::new(width, height, vec![texel; width as usize * height as usize])
    }

    /// Import straight-alpha RGBA (as decoded from PNG), premultiplying on the way in
    pub fn from_rgba_image(img: &image::RgbaImage) -> OverlayResult<Self> {
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                let mul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
                Rgba8::new(mul(r), mul(g), mul(b), a)
            })
            .collect();
        Self::new(width, height, pixels)
    }

    /// Export as straight-alpha RGBA for encoding
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let raw: Vec<u8> = self
            .pixels
            .iter()
            .flat_map(|px| {
                if px.a == 0 {
                    return [0, 0, 0, 0];
                }
                let un = |c: u8| ((c as u16 * 255 + px.a as u16 / 2) / px.a as u16).min(255) as u8;
                [un(px.r), un(px.g), un(px.b), px.a]
            })
            .collect();
        image::RgbaImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw premultiplied bytes, row-major, ready for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.pixels.as_slice())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Copy with every texel multiplied by `tint`; alpha is untouched
    pub fn tinted(&self, tint: Color) -> Texture {
        let mul = |c: u8, t: u8| ((c as u16 * t as u16 + 127) / 255) as u8;
        let pixels = self
            .pixels
            .iter()
            .map(|px| Rgba8::new(mul(px.r, tint.r), mul(px.g, tint.g), mul(px.b, tint.b), px.a))
            .collect();
        Texture {
            width: self.width,
            height: self.height,
            pixels: Arc::new(pixels),
        }
    }

    /// Number of texels with nonzero alpha
    pub fn covered_texels(&self) -> usize {
        self.pixels.iter().filter(|px| px.a > 0).count()
    }
}
