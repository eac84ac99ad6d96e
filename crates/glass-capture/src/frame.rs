//! Pixel buffer produced by a document capture.

use image::RgbaImage;

use crate::error::{CaptureError, Result};

/// Pixel format of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// RGBA 8-bit per channel.
    #[default]
    Rgba8,
    /// BGRA 8-bit per channel (little-endian: B, G, R, A), as some backends emit.
    Bgra8,
}

/// A rasterized snapshot of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    /// Raw pixel data.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Bytes per row (may include padding).
    pub stride: u32,
    pub format: PixelFormat,
}

impl PixelBuffer {
    /// Create a transparent RGBA buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width * 4;
        Self {
            data: vec![0u8; stride as usize * height as usize],
            width,
            height,
            stride,
            format: PixelFormat::Rgba8,
        }
    }

    /// Create a buffer with existing data, checking that it is large enough.
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32, stride: u32, format: PixelFormat) -> Result<Self> {
        let needed = stride as usize * height as usize;
        if (stride as usize) < width as usize * 4 || data.len() < needed {
            return Err(CaptureError::InvalidState(format!(
                "{} bytes cannot hold {}x{} pixels with stride {}",
                data.len(),
                width,
                height,
                stride
            )));
        }
        Ok(Self { data, width, height, stride, format })
    }

    /// Decode an encoded image (PNG, JPEG, WebP) as returned by browser backends.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(|e| CaptureError::Decode(e.to_string()))?;
        Ok(Self::from(img.to_rgba8()))
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() || self.width == 0 || self.height == 0
    }

    /// Convert BGRA to RGBA in place.
    pub fn convert_bgra_to_rgba(&mut self) {
        if self.format != PixelFormat::Bgra8 {
            return;
        }
        for row in 0..self.height {
            for col in 0..self.width {
                let offset = self.offset(col, row);
                self.data.swap(offset, offset + 2);
            }
        }
        self.format = PixelFormat::Rgba8;
    }

    /// Tightly packed RGBA rows, ready for a texture upload.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let row_len = self.width as usize * 4;
        let mut packed = Vec::with_capacity(row_len * self.height as usize);
        for row in 0..self.height {
            let start = self.offset(0, row);
            packed.extend_from_slice(&self.data[start..start + row_len]);
        }
        if self.format == PixelFormat::Bgra8 {
            for px in packed.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }
        // length is exactly width * height * 4
        RgbaImage::from_raw(self.width, self.height, packed).unwrap_or_default()
    }

    /// Gaussian-blurred copy. `sigma <= 0` returns an unmodified copy.
    pub fn blurred(&self, sigma: f32) -> Self {
        let img = self.to_rgba_image();
        if sigma <= 0.0 || self.is_empty() {
            return Self::from(img);
        }
        Self::from(image::imageops::blur(&img, sigma))
    }

    // Byte offset of a pixel, computed in usize so tall captures cannot overflow.
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride as usize + x as usize * 4
    }

    /// RGBA value of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = self.offset(x, y);
        let px = &self.data[o..o + 4];
        Some(match self.format {
            PixelFormat::Rgba8 => [px[0], px[1], px[2], px[3]],
            PixelFormat::Bgra8 => [px[2], px[1], px[0], px[3]],
        })
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
            stride: width * 4,
            format: PixelFormat::Rgba8,
        }
    }
}
