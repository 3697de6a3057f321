//! CPU-side texture decoding. GPU upload happens elsewhere.

use std::path::Path;

use crate::error::{AssetError, AssetResult};

/// Decoded pixels ready for upload, rows stored top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureFormat {
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::Rgba8 => 4,
        }
    }
}

/// Byte length of a `width` x `height` image, computed without `u32` overflow.
pub fn byte_len(width: u32, height: u32, format: TextureFormat) -> usize {
    width as usize * height as usize * format.bytes_per_pixel() as usize
}

impl TextureData {
    /// Wrap RGBA8 pixels. Returns `None` when `data` does not hold exactly
    /// `width * height` pixels.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == byte_len(width, height, TextureFormat::Rgba8)).then_some(Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        })
    }

    /// Load and decode an image file (PNG or JPEG).
    pub fn load(path: impl AsRef<Path>) -> AssetResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| AssetError::io(path, e))?;
        let texture = decode(&bytes, path.display().to_string())?;
        log::info!(
            "Loaded texture {:?}: {}x{} ({} bytes)",
            path,
            texture.width,
            texture.height,
            texture.data.len()
        );
        Ok(texture)
    }

    /// Decode an in-memory image; the format is guessed from its header.
    pub fn from_memory(bytes: &[u8]) -> AssetResult<Self> {
        decode(bytes, "<memory>".into())
    }

    /// Rows reversed so the first row is the bottom of the image, matching
    /// GL-style texture coordinates with `v = 0` at the bottom.
    pub fn flipped_vertically(self) -> Self {
        let row = byte_len(self.width, 1, self.format);
        if row == 0 {
            return self;
        }
        let data = self.data.chunks_exact(row).rev().flatten().copied().collect();
        Self { data, ..self }
    }

    /// White/gray checkerboard with 8-pixel cells, used when no texture is given.
    pub fn checkerboard(size: u32) -> Self {
        let mut data = Vec::with_capacity(byte_len(size, size, TextureFormat::Rgba8));
        for y in 0..size {
            for x in 0..size {
                if ((x / 8) + (y / 8)) % 2 == 0 {
                    data.extend_from_slice(&[255, 255, 255, 255]);
                } else {
                    data.extend_from_slice(&[128, 128, 128, 255]);
                }
            }
        }
        Self {
            data,
            width: size,
            height: size,
            format: TextureFormat::Rgba8,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.data.len() == byte_len(self.width, self.height, self.format) && self.width > 0 && self.height > 0
    }
}

fn decode(bytes: &[u8], origin: String) -> AssetResult<TextureData> {
    let img = image::load_from_memory(bytes).map_err(|source| AssetError::Texture { origin, source })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TextureData {
        data: rgba.into_raw(),
        width,
        height,
        format: TextureFormat::Rgba8,
    })
}
