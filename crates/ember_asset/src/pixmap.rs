use crate::error::AssetError;
use half::f16;
use image::{hdr::HdrDecoder, imageops, ImageBuffer, Rgba};
use std::{io::BufReader, path::Path};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PixelFormat {
    /// 32-bit float RGBA, what HDR decoders produce.
    Rgba32Float,
    /// 16-bit float RGBA, the working format for filtering and compression.
    Rgba16Float,
    /// BC6H unsigned-float HDR blocks, 16 bytes per 4x4 block.
    Bc6hUfloat,
}

impl PixelFormat {
    /// Side length of one compression block; 1 for uncompressed formats.
    pub fn block_size(self) -> u32 {
        match self {
            Self::Bc6hUfloat => 4,
            Self::Rgba32Float | Self::Rgba16Float => 1,
        }
    }

    pub fn is_compressed(self) -> bool {
        self.block_size() > 1
    }

    pub fn buffer_len(self, width: u32, height: u32) -> usize {
        match self {
            Self::Rgba32Float => width as usize * height as usize * 16,
            Self::Rgba16Float => width as usize * height as usize * 8,
            Self::Bc6hUfloat => {
                let blocks_x = ((width + 3) / 4) as usize;
                let blocks_y = ((height + 3) / 4) as usize;
                blocks_x * blocks_y * 16
            }
        }
    }
}

/// An owned CPU-side image. Transforms never mutate in place; each one
/// produces a new pixmap that supersedes its source.
#[derive(Clone, Debug)]
pub struct Pixmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl Pixmap {
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, AssetError> {
        let expected = format.buffer_len(width, height);
        if pixels.len() != expected {
            return Err(AssetError::BufferSize {
                width,
                height,
                format,
                len: pixels.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    pub fn from_hdr(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| AssetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder = HdrDecoder::new(BufReader::new(file)).map_err(|source| AssetError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let metadata = decoder.metadata();
        let decoded = decoder.read_image_hdr().map_err(|source| AssetError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let mut pixels = Vec::with_capacity(decoded.len() * 16);
        for texel in &decoded {
            for component in [texel[0], texel[1], texel[2], 1.0] {
                pixels.extend_from_slice(&component.to_le_bytes());
            }
        }
        Self::new(metadata.width, metadata.height, PixelFormat::Rgba32Float, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Widens every component to f32. Only meaningful for uncompressed
    /// formats; block-compressed data has to be decompressed first.
    pub fn texels_f32(&self) -> Result<Vec<f32>, AssetError> {
        match self.format {
            PixelFormat::Rgba32Float => Ok(self
                .pixels
                .chunks_exact(4)
                .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
                .collect()),
            PixelFormat::Rgba16Float => Ok(self
                .pixels
                .chunks_exact(2)
                .map(|bytes| f16::from_le_bytes([bytes[0], bytes[1]]).to_f32())
                .collect()),
            PixelFormat::Bc6hUfloat => Err(AssetError::Convert {
                from: self.format,
                to: PixelFormat::Rgba32Float,
            }),
        }
    }

    pub fn convert(&self, format: PixelFormat) -> Result<Self, AssetError> {
        if format == self.format {
            return Ok(self.clone());
        }
        match (self.format, format) {
            (PixelFormat::Rgba32Float, PixelFormat::Rgba16Float) => {
                let mut pixels = Vec::with_capacity(format.buffer_len(self.width, self.height));
                for bytes in self.pixels.chunks_exact(4) {
                    let value = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                    pixels.extend_from_slice(&f16::from_f32(value).to_le_bytes());
                }
                Self::new(self.width, self.height, format, pixels)
            }
            (PixelFormat::Rgba16Float, PixelFormat::Rgba32Float) => {
                let mut pixels = Vec::with_capacity(format.buffer_len(self.width, self.height));
                for bytes in self.pixels.chunks_exact(2) {
                    let value = f16::from_le_bytes([bytes[0], bytes[1]]).to_f32();
                    pixels.extend_from_slice(&value.to_le_bytes());
                }
                Self::new(self.width, self.height, format, pixels)
            }
            (from, to) => Err(AssetError::Convert { from, to }),
        }
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<Self, AssetError> {
        if self.format.is_compressed() {
            return Err(AssetError::ResizeCompressed {
                format: self.format,
            });
        }
        let components = self.texels_f32()?;
        let source = ImageBuffer::<Rgba<f32>, Vec<f32>>::from_raw(
            self.width,
            self.height,
            components,
        )
        .ok_or(AssetError::BufferSize {
            width: self.width,
            height: self.height,
            format: self.format,
            len: self.pixels.len(),
            expected: self.format.buffer_len(self.width, self.height),
        })?;
        let resized = imageops::resize(&source, width, height, imageops::FilterType::Triangle);
        let mut pixels = Vec::with_capacity(self.format.buffer_len(width, height));
        match self.format {
            PixelFormat::Rgba32Float => {
                for component in resized.into_raw() {
                    pixels.extend_from_slice(&component.to_le_bytes());
                }
            }
            PixelFormat::Rgba16Float => {
                for component in resized.into_raw() {
                    pixels.extend_from_slice(&f16::from_f32(component).to_le_bytes());
                }
            }
            PixelFormat::Bc6hUfloat => unreachable!("compressed formats are rejected above"),
        }
        Self::new(width, height, self.format, pixels)
    }
}
