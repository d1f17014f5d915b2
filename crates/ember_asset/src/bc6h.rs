use crate::{
    error::AssetError,
    pixmap::{PixelFormat, Pixmap},
};
use half::f16;

/// Block-compression codec seam. The baking pipeline only needs `compress`;
/// a production encoder can be swapped in without touching the driver.
pub trait BlockCompressor {
    /// Side length of the blocks the codec emits.
    fn block_size(&self) -> u32;

    fn compress(&self, source: &Pixmap) -> Result<Pixmap, AssetError>;
}

/// Reference BC6H encoder for unsigned-float HDR data.
///
/// Emits single-region blocks (mode bits 00011, 10-bit endpoints, 4-bit
/// indices) only. Quality is below a production encoder since every block
/// uses the component-wise bounding box as its endpoints, but the output is
/// valid BC6H_UF16 and decodes on any compliant sampler.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bc6hCompressor;

const MODE_BITS: u32 = 0b00011;
const WEIGHTS: [u32; 16] = [0, 4, 9, 13, 17, 21, 26, 30, 34, 38, 43, 47, 51, 55, 60, 64];
const HALF_MAX: u16 = 0x7BFF;

impl BlockCompressor for Bc6hCompressor {
    fn block_size(&self) -> u32 {
        PixelFormat::Bc6hUfloat.block_size()
    }

    fn compress(&self, source: &Pixmap) -> Result<Pixmap, AssetError> {
        if source.format() != PixelFormat::Rgba16Float {
            return Err(AssetError::Compress {
                format: source.format(),
                required: PixelFormat::Rgba16Float,
            });
        }
        let width = source.width();
        let height = source.height();
        let blocks_x = (width + 3) / 4;
        let blocks_y = (height + 3) / 4;
        let mut blocks = Vec::with_capacity((blocks_x * blocks_y) as usize * 16);
        for block_y in 0..blocks_y {
            for block_x in 0..blocks_x {
                let texels = fetch_block(source, block_x, block_y);
                blocks.extend_from_slice(&encode_block(&texels));
            }
        }
        Pixmap::new(width, height, PixelFormat::Bc6hUfloat, blocks)
    }
}

/// Decodes blocks produced by [`Bc6hCompressor`]. Other block modes are
/// rejected; this is a reference decoder, not a general BC6H sampler.
pub fn decompress_bc6h(source: &Pixmap) -> Result<Pixmap, AssetError> {
    if source.format() != PixelFormat::Bc6hUfloat {
        return Err(AssetError::Convert {
            from: source.format(),
            to: PixelFormat::Rgba16Float,
        });
    }
    let width = source.width();
    let height = source.height();
    let blocks_x = (width + 3) / 4;
    let mut pixels = vec![0u8; PixelFormat::Rgba16Float.buffer_len(width, height)];
    for (block_index, block) in source.pixels().chunks_exact(16).enumerate() {
        let texels = decode_block(block)?;
        let block_x = block_index as u32 % blocks_x;
        let block_y = block_index as u32 / blocks_x;
        for texel_y in 0..4 {
            for texel_x in 0..4 {
                let x = block_x * 4 + texel_x;
                let y = block_y * 4 + texel_y;
                if x >= width || y >= height {
                    continue;
                }
                let texel = texels[(texel_y * 4 + texel_x) as usize];
                let offset = ((y * width + x) * 8) as usize;
                pixels[offset..offset + 2].copy_from_slice(&texel[0].to_le_bytes());
                pixels[offset + 2..offset + 4].copy_from_slice(&texel[1].to_le_bytes());
                pixels[offset + 4..offset + 6].copy_from_slice(&texel[2].to_le_bytes());
                pixels[offset + 6..offset + 8].copy_from_slice(&f16::ONE.to_bits().to_le_bytes());
            }
        }
    }
    Pixmap::new(width, height, PixelFormat::Rgba16Float, pixels)
}

/// Reads a 4x4 block of RGB half bits, clamping coordinates to the image
/// edge and values to the unsigned half range.
fn fetch_block(source: &Pixmap, block_x: u32, block_y: u32) -> [[u16; 3]; 16] {
    let width = source.width();
    let height = source.height();
    let pixels = source.pixels();
    let mut texels = [[0u16; 3]; 16];
    for texel_y in 0..4 {
        for texel_x in 0..4 {
            let x = (block_x * 4 + texel_x).min(width - 1);
            let y = (block_y * 4 + texel_y).min(height - 1);
            let offset = ((y * width + x) * 8) as usize;
            let texel = &mut texels[(texel_y * 4 + texel_x) as usize];
            for channel in 0..3 {
                let at = offset + channel * 2;
                let bits = u16::from_le_bytes([pixels[at], pixels[at + 1]]);
                texel[channel] = clamp_unsigned(bits);
            }
        }
    }
    texels
}

fn clamp_unsigned(bits: u16) -> u16 {
    if bits & 0x8000 != 0 {
        // Negative values are not representable in the unsigned variant.
        0
    } else {
        bits.min(HALF_MAX)
    }
}

fn encode_block(texels: &[[u16; 3]; 16]) -> [u8; 16] {
    let mut low = [HALF_MAX; 3];
    let mut high = [0u16; 3];
    for texel in texels {
        for channel in 0..3 {
            low[channel] = low[channel].min(texel[channel]);
            high[channel] = high[channel].max(texel[channel]);
        }
    }
    let mut endpoint0 = low.map(|bits| quantize(bits));
    let mut endpoint1 = high.map(|bits| quantize(bits));

    let palette = build_palette(&endpoint0, &endpoint1);
    let mut indices = [0u8; 16];
    for (slot, texel) in texels.iter().enumerate() {
        let target = [
            f16::from_bits(texel[0]).to_f32(),
            f16::from_bits(texel[1]).to_f32(),
            f16::from_bits(texel[2]).to_f32(),
        ];
        let mut best = 0usize;
        let mut best_error = f32::INFINITY;
        for (index, entry) in palette.iter().enumerate() {
            let error = (0..3)
                .map(|channel| {
                    let delta = entry[channel] - target[channel];
                    delta * delta
                })
                .sum();
            if error < best_error {
                best_error = error;
                best = index;
            }
        }
        indices[slot] = best as u8;
    }

    // The anchor texel's high index bit is implied zero; flip the block if
    // the first texel landed in the upper half of the palette.
    if indices[0] >= 8 {
        std::mem::swap(&mut endpoint0, &mut endpoint1);
        for index in indices.iter_mut() {
            *index = 15 - *index;
        }
    }

    let mut writer = BitWriter::default();
    writer.push(MODE_BITS, 5);
    for channel in 0..3 {
        writer.push(endpoint0[channel], 10);
    }
    for channel in 0..3 {
        writer.push(endpoint1[channel], 10);
    }
    writer.push(indices[0] as u32, 3);
    for index in &indices[1..] {
        writer.push(*index as u32, 4);
    }
    writer.bytes
}

fn decode_block(block: &[u8]) -> Result<[[u16; 3]; 16], AssetError> {
    let mut reader = BitReader::new(block);
    let prefix = reader.read(2);
    if prefix < 2 {
        return Err(AssetError::UnsupportedBlockMode { mode: prefix as u8 });
    }
    let mode = prefix | reader.read(3) << 2;
    if mode != MODE_BITS {
        return Err(AssetError::UnsupportedBlockMode { mode: mode as u8 });
    }
    let mut endpoint0 = [0u32; 3];
    let mut endpoint1 = [0u32; 3];
    for channel in 0..3 {
        endpoint0[channel] = reader.read(10);
    }
    for channel in 0..3 {
        endpoint1[channel] = reader.read(10);
    }
    let mut texels = [[0u16; 3]; 16];
    for slot in 0..16 {
        // The anchor texel's high index bit is implied zero.
        let bits = if slot == 0 { 3 } else { 4 };
        let index = reader.read(bits) as usize;
        let weight = WEIGHTS[index];
        for channel in 0..3 {
            let interpolated = interpolate(
                unquantize(endpoint0[channel]),
                unquantize(endpoint1[channel]),
                weight,
            );
            texels[slot][channel] = finish_unquantize(interpolated);
        }
    }
    Ok(texels)
}

fn build_palette(endpoint0: &[u32; 3], endpoint1: &[u32; 3]) -> [[f32; 3]; 16] {
    let mut palette = [[0f32; 3]; 16];
    for (entry, weight) in palette.iter_mut().zip(WEIGHTS) {
        for channel in 0..3 {
            let interpolated = interpolate(
                unquantize(endpoint0[channel]),
                unquantize(endpoint1[channel]),
                weight,
            );
            entry[channel] = f16::from_bits(finish_unquantize(interpolated)).to_f32();
        }
    }
    palette
}

fn quantize(bits: u16) -> u32 {
    ((bits as u32 * 1023 + HALF_MAX as u32 / 2) / HALF_MAX as u32).min(1023)
}

fn unquantize(quantized: u32) -> u32 {
    if quantized == 0 {
        0
    } else if quantized >= 1023 {
        0xFFFF
    } else {
        ((quantized << 15) + 0x4000) >> 9
    }
}

fn interpolate(a: u32, b: u32, weight: u32) -> u32 {
    (a * (64 - weight) + b * weight + 32) >> 6
}

fn finish_unquantize(value: u32) -> u16 {
    ((value * 31) >> 6) as u16
}

#[derive(Default)]
struct BitWriter {
    bytes: [u8; 16],
    cursor: usize,
}

impl BitWriter {
    fn push(&mut self, value: u32, bits: usize) {
        for bit in 0..bits {
            if value >> bit & 1 == 1 {
                self.bytes[self.cursor >> 3] |= 1 << (self.cursor & 7);
            }
            self.cursor += 1;
        }
    }
}

struct BitReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    fn read(&mut self, bits: usize) -> u32 {
        let mut value = 0u32;
        for bit in 0..bits {
            if self.bytes[self.cursor >> 3] >> (self.cursor & 7) & 1 == 1 {
                value |= 1 << bit;
            }
            self.cursor += 1;
        }
        value
    }
}
