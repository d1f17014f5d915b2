use crate::{
    bc6h::BlockCompressor,
    error::AssetError,
    pixmap::Pixmap,
};

/// The mip levels of a single cube face, full resolution first.
#[derive(Clone, Debug, Default)]
pub struct MipChain {
    levels: Vec<Pixmap>,
}

impl MipChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_levels(levels: Vec<Pixmap>) -> Self {
        Self { levels }
    }

    pub fn push(&mut self, level: Pixmap) {
        self.levels.push(level);
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[Pixmap] {
        &self.levels
    }

    pub fn into_levels(self) -> Vec<Pixmap> {
        self.levels
    }
}

/// Downsamples a face image into its mip chain.
///
/// Each pass derives the stored level from the uncompressed image, so block
/// compression never compounds across levels, and resampling always runs on
/// uncompressed data. The chain ends once the uncompressed resolution
/// reaches the stored level's block granularity: 4 with compression enabled,
/// 1 without.
pub fn build_mip_chain(
    base: Pixmap,
    compressor: Option<&dyn BlockCompressor>,
) -> Result<MipChain, AssetError> {
    if !base.is_square() {
        return Err(AssetError::NotSquare {
            width: base.width(),
            height: base.height(),
        });
    }
    let floor = compressor.map_or(1, |codec| codec.block_size());
    if !base.width().is_power_of_two() || base.width() < floor {
        return Err(AssetError::BadResolution {
            size: base.width(),
            min: floor,
        });
    }

    let mut chain = MipChain::new();
    let mut current = base;
    loop {
        let size = current.width();
        let level = match compressor {
            Some(codec) => codec.compress(&current)?,
            None => current.clone(),
        };
        let block = level.format().block_size();
        chain.push(level);
        if size == block {
            break;
        }
        current = current.resize(size / 2, size / 2)?;
    }
    Ok(chain)
}
