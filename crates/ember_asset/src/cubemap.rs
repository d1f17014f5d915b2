use crate::{error::AssetError, face::CubeFace, mipchain::MipChain, pixmap::{PixelFormat, Pixmap}};

/// Six mip chains flattened into the serialized cubemap layout:
/// face-major, mip-minor. Entry `i` holds face `i / mip_levels` at mip
/// `i % mip_levels`.
#[derive(Clone, Debug)]
pub struct CubemapAsset {
    mip_levels: usize,
    entries: Vec<Pixmap>,
}

impl CubemapAsset {
    pub fn from_face_chains(chains: Vec<MipChain>) -> Result<Self, AssetError> {
        if chains.len() != CubeFace::COUNT {
            return Err(AssetError::FaceCountMismatch {
                count: chains.len(),
                expected: CubeFace::COUNT,
            });
        }
        let mip_levels = chains[0].len();
        for (face, chain) in CubeFace::ALL.iter().zip(&chains) {
            if chain.len() != mip_levels || chain.is_empty() {
                return Err(AssetError::ChainLengthMismatch {
                    face: face.file_stem(),
                    len: chain.len(),
                    expected: mip_levels.max(1),
                });
            }
        }
        let mut entries = Vec::with_capacity(CubeFace::COUNT * mip_levels);
        for chain in chains {
            entries.extend(chain.into_levels());
        }
        Ok(Self {
            mip_levels,
            entries,
        })
    }

    pub(crate) fn from_entries(entries: Vec<Pixmap>, mip_levels: usize) -> Self {
        debug_assert_eq!(entries.len(), CubeFace::COUNT * mip_levels);
        Self {
            mip_levels,
            entries,
        }
    }

    pub fn mip_levels(&self) -> usize {
        self.mip_levels
    }

    pub fn entries(&self) -> &[Pixmap] {
        &self.entries
    }

    /// Position of `(face, mip)` in the serialized sequence.
    pub fn index_of(&self, face: CubeFace, mip_level: usize) -> usize {
        face.index() * self.mip_levels + mip_level
    }

    pub fn entry(&self, face: CubeFace, mip_level: usize) -> &Pixmap {
        &self.entries[self.index_of(face, mip_level)]
    }

    /// Full resolution of each face, taken from the first entry.
    pub fn face_size(&self) -> u32 {
        self.entries[0].width()
    }

    pub fn format(&self) -> PixelFormat {
        self.entries[0].format()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixmap::PixelFormat;
    use half::f16;

    fn level(size: u32, value: f32) -> Pixmap {
        let mut pixels = Vec::new();
        for _ in 0..size * size {
            for component in [value, value, value, 1.0] {
                pixels.extend_from_slice(&f16::from_f32(component).to_le_bytes());
            }
        }
        Pixmap::new(size, size, PixelFormat::Rgba16Float, pixels).unwrap()
    }

    fn chains(mips: usize) -> Vec<MipChain> {
        CubeFace::ALL
            .iter()
            .map(|face| {
                let mut chain = MipChain::new();
                for mip in 0..mips {
                    // Tag each level with a value unique to (face, mip).
                    chain.push(level(8 >> mip, (face.index() * mips + mip) as f32));
                }
                chain
            })
            .collect()
    }

    #[test]
    fn entries_are_face_major_mip_minor() {
        let mips = 3;
        let asset = CubemapAsset::from_face_chains(chains(mips)).unwrap();
        assert_eq!(asset.entries().len(), 18);
        for (index, entry) in asset.entries().iter().enumerate() {
            let expected = index as f32; // tag encodes face * mips + mip
            let components = entry.texels_f32().unwrap();
            assert_eq!(components[0], expected);
        }
        for face in CubeFace::ALL {
            for mip in 0..mips {
                assert_eq!(asset.index_of(face, mip), face.index() * mips + mip);
                assert_eq!(asset.entry(face, mip).width(), 8 >> mip);
            }
        }
    }

    #[test]
    fn rejects_uneven_chains() {
        let mut uneven = chains(2);
        uneven[3].push(level(2, 0.0));
        assert!(matches!(
            CubemapAsset::from_face_chains(uneven),
            Err(AssetError::ChainLengthMismatch { .. })
        ));
    }

    #[test]
    fn rejects_wrong_face_count() {
        let five = chains(1).into_iter().take(5).collect();
        assert!(matches!(
            CubemapAsset::from_face_chains(five),
            Err(AssetError::FaceCountMismatch { .. })
        ));
    }
}
