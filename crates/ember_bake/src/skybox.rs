use crate::error::BakeError;
use ember_asset::{
    build_mip_chain, save_cubemap, BlockCompressor, CubeFace, CubemapAsset, PixelFormat, Pixmap,
};
use log::{debug, info};
use std::path::Path;

/// Loads the six cube faces (`px.hdr` .. `nz.hdr`) from `source_dir` and
/// normalizes each to the working float format.
///
/// All faces are loaded and validated before the caller writes anything, so
/// a missing or corrupt face can never leave a partial asset behind.
pub fn load_cube_faces(source_dir: &Path) -> Result<Vec<Pixmap>, BakeError> {
    let mut faces = Vec::with_capacity(CubeFace::COUNT);
    let mut expected = None;
    for face in CubeFace::ALL {
        let path = source_dir.join(format!("{}.hdr", face.file_stem()));
        debug!("Loading cube face {}", path.display());
        let mut pixmap = Pixmap::from_hdr(&path)?;
        if !pixmap.is_square() {
            return Err(ember_asset::AssetError::NotSquare {
                width: pixmap.width(),
                height: pixmap.height(),
            }
            .into());
        }
        let size = *expected.get_or_insert(pixmap.width());
        if pixmap.width() != size {
            return Err(ember_asset::AssetError::FaceSizeMismatch {
                face: face.file_stem(),
                size: pixmap.width(),
                expected: size,
            }
            .into());
        }
        if pixmap.format() != PixelFormat::Rgba16Float {
            // Required before BC6H compression can run on any level.
            pixmap = pixmap.convert(PixelFormat::Rgba16Float)?;
        }
        faces.push(pixmap);
    }
    Ok(faces)
}

/// Assembles the base environment cubemap: one mip chain per source face,
/// concatenated face-major and persisted to `output`.
pub fn bake_skybox(
    source_dir: &Path,
    output: &Path,
    compressor: Option<&dyn BlockCompressor>,
) -> Result<CubemapAsset, BakeError> {
    let faces = load_cube_faces(source_dir)?;
    let mut chains = Vec::with_capacity(CubeFace::COUNT);
    for face in faces {
        chains.push(build_mip_chain(face, compressor)?);
    }
    let asset = CubemapAsset::from_face_chains(chains)?;
    save_cubemap(output, &asset)?;
    info!(
        "Baked skybox: {}px, {} mip levels per face",
        asset.face_size(),
        asset.mip_levels()
    );
    Ok(asset)
}
