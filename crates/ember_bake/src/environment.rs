use crate::{
    error::BakeError,
    irradiance::bake_irradiance_map,
    prefilter::bake_prefilter_map,
    settings::BakeSettings,
    skybox::bake_skybox,
};
use ember_asset::{save_cubemap, Bc6hCompressor, BlockCompressor};
use ember_render::EnvironmentFilter;
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const SKYBOX_ASSET: &str = "skybox.dds";
pub const SPECULAR_ASSET: &str = "specular.dds";
pub const DIFFUSE_ASSET: &str = "diffuse.dds";

pub struct BakedEnvironmentPaths {
    pub skybox: PathBuf,
    pub specular: PathBuf,
    pub diffuse: PathBuf,
}

/// Runs the whole pipeline: base skybox, renderer warm-up, then the
/// specular and diffuse filter passes. Aborts on the first failure; an
/// asset file is only ever written after every capture feeding it succeeded.
pub fn bake_environment<F: EnvironmentFilter>(
    filter: &mut F,
    source_dir: &Path,
    output_dir: &Path,
    settings: &BakeSettings,
) -> Result<BakedEnvironmentPaths, BakeError> {
    let codec = Bc6hCompressor;
    let compressor: Option<&dyn BlockCompressor> =
        settings.compression.then_some(&codec as &dyn BlockCompressor);
    fs::create_dir_all(output_dir)?;

    info!("Baking base skybox cubemap");
    let skybox = output_dir.join(SKYBOX_ASSET);
    bake_skybox(source_dir, &skybox, compressor)?;

    info!("Warming up the filter renderer ({} frames)", settings.warmup_frames);
    filter.warm_up(settings.warmup_frames)?;
    let environment = filter.load_environment(&skybox)?;

    let specular = output_dir.join(SPECULAR_ASSET);
    let specular_asset = bake_prefilter_map(filter, &environment, settings, compressor)?;
    save_cubemap(&specular, &specular_asset)?;

    let diffuse = output_dir.join(DIFFUSE_ASSET);
    let diffuse_asset = bake_irradiance_map(filter, &environment, settings, compressor)?;
    save_cubemap(&diffuse, &diffuse_asset)?;

    info!("Baked environment maps into {}", output_dir.display());
    Ok(BakedEnvironmentPaths {
        skybox,
        specular,
        diffuse,
    })
}
