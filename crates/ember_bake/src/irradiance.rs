use crate::{
    driver::{bake_filtered_chains, FilterLevel},
    error::BakeError,
    settings::BakeSettings,
};
use ember_asset::{BlockCompressor, CubemapAsset};
use ember_render::{Distribution, EnvironmentFilter, TargetCache};
use log::info;

/// Bakes the diffuse irradiance map: a single mip level at the diffuse
/// resolution, roughness pinned to zero, six entries in face order. The
/// whole pass renders into one cached target.
pub fn bake_irradiance_map<F: EnvironmentFilter>(
    filter: &mut F,
    environment: &F::Environment,
    settings: &BakeSettings,
    compressor: Option<&dyn BlockCompressor>,
) -> Result<CubemapAsset, BakeError> {
    let schedule = [FilterLevel {
        mip_level: 0,
        resolution: settings.diffuse_size,
        roughness: 0.0,
    }];
    info!("Baking diffuse irradiance map: {}px", settings.diffuse_size);
    let mut targets = TargetCache::new();
    bake_filtered_chains(
        filter,
        environment,
        &mut targets,
        &schedule,
        Distribution::Diffuse,
        compressor,
    )
}
