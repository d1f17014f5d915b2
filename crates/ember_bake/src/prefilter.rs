use crate::{
    driver::{bake_filtered_chains, FilterLevel},
    error::BakeError,
    settings::BakeSettings,
};
use ember_asset::{BlockCompressor, CubemapAsset};
use ember_render::{Distribution, EnvironmentFilter, TargetCache};
use log::info;

/// Smallest specular mip; matches the compression block granularity.
const SPECULAR_FLOOR: u32 = 4;

fn specular_schedule(base: u32, mip_count: u32) -> Result<Vec<FilterLevel>, BakeError> {
    let bad_schedule = BakeError::BadSchedule {
        base,
        mip_count,
        floor: SPECULAR_FLOOR,
    };
    if mip_count < 2 || !base.is_power_of_two() {
        return Err(bad_schedule);
    }
    if base.checked_shr(mip_count - 1).unwrap_or(0) < SPECULAR_FLOOR {
        return Err(bad_schedule);
    }
    Ok((0..mip_count)
        .map(|mip_level| FilterLevel {
            mip_level,
            resolution: base >> mip_level,
            // Linear from mirror at the top mip to fully rough at the last.
            roughness: mip_level as f32 / (mip_count - 1) as f32,
        })
        .collect())
}

/// Bakes the pre-filtered specular reflection chain: one mip per roughness
/// step, six faces per mip, resolution halving from `specular_size` down to
/// the 4-pixel floor.
pub fn bake_prefilter_map<F: EnvironmentFilter>(
    filter: &mut F,
    environment: &F::Environment,
    settings: &BakeSettings,
    compressor: Option<&dyn BlockCompressor>,
) -> Result<CubemapAsset, BakeError> {
    let schedule = specular_schedule(settings.specular_size, settings.specular_mip_count)?;
    info!(
        "Baking specular reflection map: {}px, {} mip levels",
        settings.specular_size, settings.specular_mip_count
    );
    let mut targets = TargetCache::new();
    bake_filtered_chains(
        filter,
        environment,
        &mut targets,
        &schedule,
        Distribution::Specular,
        compressor,
    )
}
