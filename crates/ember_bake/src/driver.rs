use crate::error::BakeError;
use ember_asset::{BlockCompressor, CubeFace, CubemapAsset, MipChain};
use ember_render::{
    Distribution, EnvironmentFilter, FilterError, FilterParamsBuilder, RenderTarget, TargetCache,
};
use log::debug;

/// One row of a filter pass schedule.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FilterLevel {
    pub mip_level: u32,
    pub resolution: u32,
    pub roughness: f32,
}

/// The shared mechanism behind both filter passes: walk the schedule, and
/// for every (level, face) unit set parameters, render one frame, read the
/// capture back, optionally compress it, and grow that face's chain.
///
/// Units run strictly in sequence; the render target and parameter block
/// are reused across iterations, so no pipelining is possible.
pub(crate) fn bake_filtered_chains<F: EnvironmentFilter>(
    filter: &mut F,
    environment: &F::Environment,
    targets: &mut TargetCache<F::Target>,
    schedule: &[FilterLevel],
    distribution: Distribution,
    compressor: Option<&dyn BlockCompressor>,
) -> Result<CubemapAsset, BakeError> {
    let mut chains = vec![MipChain::new(); CubeFace::COUNT];
    for level in schedule {
        debug!(
            "Filtering mip {} at {}px, roughness {:.3}",
            level.mip_level, level.resolution, level.roughness
        );
        for face in CubeFace::ALL {
            let target =
                targets.acquire_with(level.resolution, || filter.create_target(level.resolution))?;
            let params = FilterParamsBuilder::default()
                .roughness(level.roughness)
                .mip_level(level.mip_level)
                .resolution(level.resolution)
                .distribution(distribution)
                .face(face)
                .build()
                .map_err(|error| BakeError::Params(error.to_string()))?;
            filter.render(environment, &params, target)?;

            let mut captures = target.take_captures();
            if captures.is_empty() {
                return Err(FilterError::EmptyCapture {
                    face,
                    mip_level: level.mip_level,
                }
                .into());
            }
            let mut capture = captures.remove(0);
            if let Some(codec) = compressor {
                capture = codec.compress(&capture)?;
            }
            chains[face.index()].push(capture);
        }
    }
    Ok(CubemapAsset::from_face_chains(chains)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_asset::{Bc6hCompressor, PixelFormat, Pixmap};
    use ember_render::FilterParams;
    use half::f16;
    use std::path::Path;

    struct FakeTarget {
        resolution: u32,
        captures: Vec<Pixmap>,
    }

    impl RenderTarget for FakeTarget {
        fn resolution(&self) -> u32 {
            self.resolution
        }

        fn take_captures(&mut self) -> Vec<Pixmap> {
            std::mem::take(&mut self.captures)
        }
    }

    /// Emits solid-color captures tagged with (face, mip) so ordering is
    /// observable, and records every target creation.
    struct FakeFilter {
        created: Vec<u32>,
        starve_captures: bool,
    }

    impl FakeFilter {
        fn new() -> Self {
            Self {
                created: Vec::new(),
                starve_captures: false,
            }
        }
    }

    fn solid(size: u32, value: f32) -> Pixmap {
        let mut pixels = Vec::new();
        for _ in 0..size * size {
            for component in [value, value, value, 1.0] {
                pixels.extend_from_slice(&f16::from_f32(component).to_le_bytes());
            }
        }
        Pixmap::new(size, size, PixelFormat::Rgba16Float, pixels).unwrap()
    }

    impl EnvironmentFilter for FakeFilter {
        type Environment = ();
        type Target = FakeTarget;

        fn load_environment(&mut self, _path: &Path) -> Result<(), FilterError> {
            Ok(())
        }

        fn create_target(&mut self, resolution: u32) -> Result<Self::Target, FilterError> {
            self.created.push(resolution);
            Ok(FakeTarget {
                resolution,
                captures: Vec::new(),
            })
        }

        fn warm_up(&mut self, _frames: u32) -> Result<(), FilterError> {
            Ok(())
        }

        fn render(
            &mut self,
            _environment: &Self::Environment,
            params: &FilterParams,
            target: &mut Self::Target,
        ) -> Result<(), FilterError> {
            if self.starve_captures {
                return Ok(());
            }
            let tag = params.face.index() as f32 * 16.0 + params.mip_level as f32;
            target.captures.push(solid(params.resolution, tag));
            Ok(())
        }
    }

    fn two_level_schedule() -> Vec<FilterLevel> {
        vec![
            FilterLevel {
                mip_level: 0,
                resolution: 8,
                roughness: 0.0,
            },
            FilterLevel {
                mip_level: 1,
                resolution: 4,
                roughness: 1.0,
            },
        ]
    }

    #[test]
    fn assembles_chains_face_major_and_reuses_targets() {
        let mut filter = FakeFilter::new();
        let mut targets = TargetCache::new();
        let asset = bake_filtered_chains(
            &mut filter,
            &(),
            &mut targets,
            &two_level_schedule(),
            Distribution::Specular,
            None,
        )
        .unwrap();

        assert_eq!(asset.mip_levels(), 2);
        assert_eq!(asset.entries().len(), 12);
        for face in CubeFace::ALL {
            for mip in 0..2 {
                let entry = asset.entry(face, mip);
                assert_eq!(entry.width(), 8 >> mip);
                let tag = entry.texels_f32().unwrap()[0];
                assert_eq!(tag, face.index() as f32 * 16.0 + mip as f32);
            }
        }
        // One target per distinct resolution, created in schedule order.
        assert_eq!(filter.created, [8, 4]);
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn empty_captures_abort_the_pass() {
        let mut filter = FakeFilter::new();
        filter.starve_captures = true;
        let mut targets = TargetCache::new();
        let result = bake_filtered_chains(
            &mut filter,
            &(),
            &mut targets,
            &two_level_schedule(),
            Distribution::Diffuse,
            None,
        );
        assert!(matches!(
            result,
            Err(BakeError::Filter(FilterError::EmptyCapture {
                face: CubeFace::PositiveX,
                mip_level: 0,
            }))
        ));
    }

    #[test]
    fn captures_are_compressed_when_a_codec_is_supplied() {
        let codec = Bc6hCompressor;
        let mut filter = FakeFilter::new();
        let mut targets = TargetCache::new();
        let schedule = [FilterLevel {
            mip_level: 0,
            resolution: 4,
            roughness: 0.0,
        }];
        let asset = bake_filtered_chains(
            &mut filter,
            &(),
            &mut targets,
            &schedule,
            Distribution::Diffuse,
            Some(&codec),
        )
        .unwrap();
        assert_eq!(asset.entries().len(), 6);
        assert!(asset
            .entries()
            .iter()
            .all(|entry| entry.format() == PixelFormat::Bc6hUfloat));
    }
}
