use crate::{error::FilterError, target::RenderTarget};
use derive_builder::Builder;
use ember_asset::CubeFace;
use std::path::Path;

/// Statistical kernel the filter integrates with: a hemisphere for ambient
/// lighting, or a roughness-widened lobe around the reflection direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Distribution {
    Diffuse,
    Specular,
}

/// Everything one capture depends on. Set immediately before the frame is
/// rendered; no state leaks between (face, mip) units.
#[derive(Builder, Clone, Copy, Debug)]
pub struct FilterParams {
    pub roughness: f32,
    pub mip_level: u32,
    pub resolution: u32,
    pub distribution: Distribution,
    pub face: CubeFace,
}

/// The opaque renderer executing the environment filter kernel.
///
/// Rendering is synchronous: `render` returns once the frame, including any
/// device work, has completed and its pixels are available on the target.
/// The concrete sampling math lives entirely behind this trait.
pub trait EnvironmentFilter {
    type Environment;
    type Target: RenderTarget;

    /// Loads a previously persisted cubemap asset as the kernel's source
    /// environment texture.
    fn load_environment(&mut self, path: &Path) -> Result<Self::Environment, FilterError>;

    /// Creates a square capture surface. Resolution is fixed for the
    /// target's lifetime.
    fn create_target(&mut self, resolution: u32) -> Result<Self::Target, FilterError>;

    /// Renders throwaway frames to flush any multi-buffered renderer state
    /// before the first real capture. Backends without frame latency may
    /// treat this as a no-op.
    fn warm_up(&mut self, frames: u32) -> Result<(), FilterError>;

    /// Renders one filtered frame into `target`.
    fn render(
        &mut self,
        environment: &Self::Environment,
        params: &FilterParams,
        target: &mut Self::Target,
    ) -> Result<(), FilterError>;
}
