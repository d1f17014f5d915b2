/// Fixed tunables for one baking run.
#[derive(Clone, Debug)]
pub struct BakeSettings {
    /// Block-compress every stored level with BC6H.
    pub compression: bool,
    /// Full resolution of the specular chain's first mip.
    pub specular_size: u32,
    /// Number of specular mip levels; roughness runs 0..=1 across them.
    pub specular_mip_count: u32,
    /// Resolution of the single-level irradiance map.
    pub diffuse_size: u32,
    /// Throwaway frames rendered before the first filter capture.
    /// Renderer-specific; covers multi-buffered backends.
    pub warmup_frames: u32,
}

impl Default for BakeSettings {
    fn default() -> Self {
        Self {
            compression: true,
            specular_size: 2048,
            specular_mip_count: 10,
            diffuse_size: 512,
            warmup_frames: 3,
        }
    }
}
