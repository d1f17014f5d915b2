use crate::{
    error::FilterError,
    filter::{Distribution, EnvironmentFilter, FilterParams},
    target::RenderTarget,
};
use ember_asset::{decompress_bc6h, load_cubemap, CubeFace, PixelFormat, Pixmap};
use half::f16;
use log::debug;
use nalgebra_glm as glm;
use std::{f32::consts::PI, mem, path::Path};

/// Reference CPU implementation of the environment filter.
///
/// Integrates the classic split-sum kernels directly: cosine-weighted
/// hemisphere sampling for the diffuse distribution and GGX importance
/// sampling over a Hammersley sequence for specular. Slow next to a GPU
/// backend, but deterministic and dependency-free, which keeps the whole
/// pipeline runnable end to end.
pub struct SoftwareFilter {
    sample_count: u32,
}

impl SoftwareFilter {
    pub fn new(sample_count: u32) -> Self {
        Self {
            sample_count: sample_count.max(1),
        }
    }

    fn irradiance(&self, environment: &SoftwareEnvironment, normal: &glm::Vec3) -> glm::Vec3 {
        let (tangent, bitangent) = tangent_frame(normal);
        let mut total = glm::vec3(0.0, 0.0, 0.0);
        for sample in 0..self.sample_count {
            let (u, v) = hammersley(sample, self.sample_count);
            let phi = 2.0 * PI * u;
            let cos_theta = (1.0 - v).sqrt();
            let sin_theta = v.sqrt();
            let direction = tangent * (phi.cos() * sin_theta)
                + bitangent * (phi.sin() * sin_theta)
                + normal * cos_theta;
            total += environment.sample(&direction);
        }
        // Cosine-weighted estimator; the stored map is irradiance over pi.
        total / self.sample_count as f32
    }

    fn prefilter(
        &self,
        environment: &SoftwareEnvironment,
        normal: &glm::Vec3,
        roughness: f32,
    ) -> glm::Vec3 {
        let view = *normal;
        let mut total = glm::vec3(0.0, 0.0, 0.0);
        let mut total_weight = 0.0;
        for sample in 0..self.sample_count {
            let xi = hammersley(sample, self.sample_count);
            let half = importance_sample_ggx(xi, normal, roughness);
            let light = (half * (2.0 * view.dot(&half)) - view).normalize();
            let n_dot_l = normal.dot(&light).max(0.0);
            if n_dot_l > 0.0 {
                total += environment.sample(&light) * n_dot_l;
                total_weight += n_dot_l;
            }
        }
        total / total_weight.max(1e-3)
    }
}

/// The loaded skybox asset, expanded to f32 so it can be sampled directly.
pub struct SoftwareEnvironment {
    size: u32,
    faces: Vec<Vec<[f32; 3]>>,
}

impl SoftwareEnvironment {
    fn from_asset_path(path: &Path) -> Result<Self, FilterError> {
        let asset = load_cubemap(path)?;
        let size = asset.face_size();
        let mut faces = Vec::with_capacity(CubeFace::COUNT);
        for face in CubeFace::ALL {
            let base = asset.entry(face, 0);
            let expanded = match base.format() {
                PixelFormat::Bc6hUfloat => decompress_bc6h(base)?,
                _ => base.clone(),
            };
            let components = expanded.texels_f32()?;
            faces.push(
                components
                    .chunks_exact(4)
                    .map(|texel| [texel[0], texel[1], texel[2]])
                    .collect(),
            );
        }
        Ok(Self { size, faces })
    }

    fn texel(&self, face: usize, x: i64, y: i64) -> glm::Vec3 {
        let edge = self.size as i64 - 1;
        let x = x.clamp(0, edge) as usize;
        let y = y.clamp(0, edge) as usize;
        let texel = self.faces[face][y * self.size as usize + x];
        glm::vec3(texel[0], texel[1], texel[2])
    }

    /// Bilinear lookup along `direction`.
    fn sample(&self, direction: &glm::Vec3) -> glm::Vec3 {
        let (face, u, v) = project(direction);
        let size = self.size as f32;
        let x = u * size - 0.5;
        let y = v * size - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let x0 = x0 as i64;
        let y0 = y0 as i64;
        let top = self.texel(face, x0, y0) * (1.0 - fx) + self.texel(face, x0 + 1, y0) * fx;
        let bottom =
            self.texel(face, x0, y0 + 1) * (1.0 - fx) + self.texel(face, x0 + 1, y0 + 1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}

pub struct SoftwareTarget {
    resolution: u32,
    captures: Vec<Pixmap>,
}

impl RenderTarget for SoftwareTarget {
    fn resolution(&self) -> u32 {
        self.resolution
    }

    fn take_captures(&mut self) -> Vec<Pixmap> {
        mem::take(&mut self.captures)
    }
}

impl EnvironmentFilter for SoftwareFilter {
    type Environment = SoftwareEnvironment;
    type Target = SoftwareTarget;

    fn load_environment(&mut self, path: &Path) -> Result<Self::Environment, FilterError> {
        SoftwareEnvironment::from_asset_path(path)
    }

    fn create_target(&mut self, resolution: u32) -> Result<Self::Target, FilterError> {
        Ok(SoftwareTarget {
            resolution,
            captures: Vec::new(),
        })
    }

    fn warm_up(&mut self, frames: u32) -> Result<(), FilterError> {
        // No multi-buffered state to flush in a synchronous CPU backend.
        debug!("Skipping {} warm-up frames", frames);
        Ok(())
    }

    fn render(
        &mut self,
        environment: &Self::Environment,
        params: &FilterParams,
        target: &mut Self::Target,
    ) -> Result<(), FilterError> {
        if params.resolution != target.resolution() {
            return Err(FilterError::InvalidParams(format!(
                "target is {}px, parameters request {}px",
                target.resolution(),
                params.resolution
            )));
        }
        let size = params.resolution;
        let mut pixels = Vec::with_capacity(PixelFormat::Rgba16Float.buffer_len(size, size));
        for y in 0..size {
            for x in 0..size {
                let normal = face_direction(params.face, x, y, size);
                let color = match params.distribution {
                    Distribution::Diffuse => self.irradiance(environment, &normal),
                    Distribution::Specular => {
                        self.prefilter(environment, &normal, params.roughness)
                    }
                };
                for component in [color.x, color.y, color.z, 1.0] {
                    pixels.extend_from_slice(&f16::from_f32(component).to_le_bytes());
                }
            }
        }
        let capture = Pixmap::new(size, size, PixelFormat::Rgba16Float, pixels)?;
        target.captures.push(capture);
        Ok(())
    }
}

/// Direction through the center of texel (x, y) on a cube face.
fn face_direction(face: CubeFace, x: u32, y: u32, size: u32) -> glm::Vec3 {
    let u = (x as f32 + 0.5) / size as f32 * 2.0 - 1.0;
    let v = (y as f32 + 0.5) / size as f32 * 2.0 - 1.0;
    let direction = match face {
        CubeFace::PositiveX => glm::vec3(1.0, -v, -u),
        CubeFace::NegativeX => glm::vec3(-1.0, -v, u),
        CubeFace::PositiveY => glm::vec3(u, 1.0, v),
        CubeFace::NegativeY => glm::vec3(u, -1.0, -v),
        CubeFace::PositiveZ => glm::vec3(u, -v, 1.0),
        CubeFace::NegativeZ => glm::vec3(-u, -v, -1.0),
    };
    direction.normalize()
}

/// Inverse of [`face_direction`]: face index plus (u, v) in [0, 1].
fn project(direction: &glm::Vec3) -> (usize, f32, f32) {
    let (x, y, z) = (direction.x, direction.y, direction.z);
    let (ax, ay, az) = (x.abs(), y.abs(), z.abs());
    let (face, u, v, major) = if ax >= ay && ax >= az {
        if x > 0.0 {
            (0, -z, -y, ax)
        } else {
            (1, z, -y, ax)
        }
    } else if ay >= az {
        if y > 0.0 {
            (2, x, z, ay)
        } else {
            (3, x, -z, ay)
        }
    } else if z > 0.0 {
        (4, x, -y, az)
    } else {
        (5, -x, -y, az)
    };
    (face, (u / major + 1.0) * 0.5, (v / major + 1.0) * 0.5)
}

fn tangent_frame(normal: &glm::Vec3) -> (glm::Vec3, glm::Vec3) {
    let up = if normal.z.abs() < 0.999 {
        glm::vec3(0.0, 0.0, 1.0)
    } else {
        glm::vec3(1.0, 0.0, 0.0)
    };
    let tangent = up.cross(normal).normalize();
    let bitangent = normal.cross(&tangent);
    (tangent, bitangent)
}

fn importance_sample_ggx((u, v): (f32, f32), normal: &glm::Vec3, roughness: f32) -> glm::Vec3 {
    let a = roughness * roughness;
    let phi = 2.0 * PI * u;
    let cos_theta = ((1.0 - v) / (1.0 + (a * a - 1.0) * v)).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let (tangent, bitangent) = tangent_frame(normal);
    (tangent * (phi.cos() * sin_theta) + bitangent * (phi.sin() * sin_theta) + normal * cos_theta)
        .normalize()
}

fn hammersley(index: u32, count: u32) -> (f32, f32) {
    (index as f32 / count as f32, radical_inverse_vdc(index))
}

fn radical_inverse_vdc(mut bits: u32) -> f32 {
    bits = bits.rotate_right(16);
    bits = ((bits & 0x5555_5555) << 1) | ((bits & 0xAAAA_AAAA) >> 1);
    bits = ((bits & 0x3333_3333) << 2) | ((bits & 0xCCCC_CCCC) >> 2);
    bits = ((bits & 0x0F0F_0F0F) << 4) | ((bits & 0xF0F0_F0F0) >> 4);
    bits = ((bits & 0x00FF_00FF) << 8) | ((bits & 0xFF00_FF00) >> 8);
    bits as f32 * 2.328_306_4e-10
}
