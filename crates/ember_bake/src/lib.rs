mod driver;
mod environment;
mod error;
mod irradiance;
mod prefilter;
mod settings;
mod skybox;

pub use self::{
    environment::{bake_environment, BakedEnvironmentPaths, DIFFUSE_ASSET, SKYBOX_ASSET, SPECULAR_ASSET},
    error::BakeError,
    irradiance::bake_irradiance_map,
    prefilter::bake_prefilter_map,
    settings::BakeSettings,
    skybox::{bake_skybox, load_cube_faces},
};
