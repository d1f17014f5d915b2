use crate::settings::Settings;
use anyhow::Result;
use ember_bake::bake_environment;
use ember_render::SoftwareFilter;
use log::info;
use std::path::Path;

pub fn run() -> Result<()> {
    let settings = Settings::load_current_settings()?;
    let mut filter = SoftwareFilter::new(settings.sample_count);
    let paths = bake_environment(
        &mut filter,
        Path::new(&settings.source_dir),
        Path::new(&settings.output_dir),
        &settings.bake_settings(),
    )?;
    info!(
        "Wrote {}, {} and {}",
        paths.skybox.display(),
        paths.specular.display(),
        paths.diffuse.display()
    );
    Ok(())
}
