use anyhow::Result;
use ember::asset::{decompress_bc6h, load_cubemap, CubeFace, PixelFormat};
use ember::bake::{
    bake_environment, BakeSettings, DIFFUSE_ASSET, SKYBOX_ASSET, SPECULAR_ASSET,
};
use ember::render::SoftwareFilter;
use std::{fs, fs::File, io::Write, path::Path};

/// Writes a constant-color Radiance HDR image with flat RGBE scanlines.
fn write_hdr(path: &Path, size: u32, value: f32) -> Result<()> {
    let mut file = File::create(path)?;
    write!(file, "#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y {} +X {}\n", size, size)?;
    let texel = rgbe(value);
    for _ in 0..size * size {
        file.write_all(&texel)?;
    }
    Ok(())
}

fn rgbe(value: f32) -> [u8; 4] {
    assert!(value > 0.0);
    let exponent = value.log2().floor() as i32 + 1;
    let scale = 2f32.powi(exponent);
    let mantissa = (value / scale * 256.0) as u8;
    [mantissa, mantissa, mantissa, (exponent + 128) as u8]
}

fn write_faces(dir: &Path, size: u32, value: f32) -> Result<()> {
    fs::create_dir_all(dir)?;
    for face in CubeFace::ALL {
        write_hdr(&dir.join(format!("{}.hdr", face.file_stem())), size, value)?;
    }
    Ok(())
}

fn small_settings(compression: bool) -> BakeSettings {
    BakeSettings {
        compression,
        specular_size: 16,
        specular_mip_count: 3,
        diffuse_size: 8,
        warmup_frames: 3,
    }
}

#[test]
fn bakes_all_three_assets_with_compression() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let faces = dir.path().join("faces");
    let out = dir.path().join("out");
    write_faces(&faces, 16, 0.5)?;

    let mut filter = SoftwareFilter::new(16);
    let paths = bake_environment(&mut filter, &faces, &out, &small_settings(true))?;

    assert_eq!(paths.skybox, out.join(SKYBOX_ASSET));
    let skybox = load_cubemap(&paths.skybox)?;
    assert_eq!(skybox.face_size(), 16);
    assert_eq!(skybox.mip_levels(), 3); // 16 -> 8 -> 4
    assert_eq!(skybox.entries().len(), 18);
    assert_eq!(skybox.format(), PixelFormat::Bc6hUfloat);

    let specular = load_cubemap(out.join(SPECULAR_ASSET))?;
    assert_eq!(specular.mip_levels(), 3);
    assert_eq!(specular.entries().len(), 18);
    assert_eq!(specular.format(), PixelFormat::Bc6hUfloat);
    for face in CubeFace::ALL {
        for mip in 0..3 {
            let entry = specular.entry(face, mip);
            assert_eq!(entry.width(), 16 >> mip);
            // The serialized position honors the face-major contract.
            assert_eq!(specular.index_of(face, mip), face.index() * 3 + mip);
        }
    }

    let diffuse = load_cubemap(out.join(DIFFUSE_ASSET))?;
    assert_eq!(diffuse.mip_levels(), 1);
    assert_eq!(diffuse.entries().len(), 6);
    assert!(diffuse.entries().iter().all(|entry| entry.width() == 8));

    // A constant 0.5 environment filters to a constant 0.5 map.
    let entry = decompress_bc6h(diffuse.entry(CubeFace::NegativeY, 0))?;
    for texel in entry.texels_f32()?.chunks_exact(4) {
        for channel in 0..3 {
            assert!((texel[channel] - 0.5).abs() < 0.05, "got {}", texel[channel]);
        }
    }
    Ok(())
}

#[test]
fn uncompressed_bake_keeps_float_entries_and_full_chains() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let faces = dir.path().join("faces");
    let out = dir.path().join("out");
    write_faces(&faces, 16, 1.0)?;

    let mut filter = SoftwareFilter::new(8);
    bake_environment(&mut filter, &faces, &out, &small_settings(false))?;

    // Without compression the skybox chain bottoms out at one pixel.
    let skybox = load_cubemap(out.join(SKYBOX_ASSET))?;
    assert_eq!(skybox.mip_levels(), 5); // 16, 8, 4, 2, 1
    assert_eq!(skybox.format(), PixelFormat::Rgba16Float);
    assert_eq!(skybox.entry(CubeFace::NegativeZ, 4).width(), 1);

    // The diffuse pass still yields exactly six entries.
    let diffuse = load_cubemap(out.join(DIFFUSE_ASSET))?;
    assert_eq!(diffuse.entries().len(), 6);
    assert_eq!(diffuse.format(), PixelFormat::Rgba16Float);
    Ok(())
}

#[test]
fn missing_face_aborts_before_any_output_is_written() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let faces = dir.path().join("faces");
    let out = dir.path().join("out");
    fs::create_dir_all(&faces)?;
    // Five faces only; nz.hdr is missing.
    for face in CubeFace::ALL.iter().take(5) {
        write_hdr(&faces.join(format!("{}.hdr", face.file_stem())), 8, 1.0)?;
    }

    let mut filter = SoftwareFilter::new(4);
    let settings = BakeSettings {
        specular_size: 8,
        specular_mip_count: 2,
        diffuse_size: 4,
        ..small_settings(true)
    };
    let result = bake_environment(&mut filter, &faces, &out, &settings);

    assert!(result.is_err());
    assert!(!out.join(SKYBOX_ASSET).exists());
    assert!(!out.join(SPECULAR_ASSET).exists());
    assert!(!out.join(DIFFUSE_ASSET).exists());
    Ok(())
}

#[test]
fn mismatched_face_sizes_are_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let faces = dir.path().join("faces");
    let out = dir.path().join("out");
    write_faces(&faces, 8, 1.0)?;
    write_hdr(&faces.join("py.hdr"), 16, 1.0)?;

    let mut filter = SoftwareFilter::new(4);
    let settings = BakeSettings {
        specular_size: 8,
        specular_mip_count: 2,
        diffuse_size: 4,
        ..small_settings(true)
    };
    let result = bake_environment(&mut filter, &faces, &out, &settings);
    assert!(result.is_err());
    assert!(!out.join(SKYBOX_ASSET).exists());
    Ok(())
}
