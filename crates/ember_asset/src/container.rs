use crate::{
    cubemap::CubemapAsset,
    error::AssetError,
    face::CubeFace,
    pixmap::{PixelFormat, Pixmap},
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

// DDS container with a DX10 extended header. A cubemap's payload is stored
// face-major, mip-minor, which is exactly the asset's serialized order.
const MAGIC: u32 = 0x2053_4444; // "DDS "
const HEADER_SIZE: u32 = 124;
const PIXEL_FORMAT_SIZE: u32 = 32;
const FLAGS: u32 = 0x0002_1007; // caps | height | width | pixelformat | mipmapcount
const FOURCC: u32 = 0x4;
const CAPS: u32 = 0x0040_1008; // complex | texture | mipmap
const CAPS2_CUBEMAP: u32 = 0x200;
const CAPS2_ALL_FACES: u32 = 0xFE00;
const DIMENSION_TEXTURE2D: u32 = 3;
const MISC_TEXTURECUBE: u32 = 0x4;

const DXGI_R32G32B32A32_FLOAT: u32 = 2;
const DXGI_R16G16B16A16_FLOAT: u32 = 10;
const DXGI_BC6H_UF16: u32 = 95;

fn dxgi_format(format: PixelFormat) -> u32 {
    match format {
        PixelFormat::Rgba32Float => DXGI_R32G32B32A32_FLOAT,
        PixelFormat::Rgba16Float => DXGI_R16G16B16A16_FLOAT,
        PixelFormat::Bc6hUfloat => DXGI_BC6H_UF16,
    }
}

fn pixel_format(dxgi: u32) -> Option<PixelFormat> {
    match dxgi {
        DXGI_R32G32B32A32_FLOAT => Some(PixelFormat::Rgba32Float),
        DXGI_R16G16B16A16_FLOAT => Some(PixelFormat::Rgba16Float),
        DXGI_BC6H_UF16 => Some(PixelFormat::Bc6hUfloat),
        _ => None,
    }
}

pub fn save_cubemap(path: impl AsRef<Path>, asset: &CubemapAsset) -> Result<(), AssetError> {
    let path = path.as_ref();
    debug!(
        "Writing cubemap asset to {} ({} entries)",
        path.display(),
        asset.entries().len()
    );
    let mut writer = BufWriter::new(File::create(path)?);

    writer.write_u32::<LittleEndian>(MAGIC)?;
    writer.write_u32::<LittleEndian>(HEADER_SIZE)?;
    writer.write_u32::<LittleEndian>(FLAGS)?;
    writer.write_u32::<LittleEndian>(asset.face_size())?; // height
    writer.write_u32::<LittleEndian>(asset.face_size())?; // width
    writer.write_u32::<LittleEndian>(asset.entries()[0].pixels().len() as u32)?;
    writer.write_u32::<LittleEndian>(0)?; // depth
    writer.write_u32::<LittleEndian>(asset.mip_levels() as u32)?;
    for _ in 0..11 {
        writer.write_u32::<LittleEndian>(0)?; // reserved
    }

    writer.write_u32::<LittleEndian>(PIXEL_FORMAT_SIZE)?;
    writer.write_u32::<LittleEndian>(FOURCC)?;
    writer.write_all(b"DX10")?;
    for _ in 0..5 {
        writer.write_u32::<LittleEndian>(0)?; // bit counts and masks
    }

    writer.write_u32::<LittleEndian>(CAPS)?;
    writer.write_u32::<LittleEndian>(CAPS2_CUBEMAP | CAPS2_ALL_FACES)?;
    for _ in 0..3 {
        writer.write_u32::<LittleEndian>(0)?; // caps3, caps4, reserved
    }

    writer.write_u32::<LittleEndian>(dxgi_format(asset.format()))?;
    writer.write_u32::<LittleEndian>(DIMENSION_TEXTURE2D)?;
    writer.write_u32::<LittleEndian>(MISC_TEXTURECUBE)?;
    writer.write_u32::<LittleEndian>(1)?; // array size, one cube
    writer.write_u32::<LittleEndian>(0)?; // misc flags 2

    for entry in asset.entries() {
        writer.write_all(entry.pixels())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_cubemap(path: impl AsRef<Path>) -> Result<CubemapAsset, AssetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AssetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let malformed = |reason: &str| AssetError::Malformed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if reader.read_u32::<LittleEndian>()? != MAGIC {
        return Err(malformed("missing DDS magic"));
    }
    if reader.read_u32::<LittleEndian>()? != HEADER_SIZE {
        return Err(malformed("unexpected header size"));
    }
    let _flags = reader.read_u32::<LittleEndian>()?;
    let height = reader.read_u32::<LittleEndian>()?;
    let width = reader.read_u32::<LittleEndian>()?;
    let _pitch_or_linear_size = reader.read_u32::<LittleEndian>()?;
    let _depth = reader.read_u32::<LittleEndian>()?;
    let mip_levels = reader.read_u32::<LittleEndian>()?;
    for _ in 0..11 {
        let _reserved = reader.read_u32::<LittleEndian>()?;
    }

    if reader.read_u32::<LittleEndian>()? != PIXEL_FORMAT_SIZE {
        return Err(malformed("unexpected pixel format size"));
    }
    if reader.read_u32::<LittleEndian>()? & FOURCC == 0 {
        return Err(malformed("expected a fourcc pixel format"));
    }
    let mut fourcc = [0u8; 4];
    reader.read_exact(&mut fourcc)?;
    if &fourcc != b"DX10" {
        return Err(malformed("expected a DX10 extended header"));
    }
    for _ in 0..5 {
        let _masks = reader.read_u32::<LittleEndian>()?;
    }

    let _caps = reader.read_u32::<LittleEndian>()?;
    if reader.read_u32::<LittleEndian>()? & CAPS2_CUBEMAP == 0 {
        return Err(malformed("not a cubemap"));
    }
    for _ in 0..3 {
        let _reserved = reader.read_u32::<LittleEndian>()?;
    }

    let dxgi = reader.read_u32::<LittleEndian>()?;
    let format = pixel_format(dxgi).ok_or_else(|| malformed("unsupported pixel format"))?;
    if reader.read_u32::<LittleEndian>()? != DIMENSION_TEXTURE2D {
        return Err(malformed("expected a 2D resource"));
    }
    if reader.read_u32::<LittleEndian>()? & MISC_TEXTURECUBE == 0 {
        return Err(malformed("missing the cube resource flag"));
    }
    let _array_size = reader.read_u32::<LittleEndian>()?;
    let _misc_flags2 = reader.read_u32::<LittleEndian>()?;

    if width != height {
        return Err(malformed("cube faces must be square"));
    }
    if mip_levels == 0 {
        return Err(malformed("mip count is zero"));
    }

    let mut entries = Vec::with_capacity(CubeFace::COUNT * mip_levels as usize);
    for _ in 0..CubeFace::COUNT {
        for mip in 0..mip_levels {
            let size = (width >> mip).max(1);
            let mut pixels = vec![0u8; format.buffer_len(size, size)];
            reader.read_exact(&mut pixels)?;
            entries.push(Pixmap::new(size, size, format, pixels)?);
        }
    }
    Ok(CubemapAsset::from_entries(entries, mip_levels as usize))
}
