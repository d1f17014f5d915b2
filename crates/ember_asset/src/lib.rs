mod bc6h;
mod container;
mod cubemap;
mod error;
mod face;
mod mipchain;
mod pixmap;

pub use self::{
    bc6h::{decompress_bc6h, Bc6hCompressor, BlockCompressor},
    container::{load_cubemap, save_cubemap},
    cubemap::CubemapAsset,
    error::AssetError,
    face::CubeFace,
    mipchain::{build_mip_chain, MipChain},
    pixmap::{PixelFormat, Pixmap},
};
