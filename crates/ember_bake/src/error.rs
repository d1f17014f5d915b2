use ember_asset::AssetError;
use ember_render::FilterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BakeError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("invalid filter parameters: {0}")]
    Params(String),

    #[error(
        "base size {base} with {mip_count} mip levels drops below the {floor}-pixel floor"
    )]
    BadSchedule {
        base: u32,
        mip_count: u32,
        floor: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
