use ember_asset::{AssetError, CubeFace};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filter produced no captures for face {face:?} at mip {mip_level}")]
    EmptyCapture { face: CubeFace, mip_level: u32 },

    #[error("invalid filter parameters: {0}")]
    InvalidParams(String),

    #[error("environment asset is not usable as a filter source: {reason}")]
    Environment { reason: String },

    #[error(transparent)]
    Asset(#[from] AssetError),
}
