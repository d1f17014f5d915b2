use crate::pixmap::PixelFormat;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode image at {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot convert {from:?} to {to:?}")]
    Convert { from: PixelFormat, to: PixelFormat },

    #[error("cannot resize a {format:?} image; block-compressed data is not resizable")]
    ResizeCompressed { format: PixelFormat },

    #[error("compression requires a {required:?} source, got {format:?}")]
    Compress {
        format: PixelFormat,
        required: PixelFormat,
    },

    #[error("unsupported block mode {mode}; only single-region 10-bit blocks are decodable")]
    UnsupportedBlockMode { mode: u8 },

    #[error("pixel buffer holds {len} bytes, {expected} expected for {width}x{height} {format:?}")]
    BufferSize {
        width: u32,
        height: u32,
        format: PixelFormat,
        len: usize,
        expected: usize,
    },

    #[error("image is {width}x{height}, cube faces must be square")]
    NotSquare { width: u32, height: u32 },

    #[error("resolution {size} must be a power of two no smaller than {min}")]
    BadResolution { size: u32, min: u32 },

    #[error("face {face} is {size}px, expected {expected}px to match the first face")]
    FaceSizeMismatch {
        face: &'static str,
        size: u32,
        expected: u32,
    },

    #[error("expected {expected} mip chains, got {count}")]
    FaceCountMismatch { count: usize, expected: usize },

    #[error("mip chains differ in length; face {face} has {len} levels, expected {expected}")]
    ChainLengthMismatch {
        face: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("malformed cubemap container {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}
