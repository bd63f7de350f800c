use crate::Pixel;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlmError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "gdal")]
    #[error("{0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("missing metadata tag {0} in {1:?}")]
    MissingTag(&'static str, PathBuf),

    #[error("invalid metadata tag {tag}={value:?} in {path:?}")]
    InvalidTag {
        tag: &'static str,
        value: String,
        path: PathBuf,
    },

    #[error("pixel {pixel:?} is outside of the {cols}x{rows} map")]
    OutOfBounds {
        pixel: Pixel,
        cols: usize,
        rows: usize,
    },

    #[error("expected {expected} samples, got {actual}")]
    BandSize { expected: usize, actual: usize },
}
