//! Error types for the voxpaint core

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("raster data holds {got} cells, dimensions require {expected}")]
    RasterSize { expected: usize, got: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
