use std::fmt::{self, Display};
use std::path::PathBuf;

/// Failures of the masking pipeline. Each variant says where things went wrong.
#[derive(Debug)]
pub enum MaskError {
    /// A picked or stored file could not be read as a raster image.
    DecodeFailure {
        path: PathBuf,
        source: image::ImageError,
    },
    /// The compositor was handed an empty image.
    InvalidInput { width: u32, height: u32 },
    /// Reading or writing persisted state failed.
    IoFailure {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskError::DecodeFailure { path, source } => {
                write!(f, "Failed to decode image {}: {source}", path.display())
            }
            MaskError::InvalidInput { width, height } => {
                write!(f, "Cannot mask an empty image ({width}x{height})")
            }
            MaskError::IoFailure { path, source } => {
                write!(f, "I/O error on {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for MaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaskError::DecodeFailure { source, .. } => Some(source),
            MaskError::InvalidInput { .. } => None,
            MaskError::IoFailure { source, .. } => Some(source),
        }
    }
}
