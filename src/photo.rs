use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader, RgbaImage};

use crate::error::MaskError;

/// Decodes a picked or stored photo into RGBA8.
pub fn open(path: &Path) -> Result<RgbaImage, MaskError> {
    let reader = ImageReader::open(path).map_err(|source| MaskError::IoFailure {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = reader
        .with_guessed_format()
        .map_err(|source| MaskError::IoFailure {
            path: path.to_path_buf(),
            source,
        })?;
    let img = reader.decode().map_err(|source| MaskError::DecodeFailure {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.into_rgba8())
}

/// Decodes PNG bytes previously produced by [`encode_png`].
pub fn decode_png(bytes: &[u8], path: &Path) -> Result<RgbaImage, MaskError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|source| {
        MaskError::DecodeFailure {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(img.into_rgba8())
}

/// Lossless encoding used for everything the store persists.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
