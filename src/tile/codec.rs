//! Image decoding and PNG encoding.
//!
//! Provider responses arrive in whatever format the provider picked
//! (PNG from background removal, JPEG or WebP from the enhancement
//! delivery), so decoding sniffs the format from the bytes. Encoding always
//! produces PNG to keep the flattened photo lossless before upload.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};

use crate::error::ImageError;

/// Decode image bytes, detecting the format from their content.
pub fn decode_image(source: &[u8]) -> Result<DynamicImage, ImageError> {
    let reader = ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(|e| ImageError::Decode {
            message: e.to_string(),
        })?;

    if reader.format().is_none() {
        return Err(ImageError::Decode {
            message: "unrecognized image format".to_string(),
        });
    }

    reader.decode().map_err(|e| ImageError::Decode {
        message: e.to_string(),
    })
}

/// Encode an RGB image as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Bytes, ImageError> {
    let mut output = Cursor::new(Vec::new());
    image
        .write_to(&mut output, ImageFormat::Png)
        .map_err(|e| ImageError::Encode {
            message: e.to_string(),
        })?;

    Ok(Bytes::from(output.into_inner()))
}

// =============================================================================
// Tests
// =============================================================================
