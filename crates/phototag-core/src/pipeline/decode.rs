//! Image decoding with content-based format detection and dimension limits.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Decoder for in-memory uploads.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    max_image_dimension: u32,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            max_image_dimension: limits.max_image_dimension,
        }
    }

    /// Decode raw bytes of unknown encoding.
    ///
    /// The format is sniffed from the content; there is no file name to fall
    /// back on, so unrecognized bytes are a decode error.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, PipelineError> {
        if bytes.is_empty() {
            return Err(PipelineError::Decode {
                message: "empty buffer".to_string(),
            });
        }

        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                message: format!("Cannot detect image format: {e}"),
            })?;
        let format = reader.format().ok_or_else(|| PipelineError::Decode {
            message: "Unrecognized image format".to_string(),
        })?;
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        if width > self.max_image_dimension || height > self.max_image_dimension {
            return Err(PipelineError::ImageTooLarge {
                width,
                height,
                max_dim: self.max_image_dimension,
            });
        }

        Ok(DecodedImage {
            image,
            format,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([0, 0, 255])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn decoder() -> ImageDecoder {
        ImageDecoder::new(&LimitsConfig::default())
    }

    #[test]
    fn test_decode_png() {
        let decoded = decoder().decode(&png_bytes(32, 16)).unwrap();
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!((decoded.width, decoded.height), (32, 16));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decoder().decode(b"not-an-image").unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_empty() {
        let err = decoder().decode(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_truncated_png() {
        let bytes = png_bytes(64, 64);
        let err = decoder().decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_decode_enforces_dimension_limit() {
        let decoder = ImageDecoder::new(&LimitsConfig {
            max_image_dimension: 20,
            ..LimitsConfig::default()
        });
        let err = decoder.decode(&png_bytes(32, 8)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ImageTooLarge {
                width: 32,
                height: 8,
                max_dim: 20
            }
        ));
    }
}
