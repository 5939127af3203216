//! Image preprocessing into model-ready tensors.
//!
//! Every recipe follows the same steps:
//! - convert to RGB
//! - center-crop the square that survives scaling the shorter side to `resize`
//! - resize that square to `crop × crop`
//! - scale to [0, 1], then `(x - mean) / std` per channel
//! - lay out as NCHW [1, 3, crop, crop]

use image::imageops::{self, FilterType};
use image::DynamicImage;
use ndarray::Array4;

use crate::config::{ClassifierConfig, LimitsConfig, ZeroShotConfig};
use crate::error::PipelineError;

use super::decode::ImageDecoder;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// Per-channel normalization statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

/// ImageNet statistics used by torchvision classifiers.
pub const IMAGENET: Normalization = Normalization {
    mean: [0.485, 0.456, 0.406],
    std: [0.229, 0.224, 0.225],
};

/// OpenAI CLIP statistics.
pub const CLIP: Normalization = Normalization {
    mean: [0.481_454_66, 0.457_827_5, 0.408_210_73],
    std: [0.268_629_54, 0.261_302_58, 0.275_777_11],
};

/// Resize, crop and normalization parameters for one model family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessRecipe {
    pub resize: u32,
    pub crop: u32,
    pub normalization: Normalization,
}

impl PreprocessRecipe {
    /// Closed-set classifier recipe (resize 256, crop 224, ImageNet stats by default).
    pub fn imagenet(config: &ClassifierConfig) -> Self {
        Self {
            resize: config.resize,
            crop: config.crop,
            normalization: IMAGENET,
        }
    }

    /// CLIP visual encoder recipe (resize = crop = image size).
    pub fn clip(config: &ZeroShotConfig) -> Self {
        Self {
            resize: config.image_size,
            crop: config.image_size,
            normalization: CLIP,
        }
    }

    /// Run the recipe on a decoded image.
    ///
    /// The crop box is located in source pixels and only that square is
    /// resized, so the work is bounded by `crop` whatever the aspect ratio.
    pub fn apply(&self, image: &DynamicImage) -> Array4<f32> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let out = self.crop.min(self.resize).max(1);
        let (left, top, side) = center_crop_box(width, height, self.resize, out);
        let region = imageops::crop_imm(&rgb, left, top, side, side).to_image();
        let cropped = imageops::resize(&region, out, out, FilterType::Triangle);

        let size = out as usize;
        let Normalization { mean, std } = self.normalization;
        Array4::from_shape_fn((1, CHANNELS, size, size), |(_, c, y, x)| {
            let value = cropped.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
            (value - mean[c]) / std[c]
        })
    }
}

/// Source square `(left, top, side)` that becomes the centered `crop × crop`
/// window once the shorter side is scaled to `resize`.
fn center_crop_box(width: u32, height: u32, resize: u32, crop: u32) -> (u32, u32, u32) {
    let short = width.min(height).max(1) as u64;
    let side = ((crop as u64 * short + resize as u64 / 2) / resize.max(1) as u64).clamp(1, short);
    let side = side as u32;
    (
        width.saturating_sub(side) / 2,
        height.saturating_sub(side) / 2,
        side,
    )
}

/// Decodes raw bytes and turns them into a tensor for one scoring strategy.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    decoder: ImageDecoder,
    recipe: PreprocessRecipe,
}

impl Preprocessor {
    pub fn new(limits: &LimitsConfig, recipe: PreprocessRecipe) -> Self {
        Self {
            decoder: ImageDecoder::new(limits),
            recipe,
        }
    }

    pub fn recipe(&self) -> &PreprocessRecipe {
        &self.recipe
    }

    /// Decode `bytes` and produce a normalized NCHW tensor.
    ///
    /// Deterministic: identical bytes always yield an identical tensor.
    pub fn decode_and_normalize(&self, bytes: &[u8]) -> Result<Array4<f32>, PipelineError> {
        let decoded = self.decoder.decode(bytes)?;
        tracing::trace!(
            "Decoded {:?} image {}x{}",
            decoded.format,
            decoded.width,
            decoded.height
        );
        Ok(self.recipe.apply(&decoded.image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn recipe(resize: u32, crop: u32) -> PreprocessRecipe {
        PreprocessRecipe {
            resize,
            crop,
            normalization: IMAGENET,
        }
    }

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img.clone())
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_center_crop_box() {
        // 640x480 scaled to 341x256, 224 crop ~ 420 source pixels.
        assert_eq!(center_crop_box(640, 480, 256, 224), (110, 30, 420));
        assert_eq!(center_crop_box(480, 640, 256, 224), (30, 110, 420));
        assert_eq!(center_crop_box(300, 300, 300, 300), (0, 0, 300));
    }

    #[test]
    fn test_extreme_aspect_ratio_stays_small() {
        assert_eq!(center_crop_box(10000, 1, 256, 224), (4999, 0, 1));

        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10000, 1, Rgb([0, 0, 255])));
        let tensor = recipe(256, 224).apply(&img);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let blue = (1.0 - IMAGENET.mean[2]) / IMAGENET.std[2];
        assert!((tensor[[0, 2, 0, 0]] - blue).abs() < 0.02);
        assert!((tensor[[0, 2, 223, 223]] - blue).abs() < 0.02);
    }

    #[test]
    fn test_output_shape_landscape_and_portrait() {
        let recipe = recipe(256, 224);
        for (w, h) in [(640, 480), (480, 640), (50, 300)] {
            let img = DynamicImage::ImageRgb8(RgbImage::new(w, h));
            assert_eq!(recipe.apply(&img).shape(), &[1, 3, 224, 224]);
        }
    }

    #[test]
    fn test_imagenet_normalization_values() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([255, 0, 0])));
        let tensor = recipe(256, 224).apply(&img);

        let red = (1.0 - IMAGENET.mean[0]) / IMAGENET.std[0];
        let green = (0.0 - IMAGENET.mean[1]) / IMAGENET.std[1];
        // One 8-bit level is ~0.017 after normalization.
        assert!((tensor[[0, 0, 100, 100]] - red).abs() < 0.02);
        assert!((tensor[[0, 1, 100, 100]] - green).abs() < 0.02);
    }

    #[test]
    fn test_center_crop_takes_middle() {
        // Left third black, middle white, right third black.
        let img = RgbImage::from_fn(300, 100, |x, _| {
            if (100..200).contains(&x) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let recipe = PreprocessRecipe {
            resize: 100,
            crop: 100,
            normalization: Normalization {
                mean: [0.0; 3],
                std: [1.0; 3],
            },
        };
        let tensor = recipe.apply(&DynamicImage::ImageRgb8(img));

        assert!(tensor[[0, 0, 50, 50]] > 0.99);
        assert!(tensor[[0, 0, 50, 2]] > 0.9);
    }

    #[test]
    fn test_clip_recipe_uses_image_size() {
        let config = ZeroShotConfig {
            image_size: 336,
            ..ZeroShotConfig::default()
        };
        let recipe = PreprocessRecipe::clip(&config);
        assert_eq!(recipe.crop, 336);
        assert_eq!(recipe.normalization, CLIP);
    }

    #[test]
    fn test_decode_and_normalize_deterministic() {
        let img = RgbImage::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, 77]));
        let bytes = png_bytes(&img);
        let pre = Preprocessor::new(&LimitsConfig::default(), recipe(32, 28));

        let a = pre.decode_and_normalize(&bytes).unwrap();
        let b = pre.decode_and_normalize(&bytes).unwrap();
        assert_eq!(a.shape(), &[1, 3, 28, 28]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_and_normalize_rejects_garbage() {
        let pre = Preprocessor::new(&LimitsConfig::default(), recipe(256, 224));
        let err = pre.decode_and_normalize(b"not-an-image").unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }
}
