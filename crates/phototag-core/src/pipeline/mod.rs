//! Turning uploaded bytes into model input.
//!
//! - **decode**: sniff the format and decode in-memory bytes
//! - **preprocess**: resize, center-crop and normalize into an NCHW tensor

pub mod decode;
pub mod preprocess;

pub use decode::{DecodedImage, ImageDecoder};
pub use preprocess::{Normalization, PreprocessRecipe, Preprocessor, CLIP, IMAGENET};
