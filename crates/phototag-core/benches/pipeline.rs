//! Benchmarks for the Phototag inference pipeline (model-free stages).
//!
//! Run with: cargo bench -p phototag-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use phototag_core::config::{ClassifierConfig, LimitsConfig};
use phototag_core::pipeline::{ImageDecoder, PreprocessRecipe, Preprocessor};
use phototag_core::tagging::{CategorySpace, SelectionPolicy};
use phototag_core::{ScoreVector, TagResult};
use std::io::Cursor;

fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn benchmark_decode(c: &mut Criterion) {
    let bytes = sample_png(1920, 1080);
    let decoder = ImageDecoder::new(&LimitsConfig::default());

    c.bench_function("decode_png_1080p", |b| {
        b.iter(|| {
            let _ = decoder.decode(black_box(&bytes));
        })
    });
}

fn benchmark_preprocess(c: &mut Criterion) {
    let img = DynamicImage::ImageRgb8(RgbImage::new(1920, 1080));
    let recipe = PreprocessRecipe::imagenet(&ClassifierConfig::default());

    c.bench_function("preprocess_imagenet_224", |b| {
        b.iter(|| recipe.apply(black_box(&img)))
    });
}

fn benchmark_decode_and_normalize(c: &mut Criterion) {
    let bytes = sample_png(640, 480);
    let preprocessor = Preprocessor::new(
        &LimitsConfig::default(),
        PreprocessRecipe::imagenet(&ClassifierConfig::default()),
    );

    c.bench_function("decode_and_normalize_640x480", |b| {
        b.iter(|| {
            let _ = preprocessor.decode_and_normalize(black_box(&bytes));
        })
    });
}

fn benchmark_select(c: &mut Criterion) {
    let categories = CategorySpace::synthetic(1000);
    let scores = ScoreVector::new((0..1000).map(|i| ((i * 7919) % 1000) as f32 / 1000.0).collect());
    let top3 = SelectionPolicy::top_k(3, TagResult::singleton("error"));
    let thresholded =
        SelectionPolicy::top_k_with_threshold(8, 0.12, TagResult::singleton("photo"));

    c.bench_function("select_top3_of_1000", |b| {
        b.iter(|| top3.select(black_box(&scores), &categories))
    });
    c.bench_function("select_top8_threshold_of_1000", |b| {
        b.iter(|| thresholded.select(black_box(&scores), &categories))
    });
}

criterion_group!(
    benches,
    benchmark_decode,
    benchmark_preprocess,
    benchmark_decode_and_normalize,
    benchmark_select,
);
criterion_main!(benches);
