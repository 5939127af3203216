//! Phototag Core - image tag inference.
//!
//! Takes the raw bytes of an uploaded photo and returns a short, never-empty
//! list of human-readable tags.
//!
//! # Architecture
//!
//! ```text
//! bytes → Preprocessor → tensor → Scorer → ScoreVector → SelectionPolicy → TagResult
//! ```
//!
//! Two scoring strategies share that flow:
//! - **closed-set**: a fixed classifier (e.g. ResNet-18 over ImageNet), top-3
//! - **zero-shot**: a CLIP-style joint embedding over curated category
//!   phrases, top-8 above a confidence threshold
//!
//! # Usage
//!
//! ```rust,ignore
//! use phototag_core::{Config, TaggingService};
//!
//! let config = Config::load()?;
//! let service = TaggingService::load(&config)?;
//!
//! let tags = service.tag(&std::fs::read("photo.jpg")?)?;
//! println!("Tags: {:?}", tags.tags());
//! ```

pub mod config;
pub mod embedding;
pub mod error;
pub mod math;
pub mod pipeline;
pub mod service;
pub mod tagging;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, Strategy};
pub use error::{ConfigError, PipelineError, PipelineResult, Result, TaggerError};
pub use pipeline::Preprocessor;
pub use service::{ServiceInfo, TaggingService};
pub use tagging::{CategorySpace, Scorer, SelectionPolicy};
pub use types::{ScoreVector, TagResult};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
