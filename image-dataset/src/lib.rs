//! Labeled image datasets producing fixed-shape pixel and label tensors.
//!
//! A manifest lists image paths with integer labels. Each sample is decoded,
//! cropped or resized through a projective sampling transform, converted to
//! the configured color format and normalized per channel.

mod common;
pub mod codec;
pub mod config;
pub mod crop;
pub mod dataset;
pub mod error;
pub mod manifest;
pub mod materialize;
pub mod profiling;
pub mod random;
pub mod resample;

pub use codec::{CodecError, DecodedImage, ImageCodec, ImageCrateCodec};
pub use config::{DatasetConfig, DestFormat, ImageConfig};
pub use dataset::{
    ImageDataset, ImageDatasetInit, MemoryCacheDataset, OnDemandDataset, RandomAccessDataset,
    Sample,
};
pub use error::{Error, Result};
pub use manifest::ManifestEntry;
