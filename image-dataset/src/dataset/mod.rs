//! Dataset types over a labeled image manifest.

mod dataset_;
mod image_dataset;
mod mem_cache;
mod on_demand;
mod record;

pub use dataset_::*;
pub use image_dataset::*;
pub use mem_cache::*;
pub use on_demand::*;
pub use record::*;
