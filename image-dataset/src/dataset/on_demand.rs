use super::*;
use crate::{
    common::*, config::ImageConfig, manifest::ManifestEntry, materialize::Materializer,
};

/// The dataset that decodes and preprocesses the image on every access.
#[derive(Debug)]
pub struct OnDemandDataset {
    entries: Vec<ManifestEntry>,
    materializer: Materializer,
}

impl OnDemandDataset {
    pub fn new(entries: Vec<ManifestEntry>, materializer: Materializer) -> Self {
        info!("on-demand dataset with {} entries", entries.len());
        Self {
            entries,
            materializer,
        }
    }
}

impl RandomAccessDataset for OnDemandDataset {
    fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    fn image_config(&self) -> &ImageConfig {
        self.materializer.config()
    }

    fn get(&self, index: usize) -> Result<Sample> {
        let entry = entry_at(&self.entries, index)?;
        self.materializer.materialize(entry)
    }
}
