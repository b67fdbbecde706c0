use super::*;
use crate::{
    common::*, config::ImageConfig, manifest::ManifestEntry, materialize::Materializer,
};

/// The dataset that materializes every sample once and keeps it in memory.
///
/// Random crops are drawn once at construction, so every access to an index
/// returns the same content.
#[derive(Debug)]
pub struct MemoryCacheDataset {
    entries: Vec<ManifestEntry>,
    config: ImageConfig,
    samples: Vec<Sample>,
}

impl MemoryCacheDataset {
    pub fn new(entries: Vec<ManifestEntry>, materializer: Materializer) -> Result<Self> {
        info!("loading {} images into memory", entries.len());
        let since = Instant::now();

        let samples: Vec<_> = entries
            .iter()
            .map(|entry| materializer.materialize(entry))
            .try_collect()?;

        info!(
            "loaded {} images in {:.3}s",
            samples.len(),
            since.elapsed().as_secs_f64()
        );

        Ok(Self {
            config: materializer.config().clone(),
            entries,
            samples,
        })
    }
}

impl RandomAccessDataset for MemoryCacheDataset {
    fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    fn image_config(&self) -> &ImageConfig {
        &self.config
    }

    fn get(&self, index: usize) -> Result<Sample> {
        entry_at(&self.entries, index)?;
        Ok(self.samples[index].shallow_clone())
    }
}
