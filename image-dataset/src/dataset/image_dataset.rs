use super::*;
use crate::{
    codec::{ImageCodec, ImageCrateCodec},
    common::*,
    config::ImageConfig,
    manifest::{self, ManifestEntry},
    materialize::Materializer,
    random,
};

/// The dataset in either memory-cache or on-demand mode.
#[derive(Debug)]
pub enum ImageDataset {
    MemoryCache(MemoryCacheDataset),
    OnDemand(OnDemandDataset),
}

impl ImageDataset {
    /// Build the dataset from parsed entries.
    pub fn new(
        entries: Vec<ManifestEntry>,
        materializer: Materializer,
        read_all_to_memory: bool,
    ) -> Result<Self> {
        let dataset = if read_all_to_memory {
            Self::MemoryCache(MemoryCacheDataset::new(entries, materializer)?)
        } else {
            Self::OnDemand(OnDemandDataset::new(entries, materializer))
        };
        Ok(dataset)
    }

    /// Iterate over all samples in index order.
    pub fn iter(&self) -> impl Iterator<Item = Result<Sample>> + '_ {
        (0..self.size()).map(move |index| self.get(index))
    }
}

impl RandomAccessDataset for ImageDataset {
    fn entries(&self) -> &[ManifestEntry] {
        match self {
            Self::MemoryCache(dataset) => dataset.entries(),
            Self::OnDemand(dataset) => dataset.entries(),
        }
    }

    fn image_config(&self) -> &ImageConfig {
        match self {
            Self::MemoryCache(dataset) => dataset.image_config(),
            Self::OnDemand(dataset) => dataset.image_config(),
        }
    }

    fn get(&self, index: usize) -> Result<Sample> {
        match self {
            Self::MemoryCache(dataset) => dataset.get(index),
            Self::OnDemand(dataset) => dataset.get(index),
        }
    }
}

/// The dataset initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageDatasetInit {
    /// The directory that manifest image paths are relative to.
    pub image_dir: PathBuf,
    pub manifest_file: PathBuf,
    pub image: ImageConfig,
    /// Materialize every sample at build time.
    pub read_all_to_memory: bool,
    /// The random crop seed, or `None` to seed from entropy.
    pub seed: Option<u64>,
}

impl ImageDatasetInit {
    /// Build the dataset with the default `image` crate decoder.
    pub fn build(self) -> Result<ImageDataset> {
        self.build_with_codec(Arc::new(ImageCrateCodec))
    }

    /// Build the dataset with a custom decoder.
    ///
    /// The manifest is fully parsed before any image is decoded.
    pub fn build_with_codec(self, codec: Arc<dyn ImageCodec>) -> Result<ImageDataset> {
        let Self {
            image_dir,
            manifest_file,
            image,
            read_all_to_memory,
            seed,
        } = self;

        let entries = manifest::load_manifest(&image_dir, &manifest_file)?;
        info!(
            "loaded {} entries from '{}'",
            entries.len(),
            manifest_file.display()
        );

        let materializer = Materializer::new(image, codec, random::shared_rng(seed))?;
        ImageDataset::new(entries, materializer, read_all_to_memory)
    }
}
