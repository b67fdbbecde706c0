use super::*;
use crate::{common::*, config::ImageConfig, manifest::ManifestEntry};

/// The dataset that can be random accessed.
pub trait RandomAccessDataset
where
    Self: Debug,
{
    /// The manifest entries, in index order.
    fn entries(&self) -> &[ManifestEntry];

    /// The preprocessing options applied to every sample.
    fn image_config(&self) -> &ImageConfig;

    /// Get the sample at `index`.
    fn get(&self, index: usize) -> Result<Sample>;

    /// Get number of samples in the dataset.
    fn size(&self) -> usize {
        self.entries().len()
    }
}

/// Look up the entry at `index` or report the index as out of range.
pub(crate) fn entry_at(entries: &[ManifestEntry], index: usize) -> Result<&ManifestEntry> {
    entries.get(index).ok_or(Error::IndexOutOfRange {
        index,
        size: entries.len(),
    })
}
