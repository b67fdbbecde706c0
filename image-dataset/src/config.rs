//! Dataset and image preprocessing options.

use crate::{
    common::*,
    dataset::ImageDatasetInit,
    error::ensure_config,
};

/// Crop fractions closer than this to 1.0 mean "no crop".
pub const CROP_FRACTION_EPSILON: f64 = 1e-6;

/// The maximum number of per-channel mean and scale values.
pub const MAX_NORM_CHANNELS: usize = 4;

/// The color format of output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestFormat {
    Gray,
    Rgb,
    Bgr,
}

impl DestFormat {
    /// The number of channels per output pixel.
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb | Self::Bgr => 3,
        }
    }
}

impl Default for DestFormat {
    fn default() -> Self {
        Self::Rgb
    }
}

/// Image preprocessing options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub dest_format: DestFormat,
    /// The output height. Resizing is enabled only if both height and width are positive.
    #[serde(default)]
    pub resize_height: usize,
    /// The output width. Resizing is enabled only if both height and width are positive.
    #[serde(default)]
    pub resize_width: usize,
    /// Per-channel value added after scaling. Missing channels default to 0.
    #[serde(default)]
    pub mean: Vec<R64>,
    /// Per-channel multiplier. Missing channels default to 1.
    #[serde(default)]
    pub scale: Vec<R64>,
    /// The fraction of the original height and width to crop.
    #[serde(default = "default_crop_fraction")]
    pub crop_fraction: [R64; 2],
    /// If set, the crop window is placed randomly instead of at the center.
    #[serde(default)]
    pub random_crop: bool,
}

impl ImageConfig {
    pub fn validate(&self) -> Result<()> {
        let Self {
            ref mean,
            ref scale,
            crop_fraction,
            ..
        } = *self;

        for (name, fraction) in ["height", "width"].iter().zip(crop_fraction) {
            ensure_config!(
                fraction > 0.0 && fraction <= 1.0,
                "{} crop fraction must be in range (0, 1], but get {}",
                name,
                fraction
            );
        }
        ensure_config!(
            mean.len() <= MAX_NORM_CHANNELS,
            "at most {} mean values are allowed, but get {}",
            MAX_NORM_CHANNELS,
            mean.len()
        );
        ensure_config!(
            scale.len() <= MAX_NORM_CHANNELS,
            "at most {} scale values are allowed, but get {}",
            MAX_NORM_CHANNELS,
            scale.len()
        );

        Ok(())
    }

    /// The fixed output size, if resizing is enabled.
    pub fn resize_size(&self) -> Option<HW<usize>> {
        (self.resize_height > 0 && self.resize_width > 0)
            .then(|| HW::from_hw([self.resize_height, self.resize_width]))
    }

    /// The output size for an image of the given original size.
    pub fn dest_size(&self, orig_size: HW<usize>) -> HW<usize> {
        self.resize_size().unwrap_or(orig_size)
    }

    /// Whether any crop fraction differs from 1.0.
    pub fn is_cropped(&self) -> bool {
        self.crop_fraction
            .iter()
            .any(|fraction| (fraction.raw() - 1.0).abs() > CROP_FRACTION_EPSILON)
    }

    /// Per-channel mean and scale, padded to four channels.
    pub fn normalization(&self) -> ([f32; MAX_NORM_CHANNELS], [f32; MAX_NORM_CHANNELS]) {
        let mut mean = [0.0; MAX_NORM_CHANNELS];
        let mut scale = [1.0; MAX_NORM_CHANNELS];
        mean.iter_mut()
            .zip(&self.mean)
            .for_each(|(dst, src)| *dst = src.raw() as f32);
        scale
            .iter_mut()
            .zip(&self.scale)
            .for_each(|(dst, src)| *dst = src.raw() as f32);
        (mean, scale)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            dest_format: DestFormat::default(),
            resize_height: 0,
            resize_width: 0,
            mean: vec![],
            scale: vec![],
            crop_fraction: default_crop_fraction(),
            random_crop: false,
        }
    }
}

fn default_crop_fraction() -> [R64; 2] {
    [r64(1.0), r64(1.0)]
}

/// The dataset configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The directory that manifest image paths are relative to.
    pub image_dir: PathBuf,
    /// The manifest file listing image paths and labels.
    pub manifest_file: PathBuf,
    /// If set, all samples are materialized when the dataset is built.
    #[serde(default)]
    pub read_all_to_memory: bool,
    /// The seed of the random crop generator. It is seeded from entropy if not set.
    #[serde(default)]
    pub seed: Option<u64>,
    pub image: ImageConfig,
}

impl DatasetConfig {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = json5::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_owned(),
            source,
        })?;
        config.image.validate()?;
        Ok(config)
    }

    pub fn to_init(&self) -> ImageDatasetInit {
        let Self {
            ref image_dir,
            ref manifest_file,
            read_all_to_memory,
            seed,
            ref image,
        } = *self;

        ImageDatasetInit {
            image_dir: image_dir.clone(),
            manifest_file: manifest_file.clone(),
            image: image.clone(),
            read_all_to_memory,
            seed,
        }
    }
}
