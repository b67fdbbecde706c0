//! Source region planning: full frame, center crop or random crop.

use crate::{common::*, config::ImageConfig, error::ensure_config, random::RandomSource};

/// The correspondence between a source quadrilateral and the destination grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correspondence {
    /// The sampled region in source pixel coordinates.
    pub src: Quad<f64>,
    /// The corners of the destination grid.
    pub dst: Quad<f64>,
}

impl Correspondence {
    /// The transform taking destination pixel coordinates to source pixel coordinates.
    ///
    /// Axis-aligned correspondences collapsed along an axis, such as a
    /// one-pixel crop or a one-pixel output, fall back to per-axis scaling.
    pub fn transform(&self) -> Result<Transform> {
        if let Some(transform) = Transform::from_quads(&self.dst, &self.src) {
            return Ok(transform);
        }

        match (self.dst.to_rect(), self.src.to_rect()) {
            (Some(dst), Some(src)) => {
                warn!("degenerate sampling quadrilateral, fallback to per-axis scaling");
                Ok(Transform::from_rects(&dst, &src))
            }
            _ => Err(Error::Configuration(format!(
                "degenerate sampling correspondence {:?}",
                self
            ))),
        }
    }
}

/// How destination pixels are sampled from the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPlan {
    pub dest_size: HW<usize>,
    /// `None` means the source is copied pixel by pixel without resampling.
    pub correspondence: Option<Correspondence>,
}

/// Computes the source sampling region of each image.
#[derive(Debug, Clone, PartialEq)]
pub struct CropPlanner {
    crop_fraction: Option<[f64; 2]>,
    random_crop: bool,
}

impl CropPlanner {
    pub fn new(config: &ImageConfig) -> Self {
        let crop_fraction = config
            .is_cropped()
            .then(|| config.crop_fraction.map(|fraction| fraction.raw()));

        Self {
            crop_fraction,
            random_crop: config.random_crop,
        }
    }

    /// Plan the sampling of an image of `orig_size` onto a `dest_size` grid.
    ///
    /// The random source is consulted only for random crops, height first.
    pub fn plan<R>(
        &self,
        orig_size: HW<usize>,
        dest_size: HW<usize>,
        rng: &mut R,
    ) -> Result<SamplingPlan>
    where
        R: RandomSource + ?Sized,
    {
        let dst = grid_corners(dest_size)?;

        let src = match self.crop_fraction {
            Some([fraction_h, fraction_w]) => {
                let [orig_h, orig_w] = orig_size.hw();
                let crop_h = (orig_h as f64 * fraction_h).floor() as usize;
                let crop_w = (orig_w as f64 * fraction_w).floor() as usize;
                ensure_config!(
                    crop_h > 0 && crop_w > 0,
                    "crop size {}x{} of image size {}x{} must be positive",
                    crop_h,
                    crop_w,
                    orig_h,
                    orig_w
                );
                ensure_config!(
                    crop_h <= orig_h && crop_w <= orig_w,
                    "crop size {}x{} exceeds image size {}x{}",
                    crop_h,
                    crop_w,
                    orig_h,
                    orig_w
                );

                let max_start_h = orig_h - crop_h;
                let max_start_w = orig_w - crop_w;
                let (start_h, start_w) = if self.random_crop {
                    let start_h = rng.uniform_int(0, max_start_h);
                    let start_w = rng.uniform_int(0, max_start_w);
                    (start_h, start_w)
                } else {
                    (max_start_h / 2, max_start_w / 2)
                };

                Some(pixel_rect_corners(start_h, start_w, crop_h, crop_w)?)
            }
            None if dest_size != orig_size => {
                let [orig_h, orig_w] = orig_size.hw();
                Some(pixel_rect_corners(0, 0, orig_h, orig_w)?)
            }
            None => None,
        };

        Ok(SamplingPlan {
            dest_size,
            correspondence: src.map(|src| Correspondence { src, dst }),
        })
    }
}

/// The corners of a `size` pixel grid.
fn grid_corners(size: HW<usize>) -> Result<Quad<f64>> {
    let [h, w] = size.hw();
    pixel_rect_corners(0, 0, h, w)
}

fn pixel_rect_corners(top: usize, left: usize, height: usize, width: usize) -> Result<Quad<f64>> {
    let rect = TLBR::try_from_pixel_extent(top, left, height, width)
        .map_err(|err| Error::Configuration(err.to_string()))?;
    rect.corners()
        .try_cast()
        .ok_or_else(|| Error::Configuration(format!("cannot represent {:?} in floats", rect)))
}
