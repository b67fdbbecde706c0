//! Turns a manifest entry into a sample.

use crate::{
    codec::ImageCodec,
    common::*,
    config::ImageConfig,
    crop::CropPlanner,
    dataset::Sample,
    manifest::ManifestEntry,
    profiling::{Stage, StageTimes},
    random::SharedRng,
    resample::Resampler,
};
use derivative::Derivative;
use std::sync::PoisonError;

/// Decodes, crops, resamples and normalizes images, and builds label tensors.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Materializer {
    config: ImageConfig,
    planner: CropPlanner,
    resampler: Resampler,
    codec: Arc<dyn ImageCodec>,
    #[derivative(Debug = "ignore")]
    rng: SharedRng,
}

impl Materializer {
    pub fn new(config: ImageConfig, codec: Arc<dyn ImageCodec>, rng: SharedRng) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            planner: CropPlanner::new(&config),
            resampler: Resampler::new(&config),
            config,
            codec,
            rng,
        })
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Materialize the sample of `entry`.
    ///
    /// The output shape only depends on the configuration and the image size.
    /// With random crops enabled the pixel content differs between calls.
    pub fn materialize(&self, entry: &ManifestEntry) -> Result<Sample> {
        let ManifestEntry { image_path, labels } = entry;
        let mut times = StageTimes::start();

        // the decoded buffer is released when this function returns
        let decoded = self
            .codec
            .decode(image_path)
            .map_err(|source| Error::Decode {
                path: image_path.clone(),
                source,
            })?;
        times.finish(Stage::Decode);

        let orig_size = decoded.size();
        let dest_size = self.config.dest_size(orig_size);
        let plan = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            self.planner.plan(orig_size, dest_size, &mut *rng)?
        };
        times.finish(Stage::Plan);

        let [dest_h, dest_w] = dest_size.hw();
        let channels = self.resampler.channels();
        let mut pixels = vec![0f32; dest_h * dest_w * channels];
        self.resampler.resample(&decoded, &plan, &mut pixels)?;
        drop(decoded);
        times.finish(Stage::Resample);

        let image = Tensor::f_of_slice(&pixels)?.view([
            dest_h as i64,
            dest_w as i64,
            channels as i64,
        ]);
        let labels = Tensor::f_of_slice(labels)?;
        times.finish(Stage::Tensor);
        times.report(image_path);

        debug!(
            "materialized '{}' from {}x{} to {}x{}x{}",
            image_path.display(),
            orig_size.h(),
            orig_size.w(),
            dest_h,
            dest_w,
            channels
        );

        Ok(Sample { image, labels })
    }
}
