//! Resampling, color conversion and normalization of decoded images.

use crate::{
    codec::DecodedImage,
    common::*,
    config::{DestFormat, ImageConfig, MAX_NORM_CHANNELS},
    crop::SamplingPlan,
    error::ensure_config,
};

/// Luma weights of the red, green and blue components.
const GRAY_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Writes normalized destination pixels in HWC order.
///
/// Source coordinates outside the image are clamped to the nearest edge pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Resampler {
    dest_format: DestFormat,
    mean: [f32; MAX_NORM_CHANNELS],
    scale: [f32; MAX_NORM_CHANNELS],
}

impl Resampler {
    pub fn new(config: &ImageConfig) -> Self {
        let (mean, scale) = config.normalization();
        Self {
            dest_format: config.dest_format,
            mean,
            scale,
        }
    }

    /// The number of channels per destination pixel.
    pub fn channels(&self) -> usize {
        self.dest_format.channels()
    }

    /// Fill `dst` with the destination grid described by `plan`.
    ///
    /// `dst` must hold exactly `height * width * channels` values.
    pub fn resample(&self, src: &DecodedImage, plan: &SamplingPlan, dst: &mut [f32]) -> Result<()> {
        let [dest_h, dest_w] = plan.dest_size.hw();
        let channels = self.channels();
        ensure_config!(
            dest_h > 0 && dest_w > 0,
            "destination size {}x{} is empty",
            dest_h,
            dest_w
        );
        ensure_config!(
            dst.len() == dest_h * dest_w * channels,
            "destination buffer holds {} values, but {}x{}x{} are required",
            dst.len(),
            dest_h,
            dest_w,
            channels
        );

        let correspondence = match plan.correspondence {
            Some(correspondence) => correspondence,
            None => {
                ensure_config!(
                    plan.dest_size == src.size(),
                    "direct pass requires equal sizes, but get source {:?} and destination {:?}",
                    src.size(),
                    plan.dest_size
                );
                dst.chunks_exact_mut(channels)
                    .zip(src.pixels().chunks_exact(DecodedImage::CHANNELS))
                    .for_each(|(out, rgba)| {
                        let rgba = [rgba[0], rgba[1], rgba[2], rgba[3]].map(f32::from);
                        self.write_pixel(rgba, out);
                    });
                return Ok(());
            }
        };

        // derive the coefficients once per image
        let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] =
            correspondence.transform()?.matrix();

        dst.chunks_exact_mut(dest_w * channels)
            .enumerate()
            .for_each(|(row, row_buf)| {
                let y = row as f64;
                let base_x = m01 * y + m02;
                let base_y = m11 * y + m12;
                let base_w = m21 * y + m22;

                row_buf
                    .chunks_exact_mut(channels)
                    .enumerate()
                    .for_each(|(col, out)| {
                        let x = col as f64;
                        let w = m20 * x + base_w;
                        let src_x = (m00 * x + base_x) / w;
                        let src_y = (m10 * x + base_y) / w;
                        let rgba = sample_bilinear(src, src_x, src_y);
                        self.write_pixel(rgba, out);
                    });
            });

        Ok(())
    }

    /// Convert one RGBA value to the destination format and normalize it.
    fn write_pixel(&self, rgba: [f32; 4], out: &mut [f32]) {
        let [r, g, b, _a] = rgba;
        match self.dest_format {
            DestFormat::Gray => {
                let [wr, wg, wb] = GRAY_WEIGHTS;
                out[0] = (wr * r + wg * g + wb * b) * self.scale[0] + self.mean[0];
            }
            DestFormat::Rgb => self.write_components([r, g, b], out),
            DestFormat::Bgr => self.write_components([b, g, r], out),
        }
    }

    fn write_components(&self, components: [f32; 3], out: &mut [f32]) {
        out.iter_mut()
            .zip(components)
            .zip(self.scale.iter().zip(&self.mean))
            .for_each(|((out, value), (scale, mean))| *out = value * scale + mean);
    }
}

/// Bilinear interpolation of the RGBA source at `(x, y)`, clamped to the edges.
fn sample_bilinear(src: &DecodedImage, x: f64, y: f64) -> [f32; 4] {
    let width = src.width();
    let height = src.height();

    let clamp = |value: f64, len: usize| {
        let value = if value.is_finite() { value } else { 0.0 };
        value.clamp(0.0, (len - 1) as f64)
    };
    let x = clamp(x, width);
    let y = clamp(y, height);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let p00 = src.pixel(x0, y0);
    let p10 = src.pixel(x1, y0);
    let p01 = src.pixel(x0, y1);
    let p11 = src.pixel(x1, y1);

    let mut rgba = [0.0; 4];
    rgba.iter_mut().enumerate().for_each(|(index, out)| {
        *out = (1.0 - fx) * (1.0 - fy) * f32::from(p00[index])
            + fx * (1.0 - fy) * f32::from(p10[index])
            + (1.0 - fx) * fy * f32::from(p01[index])
            + fx * fy * f32::from(p11[index]);
    });
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::{Correspondence, CropPlanner};
    use approx::assert_abs_diff_eq;

    /// A `width` x `height` image whose red component is `10 * y + x`, green
    /// is `100 + red`, blue is `200 - red` and alpha is 255.
    fn gradient_image(width: usize, height: usize) -> DecodedImage {
        let pixels: Vec<u8> = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .flat_map(|(x, y)| {
                let red = (10 * y + x) as u8;
                [red, 100 + red, 200 - red, 255]
            })
            .collect();
        DecodedImage::from_rgba(width, height, pixels).unwrap()
    }

    fn plan_for(config: &ImageConfig, src: &DecodedImage) -> SamplingPlan {
        let mut rng = StdRng::seed_from_u64(0);
        CropPlanner::new(config)
            .plan(src.size(), config.dest_size(src.size()), &mut rng)
            .unwrap()
    }

    fn run(config: &ImageConfig, src: &DecodedImage) -> Vec<f32> {
        let plan = plan_for(config, src);
        let resampler = Resampler::new(config);
        let [h, w] = plan.dest_size.hw();
        let mut dst = vec![0.0; h * w * resampler.channels()];
        resampler.resample(src, &plan, &mut dst).unwrap();
        dst
    }

    fn assert_all_eq(lhs: &[f32], rhs: &[f32]) {
        assert_eq!(lhs.len(), rhs.len());
        lhs.iter()
            .zip(rhs)
            .for_each(|(lhs, rhs)| assert_abs_diff_eq!(*lhs, *rhs, epsilon = 1e-3));
    }

    #[test]
    fn direct_pass_rgb_and_bgr() {
        let src = gradient_image(3, 2);
        let rgb = run(&ImageConfig::default(), &src);
        let bgr = run(
            &ImageConfig {
                dest_format: DestFormat::Bgr,
                ..Default::default()
            },
            &src,
        );

        assert_eq!(rgb.len(), 3 * 2 * 3);
        // pixel (x = 2, y = 1): red 12
        assert_eq!(&rgb[15..18], &[12.0, 112.0, 188.0]);
        assert_eq!(&bgr[15..18], &[188.0, 112.0, 12.0]);

        rgb.chunks(3).zip(bgr.chunks(3)).for_each(|(rgb, bgr)| {
            assert_eq!(rgb[0], bgr[2]);
            assert_eq!(rgb[1], bgr[1]);
            assert_eq!(rgb[2], bgr[0]);
        });
    }

    #[test]
    fn gray_uses_luma() {
        let pixels = vec![255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 80, 80, 80, 0];
        let src = DecodedImage::from_rgba(2, 2, pixels).unwrap();
        let gray = run(
            &ImageConfig {
                dest_format: DestFormat::Gray,
                ..Default::default()
            },
            &src,
        );
        assert_all_eq(&gray, &[0.299 * 255.0, 0.587 * 255.0, 0.114 * 255.0, 80.0]);
    }

    #[test]
    fn normalization_scales_then_adds_mean() {
        let src = gradient_image(2, 1);
        let config = ImageConfig {
            mean: vec![r64(-1.0), r64(-2.0), r64(-3.0)],
            scale: vec![r64(0.5), r64(0.25), r64(2.0)],
            ..Default::default()
        };
        let out = run(&config, &src);
        assert_all_eq(
            &out,
            &[
                0.0 * 0.5 - 1.0,
                100.0 * 0.25 - 2.0,
                200.0 * 2.0 - 3.0,
                1.0 * 0.5 - 1.0,
                101.0 * 0.25 - 2.0,
                199.0 * 2.0 - 3.0,
            ],
        );
    }

    #[test]
    fn upsample_interpolates() {
        let src = gradient_image(2, 2);
        let config = ImageConfig {
            resize_height: 3,
            resize_width: 3,
            ..Default::default()
        };
        let out = run(&config, &src);
        let red: Vec<f32> = out.chunks(3).map(|pixel| pixel[0]).collect();

        // source red values are 0, 1 on the first row and 10, 11 on the second
        assert_all_eq(&red, &[0.0, 0.5, 1.0, 5.0, 5.5, 6.0, 10.0, 10.5, 11.0]);
    }

    #[test]
    fn center_crop_and_resize_picks_inner_pixels() {
        let src = gradient_image(4, 4);
        let config = ImageConfig {
            resize_height: 2,
            resize_width: 2,
            crop_fraction: [r64(0.5), r64(0.5)],
            ..Default::default()
        };
        let out = run(&config, &src);
        let red: Vec<f32> = out.chunks(3).map(|pixel| pixel[0]).collect();
        assert_all_eq(&red, &[11.0, 12.0, 21.0, 22.0]);
    }

    #[test]
    fn out_of_bounds_is_clamped() {
        let src = gradient_image(3, 3);
        let plan = SamplingPlan {
            dest_size: HW::from_hw([2, 2]),
            correspondence: Some(Correspondence {
                src: TLBR::try_from_tlbr([-5.0, -5.0, 10.0, 10.0]).unwrap().corners(),
                dst: TLBR::try_from_tlbr([0.0, 0.0, 1.0, 1.0]).unwrap().corners(),
            }),
        };
        let resampler = Resampler::new(&ImageConfig::default());
        let mut dst = vec![0.0; 2 * 2 * 3];
        resampler.resample(&src, &plan, &mut dst).unwrap();

        let red: Vec<f32> = dst.chunks(3).map(|pixel| pixel[0]).collect();
        assert_all_eq(&red, &[0.0, 2.0, 20.0, 22.0]);
    }

    #[test]
    fn perspective_corners_hit_source_corners() {
        let src = gradient_image(5, 5);
        let plan = SamplingPlan {
            dest_size: HW::from_hw([4, 4]),
            correspondence: Some(Correspondence {
                src: Quad::from_points([
                    Point::new(0.0, 0.0),
                    Point::new(1.0, 4.0),
                    Point::new(4.0, 1.0),
                    Point::new(3.0, 3.0),
                ]),
                dst: TLBR::try_from_tlbr([0.0, 0.0, 3.0, 3.0]).unwrap().corners(),
            }),
        };
        let resampler = Resampler::new(&ImageConfig::default());
        let mut dst = vec![0.0; 4 * 4 * 3];
        resampler.resample(&src, &plan, &mut dst).unwrap();

        let red = |x: usize, y: usize| dst[(y * 4 + x) * 3];
        assert_abs_diff_eq!(red(0, 0), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(red(0, 3), 41.0, epsilon = 1e-3);
        assert_abs_diff_eq!(red(3, 0), 14.0, epsilon = 1e-3);
        assert_abs_diff_eq!(red(3, 3), 33.0, epsilon = 1e-3);
    }

    #[test]
    fn buffer_size_mismatch() {
        let src = gradient_image(2, 2);
        let config = ImageConfig::default();
        let plan = plan_for(&config, &src);
        let mut dst = vec![0.0; 5];
        let result = Resampler::new(&config).resample(&src, &plan, &mut dst);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
