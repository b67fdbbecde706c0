use anyhow::{Context, Result};
use clap::Parser;
use image_dataset::{DatasetConfig, ImageDataset, RandomAccessDataset};
use itertools::Itertools as _;
use log::info;
use prettytable::{cell, row, Table};
use std::path::{Path, PathBuf};
use tch::Tensor;

#[derive(Debug, Clone, Parser)]
enum Opts {
    /// Print the path, shape and labels of samples
    Info {
        /// dataset configuration file
        config_file: PathBuf,
        /// maximum number of samples to print
        #[clap(long, default_value = "10")]
        limit: usize,
    },
    /// Print per-channel mean and standard deviation over all samples
    Stats {
        /// dataset configuration file
        config_file: PathBuf,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::formatted_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    match Opts::parse() {
        Opts::Info { config_file, limit } => {
            info_cmd(&config_file, limit)?;
        }
        Opts::Stats { config_file } => {
            stats_cmd(&config_file)?;
        }
    }

    Ok(())
}

fn load_dataset(config_file: &Path) -> Result<ImageDataset> {
    let config = DatasetConfig::open(config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;
    let dataset = config.to_init().build().with_context(|| {
        format!(
            "failed to build dataset from manifest '{}'",
            config.manifest_file.display()
        )
    })?;
    Ok(dataset)
}

fn info_cmd(config_file: &Path, limit: usize) -> Result<()> {
    let dataset = load_dataset(config_file)?;

    let mut table = Table::new();
    table.add_row(row!["index", "path", "shape", "labels"]);

    for (index, entry) in dataset.entries().iter().enumerate().take(limit) {
        let sample = dataset.get(index)?;
        table.add_row(row![
            index,
            entry.image_path.display(),
            format!("{:?}", sample.image.size()),
            entry.labels.iter().join(","),
        ]);
    }

    table.printstd();
    info!("{} of {} samples listed", limit.min(dataset.size()), dataset.size());

    Ok(())
}

fn stats_cmd(config_file: &Path) -> Result<()> {
    let dataset = load_dataset(config_file)?;
    let channels = dataset.image_config().dest_format.channels();
    let mut stats = ChannelStats::new(channels);

    for (index, sample) in dataset.iter().enumerate() {
        let sample = sample.with_context(|| {
            format!(
                "failed to load '{}'",
                dataset.entries()[index].image_path.display()
            )
        })?;
        stats.add(&sample.image);
    }

    let mut table = Table::new();
    table.add_row(row!["channel", "mean", "std"]);
    for (channel, (mean, std)) in stats.summary().into_iter().enumerate() {
        table.add_row(row![channel, format!("{:.6}", mean), format!("{:.6}", std)]);
    }
    table.printstd();
    info!("{} pixels from {} samples", stats.count, dataset.size());

    #[cfg(feature = "profiling")]
    print_stage_totals();

    Ok(())
}

#[cfg(feature = "profiling")]
fn print_stage_totals() {
    let mut table = Table::new();
    table.add_row(row!["stage", "samples", "total", "mean"]);
    for (stage, total) in image_dataset::profiling::stage_totals() {
        let mean = total.elapsed / total.count.max(1) as u32;
        table.add_row(row![
            stage.name(),
            total.count,
            format!("{:?}", total.elapsed),
            format!("{:?}", mean)
        ]);
    }
    table.printstd();
}

/// Running per-channel sums of HWC pixel tensors.
#[derive(Debug, Clone)]
struct ChannelStats {
    count: usize,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl ChannelStats {
    fn new(channels: usize) -> Self {
        Self {
            count: 0,
            sum: vec![0.0; channels],
            sum_sq: vec![0.0; channels],
        }
    }

    fn add(&mut self, image: &Tensor) {
        let channels = self.sum.len();
        let pixels = Vec::<f32>::from(&image.view([-1]));

        for pixel in pixels.chunks_exact(channels) {
            for (channel, &value) in pixel.iter().enumerate() {
                let value = value as f64;
                self.sum[channel] += value;
                self.sum_sq[channel] += value * value;
            }
        }
        self.count += pixels.len() / channels;
    }

    /// Mean and population standard deviation per channel.
    fn summary(&self) -> Vec<(f64, f64)> {
        if self.count == 0 {
            return vec![(0.0, 0.0); self.sum.len()];
        }
        let count = self.count as f64;

        self.sum
            .iter()
            .zip(&self.sum_sq)
            .map(|(&sum, &sum_sq)| {
                let mean = sum / count;
                let var = (sum_sq / count - mean * mean).max(0.0);
                (mean, var.sqrt())
            })
            .collect()
    }
}
