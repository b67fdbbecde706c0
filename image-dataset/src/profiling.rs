//! Stage timings of sample materialization.
//!
//! Timings are always measured. They are logged and accumulated only with the
//! `profiling` feature, where `IMAGE_DATASET_PROFILING_STAGES` (comma-separated
//! stage names) restricts which stages are reported.

use crate::common::*;

/// A step of turning a manifest entry into a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Decode,
    Plan,
    Resample,
    Tensor,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Decode, Stage::Plan, Stage::Resample, Stage::Tensor];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::Plan => "plan",
            Self::Resample => "resample",
            Self::Tensor => "tensor",
        }
    }
}

/// Elapsed time per stage for one sample.
#[derive(Debug, Clone)]
pub struct StageTimes {
    since: Instant,
    elapsed: Vec<(Stage, Duration)>,
}

impl StageTimes {
    pub fn start() -> Self {
        Self {
            since: Instant::now(),
            elapsed: vec![],
        }
    }

    /// Record `stage` as the time since the previous stage finished.
    pub fn finish(&mut self, stage: Stage) {
        let now = Instant::now();
        self.elapsed.push((stage, now - self.since));
        self.since = now;
    }

    pub fn elapsed(&self) -> &[(Stage, Duration)] {
        &self.elapsed
    }

    pub fn total(&self) -> Duration {
        self.elapsed.iter().map(|(_, elapsed)| *elapsed).sum()
    }

    /// Report the timings of the sample loaded from `image_path`.
    pub fn report(&self, image_path: &Path) {
        #[cfg(feature = "profiling")]
        {
            self.elapsed.iter().for_each(|&(stage, elapsed)| {
                let mut total = STAGE_TOTALS.entry(stage).or_default();
                total.count += 1;
                total.elapsed += elapsed;
            });

            let stages = self
                .elapsed
                .iter()
                .filter(|(stage, _)| PROFILING_CONFIG.reports(*stage))
                .map(|(stage, elapsed)| format!("{} {:?}", stage.name(), elapsed))
                .join(", ");
            if !stages.is_empty() {
                info!("'{}' took {:?}: {}", image_path.display(), self.total(), stages);
            }
        }

        #[cfg(not(feature = "profiling"))]
        let _ = image_path;
    }
}

#[cfg(feature = "profiling")]
pub use accumulate::*;

#[cfg(feature = "profiling")]
mod accumulate {
    use super::*;
    use dashmap::DashMap;

    lazy_static! {
        pub(super) static ref PROFILING_CONFIG: ProfilingConfig =
            match envy::prefixed("IMAGE_DATASET_").from_env() {
                Ok(config) => config,
                Err(err) => {
                    warn!("ignore invalid profiling environment variables: {}", err);
                    ProfilingConfig::default()
                }
            };
        pub(super) static ref STAGE_TOTALS: DashMap<Stage, StageTotal> = DashMap::new();
    }

    /// Profiling options read from `IMAGE_DATASET_*` environment variables.
    #[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
    pub struct ProfilingConfig {
        /// Stage names to report. All stages are reported if unset.
        pub profiling_stages: Option<HashSet<String>>,
    }

    impl ProfilingConfig {
        pub fn reports(&self, stage: Stage) -> bool {
            self.profiling_stages
                .as_ref()
                .map(|stages| stages.contains(stage.name()))
                .unwrap_or(true)
        }
    }

    /// Accumulated time of one stage over all reported samples.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StageTotal {
        pub count: usize,
        pub elapsed: Duration,
    }

    /// Accumulated stage timings since the process started, in stage order.
    pub fn stage_totals() -> Vec<(Stage, StageTotal)> {
        Stage::ALL
            .iter()
            .map(|&stage| {
                let total = STAGE_TOTALS
                    .get(&stage)
                    .map(|total| *total)
                    .unwrap_or_default();
                (stage, total)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_recorded_in_order() {
        let mut times = StageTimes::start();
        times.finish(Stage::Decode);
        std::thread::sleep(Duration::from_millis(2));
        times.finish(Stage::Resample);

        let stages: Vec<_> = times.elapsed().iter().map(|(stage, _)| *stage).collect();
        assert_eq!(stages, vec![Stage::Decode, Stage::Resample]);
        assert!(times.elapsed()[1].1 >= Duration::from_millis(2));
        assert_eq!(times.total(), times.elapsed()[0].1 + times.elapsed()[1].1);
    }

    #[cfg(feature = "profiling")]
    #[test]
    fn stage_filter() {
        let config = ProfilingConfig {
            profiling_stages: Some(["decode".to_string()].into_iter().collect()),
        };
        assert!(config.reports(Stage::Decode));
        assert!(!config.reports(Stage::Resample));
        assert!(ProfilingConfig::default().reports(Stage::Tensor));
    }

    #[cfg(feature = "profiling")]
    #[test]
    fn report_accumulates_totals() {
        let count_of = |stage| {
            stage_totals()
                .into_iter()
                .find(|(other, _)| *other == stage)
                .map(|(_, total)| total.count)
                .unwrap()
        };
        let before = count_of(Stage::Plan);

        let mut times = StageTimes::start();
        times.finish(Stage::Plan);
        times.report(Path::new("a.png"));

        assert!(count_of(Stage::Plan) > before);
    }
}
