use crate::generator::profile::{GeneratorConfig, StationConfig};
use anyhow::Context;
use clap::ValueEnum;
use gpscore::processing::KernelModel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which design matrix the workflow builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    Velocity,
    Displacement,
    Detrended,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub generator: GeneratorConfig,
    /// Reference station to difference against; `None` keeps absolute positions.
    pub baseline: Option<StationConfig>,
    pub kernel: KernelKind,
    /// Displacement epoch; defaults to the midpoint of the series.
    pub split_time: Option<f64>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            baseline: None,
            kernel: KernelKind::Velocity,
            split_time: None,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(samples: usize, seed: u64, kernel: KernelKind, baseline: bool) -> Self {
        let generator = GeneratorConfig {
            samples,
            seed,
            ..Default::default()
        };
        let baseline = baseline.then(|| {
            let mut reference = generator.station;
            reference.lon += 0.05;
            reference.lat += 0.05;
            reference
        });
        Self {
            generator,
            baseline,
            kernel,
            split_time: None,
        }
    }

    /// Resolves the kernel selection against a series spanning `first..=last`.
    pub fn kernel_model(&self, first: f64, last: f64) -> KernelModel {
        let split = self.split_time.unwrap_or(first + (last - first) / 2.0);
        match self.kernel {
            KernelKind::Velocity => KernelModel::Velocity,
            KernelKind::Displacement => KernelModel::Displacement { split },
            KernelKind::Detrended => KernelModel::DetrendedDisplacement { split },
        }
    }
}
