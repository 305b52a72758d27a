use crate::generator::profile::build_station_series;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use gpscore::math::{xyz2llh, BlockMatrix};
use gpscore::processing::KernelModel;
use gpscore::telemetry::LogManager;
use gpscore::{BinaryDataSet, GpsDataset, Observation};

pub struct WorkflowResult {
    pub dataset: GpsDataset,
    /// Longitude, latitude (degrees) and height of the ENU origin.
    pub origin_llh: (f64, f64, f64),
    pub model: KernelModel,
    pub kernel: BlockMatrix,
    pub encoded: Vec<u8>,
    /// Last minus first ENU position.
    pub net_enu: [f64; 3],
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Synthetic series for the configured station.
    pub fn generate(&self) -> anyhow::Result<Vec<Observation>> {
        build_station_series(&self.config.generator).context("generating station series")
    }

    pub fn execute(&self, points: &[Observation]) -> anyhow::Result<WorkflowResult> {
        let logger = LogManager::new();
        let mut dataset =
            GpsDataset::from_observations(points).context("building dataset from observations")?;

        let [x, y, z] = dataset.origin();
        let origin_llh = xyz2llh(x, y, z);

        if let Some(station) = self.config.baseline {
            let reference = self.config.generator.reference_for(station);
            let reference_points =
                build_station_series(&reference).context("generating baseline series")?;
            let baseline = GpsDataset::from_observations(&reference_points)
                .context("building baseline dataset")?;
            dataset
                .apply_baseline(&baseline)
                .context("applying baseline")?;
            logger.record(&format!(
                "baseline applied: {} of {} rows kept",
                dataset.observations(),
                points.len()
            ));
        }

        dataset
            .to_enu(origin_llh.0, origin_llh.1)
            .context("converting to ENU")?;

        let rows = dataset.observations();
        let first = dataset.time(0);
        let last = dataset.time(rows - 1);
        let model = self.config.kernel_model(first, last);
        let kernel = dataset.kernel(model);
        let (kernel_rows, kernel_cols) = kernel.shape();
        logger.record(&format!(
            "{:?} kernel {}x{} with {} non-zeros",
            model,
            kernel_rows,
            kernel_cols,
            kernel.nnz()
        ));

        let start = dataset.position(0);
        let end = dataset.position(rows - 1);
        let net_enu = [end[0] - start[0], end[1] - start[1], end[2] - start[2]];

        logger.dump(&dataset);
        let encoded = dataset.to_binary().context("encoding dataset")?;

        Ok(WorkflowResult {
            dataset,
            origin_llh,
            model,
            kernel,
            encoded,
            net_enu,
        })
    }
}
