use crate::data::GpsDataset;
use log::{debug, info, log_enabled, Level};

pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    /// Writes the row-by-row dump of `dataset` at debug level.
    pub fn dump(&self, dataset: &GpsDataset) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        debug!(
            "dataset: {} rows in {}",
            dataset.observations(),
            dataset.frame()
        );
        for line in dataset.debug_dump().lines() {
            debug!("{}", line);
        }
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
