use gpscore::math::{llh2xyz, MatrixHelper};
use gpscore::processing::SECONDS_PER_YEAR;
use gpscore::Observation;
use ndarray::{arr1, Array2};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// Geodetic station position, degrees and metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    pub lon: f64,
    pub lat: f64,
    pub height: f64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            lon: -155.2869,
            lat: 19.4069,
            height: 1_100.0,
        }
    }
}

/// Instantaneous offset applied to every epoch at or after `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    pub time: f64,
    /// East, north, up metres.
    pub offset: [f64; 3],
}

/// Configuration for generating a synthetic daily station series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub samples: usize,
    pub interval_secs: f64,
    pub start_time: f64,
    pub seed: u64,
    /// One-sigma white noise per ENU axis, metres.
    pub noise_m: f64,
    pub station: StationConfig,
    /// East, north, up metres per year.
    pub velocity_m_per_yr: [f64; 3],
    pub step: Option<StepConfig>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples: 365,
            interval_secs: 86_400.0,
            start_time: 6.0e8,
            seed: 0,
            noise_m: 0.003,
            station: StationConfig::default(),
            velocity_m_per_yr: [0.02, -0.01, 0.005],
            step: None,
        }
    }
}

impl GeneratorConfig {
    /// A stable reference site near `station`: no motion, no step, independent noise.
    pub fn reference_for(&self, station: StationConfig) -> Self {
        Self {
            seed: self.seed.wrapping_add(1),
            station,
            velocity_m_per_yr: [0.0; 3],
            step: None,
            ..self.clone()
        }
    }

    pub fn time_at(&self, index: usize) -> f64 {
        self.start_time + index as f64 * self.interval_secs
    }
}

fn enu_displacement(config: &GeneratorConfig, time: f64, rng: &mut StdRng) -> [f64; 3] {
    let years = (time - config.start_time) / SECONDS_PER_YEAR;
    let mut displacement = [0.0; 3];
    for (axis, value) in displacement.iter_mut().enumerate() {
        *value = config.velocity_m_per_yr[axis] * years;
        if let Some(step) = config.step {
            if time >= step.time {
                *value += step.offset[axis];
            }
        }
        if config.noise_m > 0.0 {
            let z: f64 = StandardNormal.sample(rng);
            *value += config.noise_m * z;
        }
    }
    displacement
}

/// Builds an ECEF observation series whose ENU motion follows `config`.
pub fn build_station_series(config: &GeneratorConfig) -> anyhow::Result<Vec<Observation>> {
    if config.samples == 0 {
        anyhow::bail!("generator needs at least one sample");
    }
    log::debug!(
        "generating {} epochs ending at {}",
        config.samples,
        config.time_at(config.samples - 1)
    );

    let StationConfig { lon, lat, height } = config.station;
    let (x0, y0, z0) = llh2xyz(lon, lat, height);
    let rotation = MatrixHelper::enu_rotation(lon, lat);
    let to_ecef = rotation.t();

    let variance = config.noise_m * config.noise_m;
    let enu_cov = Array2::from_diag(&arr1(&[variance, variance, variance]));
    let ecef_cov = MatrixHelper::congruence(to_ecef, enu_cov.view());
    let packed = MatrixHelper::pack_covariance(ecef_cov.view());

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut points = Vec::with_capacity(config.samples);
    for index in 0..config.samples {
        let time = config.time_at(index);
        let enu = arr1(&enu_displacement(config, time, &mut rng));
        let delta = to_ecef.dot(&enu);
        points.push(
            Observation::new(time, 1.0, [x0 + delta[0], y0 + delta[1], z0 + delta[2]])
                .with_covariance(packed),
        );
    }
    Ok(points)
}
