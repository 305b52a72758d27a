use anyhow::Context;
use clap::Parser;
use gpscore::processing::TIME_SERIES_COLUMNS;
use gpscore::telemetry::LogManager;
use gpscore::{BinaryDataSet, GpsDataset, Observation};
use std::fs;
use std::path::{Path, PathBuf};
use workflow::config::{KernelKind, WorkflowConfig};
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline GPS time-series workflow driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Read observation records from a JSON array instead of generating them
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, default_value_t = 365)]
    samples: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = KernelKind::Velocity)]
    kernel: KernelKind,
    /// Displacement epoch for the displacement kernels
    #[arg(long)]
    split_time: Option<f64>,
    /// Difference against a synthetic reference station
    #[arg(long, default_value_t = false)]
    baseline: bool,
    /// Write the processed dataset in binary form
    #[arg(long)]
    output: Option<PathBuf>,
    /// Decode a binary dataset, print its time series and exit
    #[arg(long)]
    inspect: Option<PathBuf>,
}

fn load_observations(path: &Path) -> anyhow::Result<Vec<Observation>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading observations {}", path.display()))?;
    let points: Vec<Observation> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing observations {}", path.display()))?;
    Ok(points)
}

fn inspect(path: &Path) -> anyhow::Result<()> {
    let bytes = fs::read(path).with_context(|| format!("reading dataset {}", path.display()))?;
    let dataset = GpsDataset::from_binary(&bytes)
        .with_context(|| format!("decoding dataset {}", path.display()))?;
    LogManager::new().dump(&dataset);

    println!("{}", TIME_SERIES_COLUMNS.join("\t"));
    for point in dataset.iter_observations() {
        println!(
            "{}\t{}\t{:.5}\t{:.5}\t{:.5}\t{:.5}",
            point.time, point.rank, point.x, point.y, point.z, point.len
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = &args.inspect {
        return inspect(path);
    }

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.samples, args.seed, args.kernel, args.baseline)
    };
    if args.split_time.is_some() {
        workflow_config.split_time = args.split_time;
    }

    let runner = Runner::new(workflow_config);
    let points = match &args.input {
        Some(path) => load_observations(path)?,
        None => runner.generate()?,
    };
    let result = runner.execute(&points)?;

    let (lon, lat, height) = result.origin_llh;
    let (kernel_rows, kernel_cols) = result.kernel.shape();
    println!(
        "Processed {} rows about lon {:.6} lat {:.6} h {:.3} -> {:?} kernel {}x{} ({} non-zeros)",
        result.dataset.observations(),
        lon,
        lat,
        height,
        result.model,
        kernel_rows,
        kernel_cols,
        result.kernel.nnz()
    );
    println!(
        "Net ENU motion: e {:.4} n {:.4} u {:.4} m",
        result.net_enu[0], result.net_enu[1], result.net_enu[2]
    );

    if let Some(path) = &args.output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
        fs::write(path, &result.encoded)
            .with_context(|| format!("writing dataset {}", path.display()))?;
        println!("Wrote {} bytes to {}", result.encoded.len(), path.display());
    }

    Ok(())
}
