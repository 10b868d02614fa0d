use std::fs::{self, File};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;

use pitwall::config::AppConfig;
use pitwall::{
    PitwallError, Prediction, RecordDraft, RiskProfileClassifier, RuleClassifier,
    SensorEstimator, StrategyClassifier, TelemetryGenerator, TireState, dataset,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Generate {
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        #[arg(short, long)]
        seed: Option<u64>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        edge_output: Option<PathBuf>,
    },
    EdgeCases {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    Predict {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        lap: Option<u32>,

        #[arg(short, long)]
        seed: Option<u64>,

        #[arg(long)]
        approximate: bool,
    },
    Config {
        #[arg(long)]
        samples: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long)]
        edge_output: Option<PathBuf>,
    },
}

fn ensure_parent_dir(path: &Path) -> Result<(), PitwallError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PitwallError::DatasetWriteError { source: e })?;
        }
    }
    Ok(())
}

fn generate(
    config: &AppConfig,
    samples: Option<usize>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    edge_output: Option<PathBuf>,
) -> Result<(), PitwallError> {
    let count = samples.unwrap_or(config.default_samples);
    let seed = seed.unwrap_or(config.default_seed);
    let dataset_path = output.unwrap_or_else(|| config.dataset_path.clone());
    let edge_path = edge_output.unwrap_or_else(|| config.edge_case_path.clone());

    info!("generating {count} samples with seed {seed}");
    let batch = TelemetryGenerator::new(seed).generate(count);
    ensure_parent_dir(&dataset_path)?;
    dataset::write_samples(&dataset_path, &batch)?;
    info!("wrote training dataset to {}", dataset_path.display());

    let fixtures = TelemetryGenerator::generate_edge_cases();
    ensure_parent_dir(&edge_path)?;
    dataset::write_samples(&edge_path, &fixtures)?;
    info!(
        "wrote {} edge-case fixtures to {}",
        fixtures.len(),
        edge_path.display()
    );

    print!("{}", dataset::DatasetSummary::from_samples(&batch));
    Ok(())
}

fn edge_cases(config: &AppConfig, output: Option<PathBuf>) -> Result<(), PitwallError> {
    let edge_path = output.unwrap_or_else(|| config.edge_case_path.clone());
    let fixtures = TelemetryGenerator::generate_edge_cases();
    ensure_parent_dir(&edge_path)?;
    dataset::write_samples(&edge_path, &fixtures)?;
    for fixture in &fixtures {
        if let Some(name) = &fixture.scenario_name {
            println!("{name}: {}", fixture.strategy);
        }
    }
    info!("wrote {} fixtures to {}", fixtures.len(), edge_path.display());
    Ok(())
}

/// Completes the draft into a classifiable record, estimating the sensor
/// channels when the record only carries what the cameras saw.
fn complete_record(
    draft: &RecordDraft,
    seed: u64,
) -> Result<(TireState, bool), PitwallError> {
    if draft.has_sensor_fields() {
        return Ok((draft.complete()?, false));
    }
    let (observation, lap_number) = draft.observation()?;
    let mut estimator = SensorEstimator::new(seed);
    let state = estimator.complete(&observation, lap_number)?;
    Ok((state, true))
}

fn print_report(state: &TireState, prediction: &Prediction, estimated: bool) {
    let spec = state.compound.spec();
    println!(
        "tire:        {} (lap {} of {})",
        state.compound, state.lap_number, spec.expected_life
    );
    println!("wear:        {}", state.wear_pattern);
    let sensor_note = if estimated { "  [estimated]" } else { "" };
    println!("pressure:    {:.1} PSI{sensor_note}", state.tyre_pressure);
    println!(
        "temperature: tyre {}C / track {}C{sensor_note}",
        state.tyre_temperature, state.track_temperature
    );
    if state.sidewall_deformation {
        println!("warning:     sidewall deformation visible");
    }
    if state.is_graining {
        println!("warning:     graining visible");
    }
    println!();
    println!(
        "STRATEGY: {} (confidence {:.0}%, risk {:.1}, stint {:.0}% used)",
        prediction.strategy,
        prediction.confidence * 100.0,
        prediction.risk_score,
        prediction.lap_percentage * 100.0
    );
}

fn predict(
    config: &AppConfig,
    input: &PathBuf,
    lap: Option<u32>,
    seed: Option<u64>,
    approximate: bool,
) -> Result<(), PitwallError> {
    if !input.exists() {
        return Err(PitwallError::InvalidRecordFile {
            path: format!("{input:?}"),
        });
    }
    let file = File::open(input).map_err(|e| PitwallError::DatasetReadError { source: e })?;
    let mut draft: RecordDraft =
        serde_json::from_reader(file).map_err(|e| PitwallError::RecordParseError { source: e })?;
    if lap.is_some() {
        draft.lap_number = lap;
    }

    let seed = seed.unwrap_or(config.default_seed);
    let (state, estimated) = complete_record(&draft, seed)?;
    if estimated {
        info!("sensor channels estimated from visual evidence with seed {seed}");
    }

    let classifier: &dyn StrategyClassifier = if approximate {
        &RiskProfileClassifier
    } else {
        &RuleClassifier
    };
    let prediction = classifier.predict(&state)?;
    print_report(&state, &prediction, estimated);
    Ok(())
}

fn save_config(
    mut config: AppConfig,
    samples: Option<usize>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    edge_output: Option<PathBuf>,
) -> Result<(), PitwallError> {
    if let Some(samples) = samples {
        config.default_samples = samples;
    }
    if let Some(seed) = seed {
        config.default_seed = seed;
    }
    if let Some(output) = output {
        config.dataset_path = output;
    }
    if let Some(edge_output) = edge_output {
        config.edge_case_path = edge_output;
    }
    config.save()?;
    println!(
        "defaults: {} samples, seed {}, dataset {}, fixtures {}",
        config.default_samples,
        config.default_seed,
        config.dataset_path.display(),
        config.edge_case_path.display()
    );
    Ok(())
}

fn main() {
    colog::init();

    let cli = Args::parse();
    let app_config = AppConfig::from_local_file().unwrap_or_default();
    match cli.command {
        Commands::Generate {
            samples,
            seed,
            output,
            edge_output,
        } => generate(&app_config, samples, seed, output, edge_output)
            .expect("Error while generating dataset"),
        Commands::EdgeCases { output } => {
            edge_cases(&app_config, output).expect("Error while writing edge-case fixtures")
        }
        Commands::Predict {
            input,
            lap,
            seed,
            approximate,
        } => predict(&app_config, &input, lap, seed, approximate)
            .expect("Error while predicting strategy"),
        Commands::Config {
            samples,
            seed,
            output,
            edge_output,
        } => save_config(app_config, samples, seed, output, edge_output)
            .expect("Error while saving config"),
    };
}
