use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, bail, eyre};
use staffsim::data::StudyData;
use staffsim::util::io::atomic_write;
use staffsim::{RunOptions, init_logging, render_report, run_study};

#[derive(Parser, Debug)]
#[command(name = "staffsim")]
#[command(about = "Monte Carlo simulator for patient-to-provider staffing ratios")]
struct Args {
    /// Path to the data directory (default: ~/.staffsim/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a study file and print the report
    Run {
        /// Study file (YAML)
        study: PathBuf,

        /// Override the iteration count per scenario
        #[arg(short = 'n', long)]
        iterations: Option<usize>,

        /// Override the random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Stop scheduling new iterations after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a starter study file
    Init {
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".staffsim")
}

fn load_study(path: &Path) -> color_eyre::Result<StudyData> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    StudyData::from_yaml(&content).map_err(|e| eyre!("Failed to parse {}: {}", path.display(), e))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    match args.command {
        Command::Run {
            study,
            iterations,
            seed,
            timeout_secs,
            output,
        } => {
            let inputs = load_study(&study)?
                .to_inputs()
                .wrap_err_with(|| format!("Invalid study {}", study.display()))?;
            let options = RunOptions {
                iterations,
                seed,
                timeout: timeout_secs.map(Duration::from_secs),
            };

            let outcome = run_study(&inputs, &options)?;
            let report = render_report(&outcome);
            print!("{report}");

            if let Some(output) = output {
                atomic_write(&output, &report)
                    .wrap_err_with(|| format!("Failed to write {}", output.display()))?;
                tracing::info!("Report written to {}", output.display());
            }
        }
        Command::Init { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            let yaml = StudyData::starter()
                .to_yaml()
                .map_err(|e| eyre!("Failed to serialize starter study: {}", e))?;
            atomic_write(&path, &yaml)
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Starter study written to {}", path.display());
            println!("Wrote starter study to {}", path.display());
        }
    }

    Ok(())
}
