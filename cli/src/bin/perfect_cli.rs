use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, bail};
use perfect_cli::{DrawingJob, load_config};
use perfect_drawing::{
    DrawingCommand, DrawingService, PerfectConfig, Perfector, RecognitionStrategy, ShapeLabel,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize a stroke and print the perfected drawing
    Perfect {
        /// Path to the JSON stroke file
        stroke: PathBuf,
        /// Pipeline configuration (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Moving-average half window
        #[arg(short, long)]
        window: Option<usize>,
        /// RDP tolerance in canvas units
        #[arg(short, long)]
        epsilon: Option<f64>,
        /// Skip the remote classifier
        #[arg(long)]
        offline: bool,
    },
    /// Classify a stroke with the local heuristic rules
    Classify {
        stroke: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the idealized outline of a shape sized to the stroke
    Synthesize {
        stroke: PathBuf,
        /// circle, triangle, square or rectangle
        #[arg(short, long)]
        label: ShapeLabel,
    },
    /// Run every step of a batch job file
    Batch {
        /// Path to the job file (.toml or .json)
        #[arg(short, long)]
        job: PathBuf,
    },
    /// Print a JSON schema
    Schema {
        /// Print the configuration schema instead of the command schema
        #[arg(long)]
        config: bool,
    },
    /// Write a configuration file with default values
    InitConfig {
        /// Destination (.toml or .json)
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // stdout carries the JSON results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Perfect { stroke, config, window, epsilon, offline } => {
            let mut config = load_config(config.as_deref())?;
            if offline {
                config.strategy = RecognitionStrategy::Local;
            }
            let service = load_service(&stroke, config)?;
            let output = service
                .execute(DrawingCommand::Perfect { smoothing_window: window, simplify_epsilon: epsilon })
                .await?;
            print_json(&output)?;
        }
        Commands::Classify { stroke, config } => {
            let service = load_service(&stroke, load_config(config.as_deref())?)?;
            print_json(&service.execute(DrawingCommand::Classify).await?)?;
        }
        Commands::Synthesize { stroke, label } => {
            let service = load_service(&stroke, PerfectConfig::local())?;
            print_json(&service.execute(DrawingCommand::Synthesize { label }).await?)?;
        }
        Commands::Batch { job } => {
            run_job(&job).await?;
        }
        Commands::Schema { config } => {
            if config {
                print_json(&schemars::schema_for!(PerfectConfig))?;
            } else {
                print_json(&DrawingCommand::schema())?;
            }
        }
        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                bail!("{} already exists, pass --force to overwrite", output.display());
            }
            PerfectConfig::default().to_file(&output)?;
            info!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

fn load_service(stroke: &Path, config: PerfectConfig) -> Result<DrawingService> {
    let mut service = DrawingService::with_perfector(Perfector::from_config(config)?);
    service.load_stroke(stroke)?;
    info!("Loaded {} stroke elements from {}", service.stroke().map_or(0, |s| s.len()), stroke.display());
    Ok(service)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_job(job_path: &Path) -> Result<()> {
    let job = DrawingJob::from_file(job_path)?;
    let service = load_service(Path::new(&job.stroke), job.load_config()?)?;

    std::fs::create_dir_all(&job.output_dir)?;

    for step in job.steps {
        let Some(command) = step.command else {
            warn!(
                "No command found for step '{}': {}",
                step.name,
                step.description.unwrap_or_default()
            );
            continue;
        };

        let output_path = Path::new(&job.output_dir).join(format!("{}.json", step.name));
        info!("Running step '{}' ({}) -> {}", step.name, command, output_path.display());

        let output = service.execute(command).await?;
        std::fs::write(&output_path, serde_json::to_string_pretty(&output)?)?;
    }

    info!("Batch job completed");
    Ok(())
}
